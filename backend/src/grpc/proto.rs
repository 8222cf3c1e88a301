//! Messages and service plumbing for `proto/greeter.proto`.
//!
//! Kept by hand in the shape `tonic-build` generates, so the crate builds
//! without `protoc`. Update both together.

use prost::Message;

#[derive(Clone, PartialEq, Message)]
pub struct HelloRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct HelloResponse {
    #[prost(string, tag = "1")]
    pub message: String,
    #[prost(string, tag = "2")]
    pub timezone: String,
}

pub mod greeter_server {
    use tonic::codegen::*;

    use super::{HelloRequest, HelloResponse};

    pub const SERVICE_NAME: &str = "locale_gate.Greeter";
    pub const HELLO_PATH: &str = "/locale_gate.Greeter/Hello";

    #[async_trait]
    pub trait Greeter: Send + Sync + 'static {
        async fn hello(
            &self,
            request: tonic::Request<HelloRequest>,
        ) -> Result<tonic::Response<HelloResponse>, tonic::Status>;
    }

    #[derive(Debug)]
    pub struct GreeterServer<T> {
        inner: Arc<T>,
    }

    impl<T> GreeterServer<T> {
        pub fn new(inner: T) -> Self {
            Self::from_arc(Arc::new(inner))
        }

        pub fn from_arc(inner: Arc<T>) -> Self {
            Self { inner }
        }

        pub fn with_interceptor<F>(inner: T, interceptor: F) -> InterceptedService<Self, F>
        where
            F: tonic::service::Interceptor,
        {
            InterceptedService::new(Self::new(inner), interceptor)
        }
    }

    impl<T> Clone for GreeterServer<T> {
        fn clone(&self) -> Self {
            Self { inner: self.inner.clone() }
        }
    }

    struct HelloSvc<T: Greeter>(Arc<T>);

    impl<T: Greeter> tonic::server::UnaryService<HelloRequest> for HelloSvc<T> {
        type Response = HelloResponse;
        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

        fn call(&mut self, request: tonic::Request<HelloRequest>) -> Self::Future {
            let inner = Arc::clone(&self.0);
            Box::pin(async move { inner.hello(request).await })
        }
    }

    impl<T, B> Service<http::Request<B>> for GreeterServer<T>
    where
        T: Greeter,
        B: Body + Send + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            match req.uri().path() {
                HELLO_PATH => {
                    let inner = self.inner.clone();
                    Box::pin(async move {
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        Ok(grpc.unary(HelloSvc(inner), req).await)
                    })
                },
                _ => Box::pin(async move {
                    let mut response = http::Response::new(empty_body());
                    let headers = response.headers_mut();
                    headers.insert(
                        http::header::HeaderName::from_static("grpc-status"),
                        http::HeaderValue::from(tonic::Code::Unimplemented as i32),
                    );
                    headers.insert(
                        http::header::CONTENT_TYPE,
                        http::HeaderValue::from_static("application/grpc"),
                    );
                    Ok(response)
                }),
            }
        }
    }

    impl<T> tonic::server::NamedService for GreeterServer<T> {
        const NAME: &'static str = SERVICE_NAME;
    }
}

pub mod greeter_client {
    use tonic::codegen::http::uri::PathAndQuery;
    use tonic::transport::{Channel, Endpoint};

    use super::greeter_server::HELLO_PATH;
    use super::{HelloRequest, HelloResponse};

    #[derive(Debug, Clone)]
    pub struct GreeterClient {
        inner: tonic::client::Grpc<Channel>,
    }

    impl GreeterClient {
        pub fn new(channel: Channel) -> Self {
            Self { inner: tonic::client::Grpc::new(channel) }
        }

        pub async fn connect(endpoint: Endpoint) -> Result<Self, tonic::transport::Error> {
            Ok(Self::new(endpoint.connect().await?))
        }

        pub async fn hello(
            &mut self,
            request: tonic::Request<HelloRequest>,
        ) -> Result<tonic::Response<HelloResponse>, tonic::Status> {
            self.inner
                .ready()
                .await
                .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {}", e)))?;
            let codec = tonic::codec::ProstCodec::default();
            self.inner.unary(request, PathAndQuery::from_static(HELLO_PATH), codec).await
        }
    }
}
