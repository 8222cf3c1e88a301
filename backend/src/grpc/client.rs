//! Outgoing side: calls a Greeter server with the current request's
//! language and timezone attached as metadata.

use chrono_tz::Tz;
use thiserror::Error;
use tonic::metadata::{Ascii, MetadataMap, MetadataValue};
use tonic::transport::Endpoint;
use tonic::{Request, Status};

use super::interceptor::{LANGUAGE_METADATA_KEY, TIMEZONE_METADATA_KEY};
use super::proto::HelloRequest;
use super::proto::greeter_client::GreeterClient;
use crate::i18n::Localizer;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("gRPC upstream unreachable: {0}")]
    Connect(#[from] tonic::transport::Error),

    #[error("gRPC call failed: {0}")]
    Call(#[from] Status),
}

/// Wrap `message` in a request that carries `x-language` and `x-timezone`.
pub fn forward_context<T>(message: T, localizer: &Localizer, tz: Tz) -> Request<T> {
    let mut request = Request::new(message);
    let metadata = request.metadata_mut();
    insert_ascii(metadata, LANGUAGE_METADATA_KEY, &localizer.language().to_string());
    insert_ascii(metadata, TIMEZONE_METADATA_KEY, &tz.to_string());
    request
}

fn insert_ascii(metadata: &mut MetadataMap, key: &'static str, value: &str) {
    match value.parse::<MetadataValue<Ascii>>() {
        Ok(value) => {
            metadata.insert(key, value);
        },
        Err(_) => tracing::warn!("Not forwarding non-ASCII {} value {:?}", key, value),
    }
}

/// Remote Greeter used by the HTTP side.
#[derive(Debug, Clone)]
pub struct GreeterUpstream {
    endpoint: Endpoint,
}

impl GreeterUpstream {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// One connection per call.
    pub async fn hello(
        &self,
        name: &str,
        localizer: &Localizer,
        tz: Tz,
    ) -> Result<String, UpstreamError> {
        let mut client = GreeterClient::connect(self.endpoint.clone()).await?;
        let request = forward_context(HelloRequest { name: name.to_string() }, localizer, tz);
        tracing::debug!("Calling Greeter at {} as {} ({})", self.endpoint.uri(), localizer.language(), tz);

        let response = client.hello(request).await?;
        Ok(response.into_inner().message)
    }
}
