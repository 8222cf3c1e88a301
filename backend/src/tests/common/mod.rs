// Common test utilities and helpers

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Endpoint, Server};
use tower::ServiceExt;

use crate::config::I18nConfig;
use crate::grpc::{GreeterUpstream, greeter_service};
use crate::i18n::I18n;
use crate::timezone::TimezoneResolver;
use crate::{AppState, build_router};

/// Translations shipped with the crate
pub fn translations_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/translations"))
}

/// Load the shipped bundle with the default language set
pub fn test_i18n() -> Arc<I18n> {
    let config = I18nConfig {
        translations_dir: translations_dir().to_string_lossy().into_owned(),
        ..I18nConfig::default()
    };
    Arc::new(I18n::load(&config).expect("Failed to load shipped translations"))
}

/// Endpoint for a Greeter listening on `addr`
pub fn greeter_endpoint(addr: SocketAddr) -> Endpoint {
    Endpoint::from_shared(format!("http://{}", addr)).expect("Invalid greeter address")
}

/// State whose `/hello-with-grpc/` calls go to `upstream`
pub fn test_state_with_upstream(upstream: Endpoint) -> AppState {
    AppState::new(test_i18n(), TimezoneResolver::default(), GreeterUpstream::new(upstream))
}

pub fn test_state() -> AppState {
    test_state_with_upstream(Endpoint::from_static("http://127.0.0.1:50051"))
}

/// Serve the intercepted Greeter on an ephemeral port
pub async fn spawn_greeter() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind greeter listener");
    let addr = listener.local_addr().expect("Listener has no address");
    let service = greeter_service(test_i18n(), TimezoneResolver::default());
    tokio::spawn(async move {
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .expect("Greeter server failed");
    });
    addr
}

pub fn test_router() -> Router {
    build_router(test_state())
}

/// Send a GET with optional Accept-Language and X-Timezone headers
pub async fn get(
    router: Router,
    uri: &str,
    language: Option<&str>,
    timezone: Option<&str>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().uri(uri);
    if let Some(language) = language {
        builder = builder.header("accept-language", language);
    }
    if let Some(timezone) = timezone {
        builder = builder.header("x-timezone", timezone);
    }
    let request = builder.body(Body::empty()).expect("Failed to build request");

    let response = router.oneshot(request).await.expect("Router failed");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    (status, String::from_utf8(body.to_vec()).expect("Body is not UTF-8"))
}
