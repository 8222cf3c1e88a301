pub mod config;
pub mod context;
pub mod grpc;
pub mod handlers;
pub mod i18n;
pub mod logging;
pub mod middleware;
pub mod services;
pub mod timezone;
pub mod utils;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{Router, extract::FromRef, middleware as axum_middleware, routing::get};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::grpc::GreeterUpstream;
use crate::i18n::I18n;
use crate::services::TaskRunner;
use crate::timezone::TimezoneResolver;

/// Shared application state
///
/// Every field is immutable after startup and cheap to clone.
#[derive(Debug, Clone, FromRef)]
pub struct AppState {
    pub i18n: Arc<I18n>,
    pub timezones: TimezoneResolver,
    pub tasks: TaskRunner,
    pub greeter: GreeterUpstream,
}

impl AppState {
    pub fn new(i18n: Arc<I18n>, timezones: TimezoneResolver, greeter: GreeterUpstream) -> Self {
        let tasks = TaskRunner::new(i18n.clone(), timezones);
        Self { i18n, timezones, tasks, greeter }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::hello::hello,
        handlers::hello::hello_with_task,
        handlers::hello::hello_with_grpc
    ),
    tags(
        (name = "Hello", description = "Localized greetings")
    ),
    info(
        title = "locale-gate API",
        description = "Request-scoped language and timezone negotiation",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build the HTTP router
///
/// Layer order, outermost first: tracing, locale, timezone, handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/hello/:username/", get(handlers::hello::hello))
        .route("/hello-with-task/:username/", get(handlers::hello::hello_with_task))
        .route("/hello-with-grpc/:username/", get(handlers::hello::hello_with_grpc))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn_with_state(
            state.timezones,
            middleware::timezone_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.i18n.clone(),
            middleware::locale_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
