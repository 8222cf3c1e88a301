//! gRPC integration: interceptors that attach the caller's language and
//! timezone to each call, the Greeter service that reads them back, and the
//! client side that forwards them from an HTTP request.

mod client;
mod greeter;
mod interceptor;
pub mod proto;

use std::sync::Arc;

use tonic::codegen::InterceptedService;

pub use client::{GreeterUpstream, UpstreamError, forward_context};
pub use greeter::GreeterService;
pub use interceptor::{
    ContextInterceptor, LANGUAGE_METADATA_KEY, LanguageInterceptor, TIMEZONE_METADATA_KEY,
    TimezoneInterceptor,
};
pub use proto::greeter_client::GreeterClient;
pub use proto::greeter_server::{Greeter, GreeterServer};
pub use proto::{HelloRequest, HelloResponse};

use crate::i18n::I18n;
use crate::timezone::TimezoneResolver;

pub type GreeterGrpcService = InterceptedService<GreeterServer<GreeterService>, ContextInterceptor>;

/// The Greeter service behind the language and timezone interceptor, ready for
/// `tonic::transport::Server::add_service`.
pub fn greeter_service(i18n: Arc<I18n>, timezones: TimezoneResolver) -> GreeterGrpcService {
    GreeterServer::with_interceptor(
        GreeterService::new(i18n.clone(), timezones),
        ContextInterceptor::new(i18n, timezones),
    )
}
