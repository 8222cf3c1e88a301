use std::sync::Arc;

use async_trait::async_trait;
use tonic::{Request, Response, Status};

use super::proto::greeter_server::Greeter;
use super::proto::{HelloRequest, HelloResponse};
use crate::context::{localizer_from, timezone_from};
use crate::i18n::{I18n, messages};
use crate::timezone::TimezoneResolver;

/// Greets callers in the language attached by the interceptors.
#[derive(Debug, Clone)]
pub struct GreeterService {
    i18n: Arc<I18n>,
    timezones: TimezoneResolver,
}

impl GreeterService {
    pub fn new(i18n: Arc<I18n>, timezones: TimezoneResolver) -> Self {
        Self { i18n, timezones }
    }
}

#[async_trait]
impl Greeter for GreeterService {
    async fn hello(
        &self,
        request: Request<HelloRequest>,
    ) -> Result<Response<HelloResponse>, Status> {
        let localizer = localizer_from(request.extensions(), &self.i18n);
        let tz = timezone_from(request.extensions(), &self.timezones);
        let name = request.into_inner().name;
        if name.trim().is_empty() {
            return Err(Status::invalid_argument("name is required"));
        }

        tracing::debug!("gRPC hello for {} in {} ({})", name, localizer.language(), tz);
        let message = messages::hello(&localizer, &name);
        Ok(Response::new(HelloResponse { message, timezone: tz.to_string() }))
    }
}
