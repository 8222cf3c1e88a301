//! Timezone middleware
//!
//! Resolves the X-Timezone header and attaches the timezone to the request
//! context.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::context::with_timezone;
use crate::timezone::TimezoneResolver;

pub const TIMEZONE_HEADER: &str = "x-timezone";

pub async fn timezone_middleware(
    State(resolver): State<TimezoneResolver>,
    mut req: Request,
    next: Next,
) -> Response {
    let name = req
        .headers()
        .get(TIMEZONE_HEADER)
        .and_then(|v| v.to_str().ok());

    let tz = resolver.resolve(name);
    tracing::debug!("Request timezone: {}", tz);

    with_timezone(req.extensions_mut(), tz);

    next.run(req).await
}
