//! Locale negotiation middleware
//!
//! Negotiates the request language from the Accept-Language header and
//! attaches a localizer for it to the request context.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::ACCEPT_LANGUAGE,
    middleware::Next,
    response::Response,
};

use crate::context::with_localizer;
use crate::i18n::I18n;

/// Middleware to pick a localizer from the Accept-Language header
pub async fn locale_middleware(
    State(i18n): State<Arc<I18n>>,
    mut req: Request,
    next: Next,
) -> Response {
    let accept_language = req
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());

    // Never fails: anything unusable selects the default language
    let localizer = i18n.negotiate(accept_language);

    with_localizer(req.extensions_mut(), localizer);

    next.run(req).await
}
