//! Per-request locale and timezone context.
//!
//! Middleware and interceptors attach their results to the request's
//! extensions; handlers read them back through the accessors here, or through
//! the [`Locale`] and [`Timezone`] extractors. axum requests and tonic calls
//! carry the same `http::Extensions` type, so one set of accessors serves
//! both. The stored entries use private key types, so nothing else can
//! overwrite them by accident.

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{Extensions, request::Parts},
};
use chrono_tz::Tz;
use unic_langid::LanguageIdentifier;

use crate::i18n::{I18n, Localizer};
use crate::timezone::TimezoneResolver;

#[derive(Clone)]
struct LocaleEntry(Localizer);

#[derive(Clone, Copy)]
struct TimezoneEntry(Tz);

pub fn with_localizer(ctx: &mut Extensions, localizer: Localizer) {
    ctx.insert(LocaleEntry(localizer));
}

/// The request's localizer, or the default one if none was attached.
pub fn localizer_from(ctx: &Extensions, i18n: &I18n) -> Localizer {
    match ctx.get::<LocaleEntry>() {
        Some(LocaleEntry(localizer)) => localizer.clone(),
        None => i18n.default_localizer().clone(),
    }
}

/// The request's language tag, or the default language.
pub fn language_tag_from(ctx: &Extensions, i18n: &I18n) -> LanguageIdentifier {
    match ctx.get::<LocaleEntry>() {
        Some(LocaleEntry(localizer)) => localizer.language().clone(),
        None => i18n.default_language().clone(),
    }
}

pub fn with_timezone(ctx: &mut Extensions, tz: Tz) {
    ctx.insert(TimezoneEntry(tz));
}

/// The request's timezone, or the resolver's default.
pub fn timezone_from(ctx: &Extensions, resolver: &TimezoneResolver) -> Tz {
    ctx.get::<TimezoneEntry>()
        .map(|TimezoneEntry(tz)| *tz)
        .unwrap_or_else(|| resolver.default_timezone())
}

/// Extracts the request localizer; never rejects.
pub struct Locale(pub Localizer);

#[async_trait]
impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
    Arc<I18n>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let i18n = Arc::<I18n>::from_ref(state);
        Ok(Self(localizer_from(&parts.extensions, &i18n)))
    }
}

/// Extracts the request timezone; never rejects.
pub struct Timezone(pub Tz);

#[async_trait]
impl<S> FromRequestParts<S> for Timezone
where
    S: Send + Sync,
    TimezoneResolver: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let resolver = TimezoneResolver::from_ref(state);
        Ok(Self(timezone_from(&parts.extensions, &resolver)))
    }
}
