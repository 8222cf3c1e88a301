use std::sync::Arc;

use tonic::{Request, Status, metadata::MetadataMap, service::Interceptor};

use crate::context::{with_localizer, with_timezone};
use crate::i18n::I18n;
use crate::timezone::TimezoneResolver;

pub const LANGUAGE_METADATA_KEY: &str = "x-language";
pub const TIMEZONE_METADATA_KEY: &str = "x-timezone";

/// Value of a metadata key sent exactly once.
///
/// A missing key, a repeated key or a non-ASCII value all count as absent.
fn single_value(metadata: &MetadataMap, key: &str) -> Option<String> {
    let mut values = metadata.get_all(key).iter();
    let value = values.next()?;
    if values.next().is_some() {
        tracing::debug!("Ignoring repeated gRPC metadata key {}", key);
        return None;
    }
    value.to_str().ok().map(str::to_string)
}

fn attach_language(request: &mut Request<()>, i18n: &I18n) {
    let value = single_value(request.metadata(), LANGUAGE_METADATA_KEY);
    let localizer = i18n.negotiate(value.as_deref());
    with_localizer(request.extensions_mut(), localizer);
}

fn attach_timezone(request: &mut Request<()>, resolver: &TimezoneResolver) {
    let value = single_value(request.metadata(), TIMEZONE_METADATA_KEY);
    let tz = resolver.resolve(value.as_deref());
    with_timezone(request.extensions_mut(), tz);
}

/// Negotiates the call language from `x-language` metadata.
#[derive(Debug, Clone)]
pub struct LanguageInterceptor {
    i18n: Arc<I18n>,
}

impl LanguageInterceptor {
    pub fn new(i18n: Arc<I18n>) -> Self {
        Self { i18n }
    }
}

impl Interceptor for LanguageInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        attach_language(&mut request, &self.i18n);
        Ok(request)
    }
}

/// Resolves the call timezone from `x-timezone` metadata.
#[derive(Debug, Clone, Copy)]
pub struct TimezoneInterceptor {
    resolver: TimezoneResolver,
}

impl TimezoneInterceptor {
    pub fn new(resolver: TimezoneResolver) -> Self {
        Self { resolver }
    }
}

impl Interceptor for TimezoneInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        attach_timezone(&mut request, &self.resolver);
        Ok(request)
    }
}

/// Both of the above in one interceptor.
#[derive(Debug, Clone)]
pub struct ContextInterceptor {
    i18n: Arc<I18n>,
    resolver: TimezoneResolver,
}

impl ContextInterceptor {
    pub fn new(i18n: Arc<I18n>, resolver: TimezoneResolver) -> Self {
        Self { i18n, resolver }
    }
}

impl Interceptor for ContextInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        attach_language(&mut request, &self.i18n);
        attach_timezone(&mut request, &self.resolver);
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use chrono_tz::Tz;

    use super::*;
    use crate::context::{language_tag_from, timezone_from};
    use crate::tests::common::test_i18n;

    fn request_with(metadata: &[(&'static str, &str)]) -> Request<()> {
        let mut request = Request::new(());
        for (key, value) in metadata {
            request.metadata_mut().append(*key, value.parse().unwrap());
        }
        request
    }

    #[test]
    fn test_language_from_metadata() {
        let i18n = test_i18n();
        let mut interceptor = LanguageInterceptor::new(i18n.clone());

        let request = interceptor.call(request_with(&[("x-language", "zh-CN")])).unwrap();
        assert_eq!(language_tag_from(request.extensions(), &i18n).to_string(), "zh-CN");

        let request = interceptor.call(request_with(&[("x-language", "zh")])).unwrap();
        assert_eq!(language_tag_from(request.extensions(), &i18n).to_string(), "zh-CN");
    }

    #[test]
    fn test_missing_language_uses_default() {
        let i18n = test_i18n();
        let mut interceptor = LanguageInterceptor::new(i18n.clone());

        let request = interceptor.call(request_with(&[])).unwrap();
        assert_eq!(language_tag_from(request.extensions(), &i18n).to_string(), "en-US");
    }

    #[test]
    fn test_repeated_metadata_counts_as_absent() {
        let i18n = test_i18n();
        let resolver = TimezoneResolver::default();
        let mut interceptor = ContextInterceptor::new(i18n.clone(), resolver);

        let request = interceptor
            .call(request_with(&[
                ("x-language", "zh-CN"),
                ("x-language", "zh-CN"),
                ("x-timezone", "UTC"),
                ("x-timezone", "Europe/Paris"),
            ]))
            .unwrap();
        assert_eq!(language_tag_from(request.extensions(), &i18n).to_string(), "en-US");
        assert_eq!(timezone_from(request.extensions(), &resolver), Tz::Asia__Shanghai);
    }

    #[test]
    fn test_timezone_from_metadata() {
        let resolver = TimezoneResolver::default();
        let mut interceptor = TimezoneInterceptor::new(resolver);

        let request = interceptor.call(request_with(&[("x-timezone", "America/New_York")])).unwrap();
        assert_eq!(timezone_from(request.extensions(), &resolver), Tz::America__New_York);

        let request = interceptor.call(request_with(&[("x-timezone", "Bogus/Zone")])).unwrap();
        assert_eq!(timezone_from(request.extensions(), &resolver), Tz::Asia__Shanghai);
    }

    #[test]
    fn test_context_interceptor_sets_both() {
        let i18n = test_i18n();
        let resolver = TimezoneResolver::default();
        let mut interceptor = ContextInterceptor::new(i18n.clone(), resolver);

        let request = interceptor
            .call(request_with(&[("x-language", "en"), ("x-timezone", "Europe/London")]))
            .unwrap();
        assert_eq!(language_tag_from(request.extensions(), &i18n).to_string(), "en-US");
        assert_eq!(timezone_from(request.extensions(), &resolver), Tz::Europe__London);
    }
}
