//! Internationalization for request handling
//!
//! This module loads the message bundle at startup, negotiates the request
//! language from `Accept-Language` and renders localized, pluralized messages.

mod bundle;
mod error;
mod localizer;
mod message;
pub mod messages;
mod negotiate;
mod template;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use unic_langid::LanguageIdentifier;

use crate::config::I18nConfig;

pub use bundle::{MessageBundle, message_file_path};
pub use error::{LoadError, RenderError};
pub use localizer::{LocalizeConfig, Localizer, PLURAL_COUNT_KEY};
pub use message::{Message, parse_messages};
pub use negotiate::{LanguageMatcher, WeightedTag, parse_accept_language};

/// Supported locales
pub const SUPPORTED_LANGUAGES: &[&str] = &["en-US", "zh-CN"];
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Process-wide i18n state: the bundle, the language matcher and the default localizer.
///
/// Immutable once built; share it behind an `Arc`.
pub struct I18n {
    bundle: Arc<MessageBundle>,
    matcher: LanguageMatcher,
    default_localizer: Localizer,
}

impl I18n {
    pub fn load(config: &I18nConfig) -> Result<Self, LoadError> {
        let languages = config
            .languages
            .iter()
            .map(|l| parse_language_tag(l))
            .collect::<Result<Vec<_>, _>>()?;
        let default_language = parse_language_tag(&config.default_language)?;

        let bundle = MessageBundle::load(
            Path::new(&config.translations_dir),
            &languages,
            &default_language,
        )?;
        tracing::info!(
            "Message bundle ready: languages={:?}, default={}",
            bundle.languages().iter().map(ToString::to_string).collect::<Vec<_>>(),
            bundle.default_language()
        );

        Ok(Self::from_bundle(bundle))
    }

    pub fn from_bundle(bundle: MessageBundle) -> Self {
        let bundle = Arc::new(bundle);
        let matcher =
            LanguageMatcher::new(bundle.languages().to_vec(), bundle.default_language().clone());
        let default_localizer = Localizer::new(bundle.clone(), bundle.default_language().clone());

        Self { bundle, matcher, default_localizer }
    }

    /// Pick the localizer for a raw Accept-Language value.
    ///
    /// Missing, empty or unmatched values select the default language.
    pub fn negotiate(&self, accept_language: Option<&str>) -> Localizer {
        let language = match accept_language.map(str::trim).filter(|h| !h.is_empty()) {
            Some(header) => self.matcher.match_header(header),
            None => self.matcher.default_language(),
        };
        tracing::debug!("Negotiated language {} from {:?}", language, accept_language);

        self.localizer(language)
    }

    /// Localizer for a supported language; anything else gets the default one.
    pub fn localizer(&self, language: &LanguageIdentifier) -> Localizer {
        if self.matcher.supported().contains(language) {
            Localizer::new(self.bundle.clone(), language.clone())
        } else {
            self.default_localizer.clone()
        }
    }

    pub fn default_localizer(&self) -> &Localizer {
        &self.default_localizer
    }

    pub fn default_language(&self) -> &LanguageIdentifier {
        self.bundle.default_language()
    }

    pub fn supported_languages(&self) -> &[LanguageIdentifier] {
        self.matcher.supported()
    }

    pub fn bundle(&self) -> &Arc<MessageBundle> {
        &self.bundle
    }
}

impl fmt::Debug for I18n {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18n").field("bundle", &self.bundle).finish_non_exhaustive()
    }
}

fn parse_language_tag(tag: &str) -> Result<LanguageIdentifier, LoadError> {
    tag.parse().map_err(|_| LoadError::InvalidLanguageTag(tag.to_string()))
}
