use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use intl_pluralrules::PluralCategory;
use unic_langid::LanguageIdentifier;

use super::bundle::MessageBundle;
use super::error::RenderError;
use super::message::{CompiledMessage, Message};
use super::template::TemplateError;

/// Data key the plural count is exposed under when the caller did not set it.
pub const PLURAL_COUNT_KEY: &str = "PluralCount";

/// What to render: a message id, its template data and an optional plural count.
#[derive(Debug, Clone, Default)]
pub struct LocalizeConfig {
    pub message_id: String,
    pub template_data: BTreeMap<String, String>,
    pub plural_count: Option<String>,
    pub default_message: Option<Message>,
}

impl LocalizeConfig {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self { message_id: message_id.into(), ..Default::default() }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.template_data.insert(key.into(), value.to_string());
        self
    }

    /// Selects the plural form. Accepts integers or decimal strings like `"1.5"`.
    pub fn with_plural_count(mut self, count: impl fmt::Display) -> Self {
        self.plural_count = Some(count.to_string());
        self
    }

    /// Used when the bundle has no message with this id in any language.
    pub fn with_default_message(mut self, message: Message) -> Self {
        self.default_message = Some(message);
        self
    }
}

/// Renders messages in one language.
#[derive(Clone)]
pub struct Localizer {
    bundle: Arc<MessageBundle>,
    language: LanguageIdentifier,
}

impl Localizer {
    pub fn new(bundle: Arc<MessageBundle>, language: LanguageIdentifier) -> Self {
        Self { bundle, language }
    }

    pub fn language(&self) -> &LanguageIdentifier {
        &self.language
    }

    pub fn localize(&self, config: &LocalizeConfig) -> Result<String, RenderError> {
        let id = config.message_id.as_str();

        let fallback;
        let (language, message) = match self.bundle.lookup(id, &self.language) {
            Some(found) => found,
            None => {
                let default = config.default_message.clone().ok_or_else(|| {
                    RenderError::MessageNotFound {
                        id: id.to_string(),
                        language: self.language.to_string(),
                    }
                })?;
                // Same rules as messages loaded from a file
                if default.other.is_none() {
                    return Err(RenderError::InvalidDefaultMessage {
                        id: id.to_string(),
                        reason: "no `other` form".to_string(),
                    });
                }
                fallback = CompiledMessage::compile(default).map_err(|reason| {
                    RenderError::InvalidDefaultMessage { id: id.to_string(), reason }
                })?;
                (self.bundle.default_language(), &fallback)
            },
        };

        let mut data = config.template_data.clone();
        let category = match &config.plural_count {
            Some(count) => {
                data.entry(PLURAL_COUNT_KEY.to_string()).or_insert_with(|| count.clone());
                self.bundle.plural_category(language, count).map_err(|_| {
                    RenderError::InvalidPluralCount { id: id.to_string(), count: count.clone() }
                })?
            },
            None => PluralCategory::OTHER,
        };

        message.render(category, &data).map_err(|err| match err {
            TemplateError::MissingValue(name) => RenderError::MissingValue { id: id.to_string(), name },
            TemplateError::Malformed(fragment) => {
                RenderError::MalformedTemplate { id: id.to_string(), fragment }
            },
        })
    }

    /// Like [`Localizer::localize`] but never fails: errors are logged and
    /// an empty string is returned.
    pub fn render(&self, config: &LocalizeConfig) -> String {
        self.localize(config).unwrap_or_else(|err| {
            tracing::warn!(
                "Failed to localize {} for {}: {}",
                config.message_id,
                self.language,
                err
            );
            String::new()
        })
    }
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer").field("language", &self.language).finish()
    }
}
