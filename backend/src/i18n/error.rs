use std::path::PathBuf;

use thiserror::Error;

/// Failures while building the message bundle at startup.
///
/// Any of these aborts the process before it starts serving requests.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Invalid language tag: {0}")]
    InvalidLanguageTag(String),

    #[error("No supported languages configured")]
    NoLanguages,

    #[error("Default language {0} is not in the supported language list")]
    UnsupportedDefaultLanguage(String),

    #[error("Message file for {language} not found: {}", path.display())]
    MissingMessageFile { language: String, path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse messages for {language}: {source}")]
    Parse {
        language: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Message {id} ({language}) has no `other` form")]
    MissingOtherForm { id: String, language: String },

    #[error("Message {id} ({language}) has an invalid delimiter pair: {reason}")]
    InvalidDelimiters { id: String, language: String, reason: String },

    #[error("No plural rules for {language}: {reason}")]
    PluralRules { language: String, reason: &'static str },
}

/// Failures while rendering a single message.
///
/// Never propagated to the transport: [`crate::i18n::Localizer::render`] logs them
/// and degrades to an empty string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Message {id} not found in {language} or the default language")]
    MessageNotFound { id: String, language: String },

    #[error("Message {id} references {name} but no value was provided")]
    MissingValue { id: String, name: String },

    #[error("Message {id} contains a malformed placeholder near {fragment:?}")]
    MalformedTemplate { id: String, fragment: String },

    #[error("Plural count {count:?} for message {id} is not a number")]
    InvalidPluralCount { id: String, count: String },

    #[error("Default message for {id} is unusable: {reason}")]
    InvalidDefaultMessage { id: String, reason: String },
}
