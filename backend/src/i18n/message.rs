//! Message definitions and the TOML message-file format.
//!
//! A message file maps message ids to either a plain string (the `other` form)
//! or a table:
//!
//! ```toml
//! [PersonCats]
//! description = "How many cats a person has"
//! one = "{{.Name}} has {{.Count}} cat."
//! other = "{{.Name}} has {{.Count}} cats."
//! ```

use std::collections::BTreeMap;

use intl_pluralrules::PluralCategory;
use serde::Deserialize;

use super::template::{DEFAULT_LEFT_DELIM, DEFAULT_RIGHT_DELIM, Template, TemplateError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Message {
    #[serde(skip)]
    pub id: String,
    pub description: Option<String>,
    pub left_delim: Option<String>,
    pub right_delim: Option<String>,
    pub zero: Option<String>,
    pub one: Option<String>,
    pub two: Option<String>,
    pub few: Option<String>,
    pub many: Option<String>,
    pub other: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMessage {
    Text(String),
    Full(Message),
}

impl Message {
    pub fn new(id: impl Into<String>, other: impl Into<String>) -> Self {
        Self { id: id.into(), other: Some(other.into()), ..Default::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_form(mut self, category: PluralCategory, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match category {
            PluralCategory::ZERO => self.zero = text,
            PluralCategory::ONE => self.one = text,
            PluralCategory::TWO => self.two = text,
            PluralCategory::FEW => self.few = text,
            PluralCategory::MANY => self.many = text,
            PluralCategory::OTHER => self.other = text,
        }
        self
    }

    pub fn with_delimiters(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_delim = Some(left.into());
        self.right_delim = Some(right.into());
        self
    }

    /// Template text for a plural category, without falling back.
    pub fn form(&self, category: PluralCategory) -> Option<&str> {
        match category {
            PluralCategory::ZERO => self.zero.as_deref(),
            PluralCategory::ONE => self.one.as_deref(),
            PluralCategory::TWO => self.two.as_deref(),
            PluralCategory::FEW => self.few.as_deref(),
            PluralCategory::MANY => self.many.as_deref(),
            PluralCategory::OTHER => self.other.as_deref(),
        }
    }

    pub fn delimiters(&self) -> (&str, &str) {
        (
            self.left_delim.as_deref().unwrap_or(DEFAULT_LEFT_DELIM),
            self.right_delim.as_deref().unwrap_or(DEFAULT_RIGHT_DELIM),
        )
    }
}

/// Parse the contents of one message file.
pub fn parse_messages(source: &str) -> Result<Vec<Message>, toml::de::Error> {
    let raw: BTreeMap<String, RawMessage> = toml::from_str(source)?;

    Ok(raw
        .into_iter()
        .map(|(id, raw)| match raw {
            RawMessage::Text(other) => Message::new(id, other),
            RawMessage::Full(message) => Message { id, ..message },
        })
        .collect())
}

/// A message with its delimiter pair compiled, ready to render.
#[derive(Debug, Clone)]
pub(crate) struct CompiledMessage {
    message: Message,
    template: Template,
}

impl CompiledMessage {
    pub(crate) fn compile(message: Message) -> Result<Self, String> {
        let (left, right) = message.delimiters();
        let template = Template::new(left, right)?;
        Ok(Self { message, template })
    }

    pub(crate) fn message(&self) -> &Message {
        &self.message
    }

    /// Render the form for `category`, using `other` when the category has no form.
    pub(crate) fn render(
        &self,
        category: PluralCategory,
        data: &BTreeMap<String, String>,
    ) -> Result<String, TemplateError> {
        let source = self
            .message
            .form(category)
            .or_else(|| self.message.form(PluralCategory::OTHER))
            .unwrap_or_default();
        self.template.execute(source, data)
    }
}
