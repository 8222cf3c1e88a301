//! The process-wide message bundle.
//!
//! Built once at startup from one message file per supported language and
//! shared read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use intl_pluralrules::{PluralCategory, PluralRuleType, PluralRules};
use unic_langid::LanguageIdentifier;

use super::error::LoadError;
use super::message::{CompiledMessage, Message, parse_messages};

struct Catalog {
    messages: HashMap<String, CompiledMessage>,
    plural_rules: PluralRules,
}

impl Catalog {
    fn build(language: &LanguageIdentifier, messages: Vec<Message>) -> Result<Self, LoadError> {
        // Plural rules only depend on the language subtag
        let rules_locale = LanguageIdentifier::from_parts(language.language, None, None, &[]);
        let plural_rules = PluralRules::create(rules_locale, PluralRuleType::CARDINAL)
            .map_err(|reason| LoadError::PluralRules { language: language.to_string(), reason })?;

        let mut compiled = HashMap::with_capacity(messages.len());
        for message in messages {
            if message.other.is_none() {
                return Err(LoadError::MissingOtherForm {
                    id: message.id,
                    language: language.to_string(),
                });
            }

            let id = message.id.clone();
            let entry = CompiledMessage::compile(message).map_err(|reason| {
                LoadError::InvalidDelimiters {
                    id: id.clone(),
                    language: language.to_string(),
                    reason,
                }
            })?;
            compiled.insert(id, entry);
        }

        Ok(Self { messages: compiled, plural_rules })
    }
}

pub struct MessageBundle {
    default_language: LanguageIdentifier,
    languages: Vec<LanguageIdentifier>,
    catalogs: HashMap<LanguageIdentifier, Catalog>,
}

impl MessageBundle {
    /// Load `active.<tag>.toml` for every language from `dir`.
    ///
    /// A missing or invalid file for any supported language is an error.
    pub fn load(
        dir: &Path,
        languages: &[LanguageIdentifier],
        default_language: &LanguageIdentifier,
    ) -> Result<Self, LoadError> {
        check_languages(languages, default_language)?;

        let mut sources = Vec::with_capacity(languages.len());
        for language in languages {
            let path = message_file_path(dir, language);
            if !path.is_file() {
                return Err(LoadError::MissingMessageFile { language: language.to_string(), path });
            }

            let content = fs::read_to_string(&path)
                .map_err(|source| LoadError::Io { path: path.clone(), source })?;
            tracing::info!("Loaded message file {} for {}", path.display(), language);
            sources.push((language.clone(), content));
        }

        Self::from_sources(default_language.clone(), sources)
    }

    /// Build a bundle from in-memory message file contents, in supported-language order.
    pub fn from_sources<S: AsRef<str>>(
        default_language: LanguageIdentifier,
        sources: Vec<(LanguageIdentifier, S)>,
    ) -> Result<Self, LoadError> {
        let mut languages: Vec<LanguageIdentifier> = Vec::with_capacity(sources.len());
        let mut catalogs = HashMap::with_capacity(sources.len());

        for (language, source) in sources {
            if languages.contains(&language) {
                continue;
            }

            let messages = parse_messages(source.as_ref())
                .map_err(|source| LoadError::Parse { language: language.to_string(), source })?;
            tracing::debug!("Parsed {} messages for {}", messages.len(), language);

            catalogs.insert(language.clone(), Catalog::build(&language, messages)?);
            languages.push(language);
        }

        check_languages(&languages, &default_language)?;

        let bundle = Self { default_language, languages, catalogs };
        bundle.warn_untranslated();
        Ok(bundle)
    }

    pub fn default_language(&self) -> &LanguageIdentifier {
        &self.default_language
    }

    pub fn languages(&self) -> &[LanguageIdentifier] {
        &self.languages
    }

    pub fn message(&self, id: &str, language: &LanguageIdentifier) -> Option<&Message> {
        self.catalogs.get(language)?.messages.get(id).map(CompiledMessage::message)
    }

    /// Find `id` for `language`, falling back to the default language.
    ///
    /// Returns the language the message was actually found in.
    pub(crate) fn lookup(
        &self,
        id: &str,
        language: &LanguageIdentifier,
    ) -> Option<(&LanguageIdentifier, &CompiledMessage)> {
        [language, &self.default_language].into_iter().find_map(|lang| {
            let (lang, catalog) = self.catalogs.get_key_value(lang)?;
            catalog.messages.get(id).map(|message| (lang, message))
        })
    }

    /// CLDR cardinal category of `count` in `language`.
    pub(crate) fn plural_category(
        &self,
        language: &LanguageIdentifier,
        count: &str,
    ) -> Result<PluralCategory, &'static str> {
        match self.catalogs.get(language) {
            Some(catalog) => catalog.plural_rules.select(count),
            None => Ok(PluralCategory::OTHER),
        }
    }

    fn warn_untranslated(&self) {
        let Some(default) = self.catalogs.get(&self.default_language) else {
            return;
        };

        for language in self.languages.iter().filter(|l| **l != self.default_language) {
            let Some(catalog) = self.catalogs.get(language) else {
                continue;
            };
            for id in default.messages.keys().filter(|id| !catalog.messages.contains_key(*id)) {
                tracing::warn!(
                    "Message {} has no {} translation, {} will be used",
                    id,
                    language,
                    self.default_language
                );
            }
        }
    }
}

impl fmt::Debug for MessageBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBundle")
            .field("default_language", &self.default_language)
            .field("languages", &self.languages)
            .finish_non_exhaustive()
    }
}

pub fn message_file_path(dir: &Path, language: &LanguageIdentifier) -> PathBuf {
    dir.join(format!("active.{}.toml", language))
}

fn check_languages(
    languages: &[LanguageIdentifier],
    default_language: &LanguageIdentifier,
) -> Result<(), LoadError> {
    if languages.is_empty() {
        return Err(LoadError::NoLanguages);
    }
    if !languages.contains(default_language) {
        return Err(LoadError::UnsupportedDefaultLanguage(default_language.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> LanguageIdentifier {
        s.parse().unwrap()
    }

    const EN: &str = r#"
[PersonCats]
one = "{{.Name}} has {{.Count}} cat."
other = "{{.Name}} has {{.Count}} cats."

[OnlyEnglish]
other = "english only"
"#;

    const ZH: &str = r#"
PersonCats = "{{.Name}} 有 {{.Count}} 只猫。"
"#;

    #[test]
    fn test_lookup_falls_back_to_default_language() {
        let bundle =
            MessageBundle::from_sources(tag("en-US"), vec![(tag("en-US"), EN), (tag("zh-CN"), ZH)])
                .unwrap();

        let (lang, _) = bundle.lookup("PersonCats", &tag("zh-CN")).unwrap();
        assert_eq!(*lang, tag("zh-CN"));

        let (lang, _) = bundle.lookup("OnlyEnglish", &tag("zh-CN")).unwrap();
        assert_eq!(*lang, tag("en-US"));

        assert!(bundle.lookup("Unknown", &tag("zh-CN")).is_none());
        assert_eq!(bundle.languages(), &[tag("en-US"), tag("zh-CN")]);
    }

    #[test]
    fn test_plural_categories_follow_language_rules() {
        let bundle =
            MessageBundle::from_sources(tag("en-US"), vec![(tag("en-US"), EN), (tag("zh-CN"), ZH)])
                .unwrap();

        assert_eq!(bundle.plural_category(&tag("en-US"), "1"), Ok(PluralCategory::ONE));
        assert_eq!(bundle.plural_category(&tag("en-US"), "2"), Ok(PluralCategory::OTHER));
        assert_eq!(bundle.plural_category(&tag("zh-CN"), "1"), Ok(PluralCategory::OTHER));
    }

    #[test]
    fn test_default_language_must_be_supported() {
        let result = MessageBundle::from_sources(tag("fr"), vec![(tag("en-US"), EN)]);
        assert!(matches!(result, Err(LoadError::UnsupportedDefaultLanguage(_))));
    }

    #[test]
    fn test_message_without_other_form_is_rejected() {
        let source = "[Cats]\none = \"a cat\"\n";
        let result = MessageBundle::from_sources(tag("en-US"), vec![(tag("en-US"), source)]);
        assert!(matches!(result, Err(LoadError::MissingOtherForm { .. })));
    }

    #[test]
    fn test_unparseable_file_is_rejected() {
        let result = MessageBundle::from_sources(tag("en-US"), vec![(tag("en-US"), "= nope")]);
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[test]
    fn test_load_requires_every_language_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("active.en-US.toml"), EN).unwrap();

        let result = MessageBundle::load(dir.path(), &[tag("en-US"), tag("zh-CN")], &tag("en-US"));
        match result {
            Err(LoadError::MissingMessageFile { language, .. }) => assert_eq!(language, "zh-CN"),
            other => panic!("unexpected result: {:?}", other),
        }

        fs::write(dir.path().join("active.zh-CN.toml"), ZH).unwrap();
        let bundle =
            MessageBundle::load(dir.path(), &[tag("en-US"), tag("zh-CN")], &tag("en-US")).unwrap();
        assert!(bundle.message("PersonCats", &tag("zh-CN")).is_some());
    }
}
