//! Typed helpers for the messages shipped in `translations/`.
//!
//! Each helper carries an English default message, used when a deployment's
//! message files lack the id.

use intl_pluralrules::PluralCategory;

use super::localizer::{LocalizeConfig, Localizer};
use super::message::Message;

pub const CURRENT_LANGUAGE: &str = "CurrentLanguage";
pub const PERSON_CATS: &str = "PersonCats";
pub const MY_CATS: &str = "MyCats";
pub const HELLO: &str = "Hello";

/// "Current language: {curLang}"
pub fn current_language(localizer: &Localizer, cur_lang: &str) -> String {
    localizer.render(
        &LocalizeConfig::new(CURRENT_LANGUAGE)
            .with_data("curLang", cur_lang)
            .with_default_message(
                Message::new(CURRENT_LANGUAGE, "Current language: {{.curLang}}")
                    .with_description("Shows the language selected for the current request"),
            ),
    )
}

/// "{Name} has {Count} cat(s)."
pub fn person_cats(localizer: &Localizer, name: &str, count: i64) -> String {
    localizer.render(
        &LocalizeConfig::new(PERSON_CATS)
            .with_data("Name", name)
            .with_data("Count", count)
            .with_plural_count(count)
            .with_default_message(
                Message::new(PERSON_CATS, "{{.Name}} has {{.Count}} cats.")
                    .with_form(PluralCategory::ONE, "{{.Name}} has {{.Count}} cat.")
                    .with_description("How many cats a person has"),
            ),
    )
}

/// "I have {count} cat(s)." (uses `<<` / `>>` delimiters)
pub fn my_cats(localizer: &Localizer, count: i64) -> String {
    localizer.render(
        &LocalizeConfig::new(MY_CATS)
            .with_data("count", count)
            .with_plural_count(count)
            .with_default_message(
                Message::new(MY_CATS, "I have <<.count>> cats.")
                    .with_form(PluralCategory::ONE, "I have <<.count>> cat.")
                    .with_delimiters("<<", ">>")
                    .with_description("I have n cats"),
            ),
    )
}

pub fn hello(localizer: &Localizer, username: &str) -> String {
    localizer.render(
        &LocalizeConfig::new(HELLO)
            .with_data("username", username)
            .with_default_message(Message::new(HELLO, "Hello {{.username}}.")),
    )
}
