//! The localized greeting shared by the HTTP routes and background tasks.

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;

use crate::i18n::{Localizer, messages};

/// Four lines: current language, one cat, two cats, and the time in `tz`.
pub fn render_greeting(localizer: &Localizer, tz: Tz, username: &str, now: DateTime<Utc>) -> String {
    let current_language = messages::current_language(localizer, &localizer.language().to_string());
    let person_cat = messages::person_cats(localizer, username, 1);
    let person_cats = messages::person_cats(localizer, username, 2);
    let time = format!(
        "({}) {}",
        tz,
        now.with_timezone(&tz).to_rfc3339_opts(SecondsFormat::AutoSi, true)
    );

    format!("{}\n{}\n{}\n{}", current_language, person_cat, person_cats, time)
}
