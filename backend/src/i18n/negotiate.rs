//! Accept-Language parsing and language matching.

use std::cmp::Ordering;

use fluent_langneg::{NegotiationStrategy, negotiate_languages};
use unic_langid::LanguageIdentifier;

// Anything beyond this many preferences is ignored.
const MAX_PREFERENCES: usize = 32;

/// One `tag;q=weight` preference from an Accept-Language header.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTag {
    pub tag: LanguageIdentifier,
    pub quality: f32,
}

/// Parse an Accept-Language value into preferences ordered by descending weight.
///
/// Entries that cannot be parsed, carry an out-of-range weight, have weight 0
/// or are the `*` wildcard are dropped. Equal weights keep header order.
pub fn parse_accept_language(header: &str) -> Vec<WeightedTag> {
    let mut tags: Vec<WeightedTag> =
        header.split(',').take(MAX_PREFERENCES).filter_map(parse_entry).collect();

    // sort_by is stable
    tags.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));
    tags
}

fn parse_entry(entry: &str) -> Option<WeightedTag> {
    let mut parts = entry.split(';');
    let tag = parts.next()?.trim();
    if tag.is_empty() || tag == "*" {
        return None;
    }

    let mut quality = 1.0_f32;
    for param in parts {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("q") {
            quality = value.trim().parse::<f32>().ok().filter(|q| (0.0..=1.0).contains(q))?;
        }
    }
    if quality <= 0.0 {
        return None;
    }

    let tag = tag.parse::<LanguageIdentifier>().ok()?;
    Some(WeightedTag { tag, quality })
}

/// Matches requested languages against the supported set.
///
/// Built once at startup and shared by every request.
#[derive(Debug, Clone)]
pub struct LanguageMatcher {
    supported: Vec<LanguageIdentifier>,
    default: LanguageIdentifier,
}

impl LanguageMatcher {
    pub fn new(supported: Vec<LanguageIdentifier>, default: LanguageIdentifier) -> Self {
        Self { supported, default }
    }

    pub fn supported(&self) -> &[LanguageIdentifier] {
        &self.supported
    }

    pub fn default_language(&self) -> &LanguageIdentifier {
        &self.default
    }

    /// Best supported language for `requested` (most preferred first).
    ///
    /// Falls back to the default language when nothing matches.
    pub fn select(&self, requested: &[LanguageIdentifier]) -> &LanguageIdentifier {
        if requested.is_empty() {
            return &self.default;
        }

        negotiate_languages(
            requested,
            &self.supported,
            Some(&self.default),
            NegotiationStrategy::Lookup,
        )
        .first()
        .copied()
        .unwrap_or(&self.default)
    }

    pub fn match_header(&self, header: &str) -> &LanguageIdentifier {
        let requested: Vec<LanguageIdentifier> =
            parse_accept_language(header).into_iter().map(|w| w.tag).collect();
        self.select(&requested)
    }
}
