//! Request timezone resolution backed by the IANA database in `chrono-tz`.

use chrono_tz::Tz;
use thiserror::Error;

pub const DEFAULT_TIMEZONE: &str = "Asia/Shanghai";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimezoneError {
    #[error("Unknown timezone: {0}")]
    Unknown(String),
}

/// Resolves timezone names, falling back to a fixed default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneResolver {
    default: Tz,
}

impl TimezoneResolver {
    /// An unknown default name is a configuration error.
    pub fn new(default_name: &str) -> Result<Self, TimezoneError> {
        let default = parse_timezone(default_name)
            .ok_or_else(|| TimezoneError::Unknown(default_name.to_string()))?;
        Ok(Self { default })
    }

    pub fn default_timezone(&self) -> Tz {
        self.default
    }

    /// Missing, empty or unknown names resolve to the default.
    pub fn resolve(&self, name: Option<&str>) -> Tz {
        match name.and_then(parse_timezone) {
            Some(tz) => tz,
            None => {
                if let Some(name) = name {
                    tracing::debug!("Unknown timezone {:?}, using {}", name, self.default);
                }
                self.default
            },
        }
    }
}

impl Default for TimezoneResolver {
    fn default() -> Self {
        Self { default: Tz::Asia__Shanghai }
    }
}

fn parse_timezone(name: &str) -> Option<Tz> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    name.parse::<Tz>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_shanghai() {
        let resolver = TimezoneResolver::default();
        assert_eq!(resolver.default_timezone(), Tz::Asia__Shanghai);
        assert_eq!(resolver, TimezoneResolver::new(DEFAULT_TIMEZONE).unwrap());
    }

    #[test]
    fn test_valid_name_resolves_exactly() {
        let resolver = TimezoneResolver::default();
        assert_eq!(resolver.resolve(Some("America/New_York")), Tz::America__New_York);
        assert_eq!(resolver.resolve(Some(" Europe/London ")), Tz::Europe__London);
        assert_eq!(resolver.resolve(Some("UTC")), Tz::UTC);
    }

    #[test]
    fn test_missing_or_unknown_falls_back() {
        let resolver = TimezoneResolver::default();
        assert_eq!(resolver.resolve(None), Tz::Asia__Shanghai);
        assert_eq!(resolver.resolve(Some("")), Tz::Asia__Shanghai);
        assert_eq!(resolver.resolve(Some("Mars/Olympus_Mons")), Tz::Asia__Shanghai);
    }

    #[test]
    fn test_custom_default() {
        let resolver = TimezoneResolver::new("Europe/Paris").unwrap();
        assert_eq!(resolver.resolve(Some("nope")), Tz::Europe__Paris);
    }

    #[test]
    fn test_invalid_default_is_rejected() {
        assert_eq!(
            TimezoneResolver::new("Not/AZone"),
            Err(TimezoneError::Unknown("Not/AZone".to_string()))
        );
    }
}
