//! Placeholder substitution for message templates.
//!
//! Templates reference values as `{{.name}}` (or `<left>.name<right>` for a
//! custom delimiter pair). Only plain field references are supported.

use std::collections::BTreeMap;

use regex::Regex;

pub const DEFAULT_LEFT_DELIM: &str = "{{";
pub const DEFAULT_RIGHT_DELIM: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    MissingValue(String),
    Malformed(String),
}

/// A compiled delimiter pair.
#[derive(Debug, Clone)]
pub struct Template {
    left: String,
    pattern: Regex,
}

impl Template {
    pub fn new(left: &str, right: &str) -> Result<Self, String> {
        if left.is_empty() || right.is_empty() {
            return Err("delimiters must not be empty".to_string());
        }

        let pattern = Regex::new(&format!(
            r"{}\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*{}",
            regex::escape(left),
            regex::escape(right)
        ))
        .map_err(|e| e.to_string())?;

        Ok(Self { left: left.to_string(), pattern })
    }

    /// Substitute every placeholder in `source` with its value from `data`.
    pub fn execute(
        &self,
        source: &str,
        data: &BTreeMap<String, String>,
    ) -> Result<String, TemplateError> {
        if !source.contains(&self.left) {
            return Ok(source.to_string());
        }

        let mut out = String::with_capacity(source.len());
        let mut last = 0;

        for caps in self.pattern.captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            let literal = &source[last..whole.start()];
            self.check_literal(literal)?;
            out.push_str(literal);

            let value = data
                .get(name.as_str())
                .ok_or_else(|| TemplateError::MissingValue(name.as_str().to_string()))?;
            out.push_str(value);

            last = whole.end();
        }

        let tail = &source[last..];
        self.check_literal(tail)?;
        out.push_str(tail);

        Ok(out)
    }

    // A left delimiter outside a recognised placeholder means the template is broken.
    fn check_literal(&self, literal: &str) -> Result<(), TemplateError> {
        match literal.find(&self.left) {
            Some(pos) => Err(TemplateError::Malformed(literal[pos..].chars().take(16).collect())),
            None => Ok(()),
        }
    }
}
