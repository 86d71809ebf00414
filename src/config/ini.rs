use std::{collections::BTreeMap, fmt::Write as _, str::FromStr};

use tracing::debug;

use crate::{Float, PsoError, Result};

/// A parsed INI document: named sections of `key = value` pairs.
///
/// Section and key names are matched case-insensitively. Blank lines and lines starting with `;`
/// or `#` are skipped; a repeated key keeps its last value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ini {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Ini {
    /// Parse INI text.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] for a line which is neither a section header nor a
    /// `key = value` pair, or for a pair outside of any section.
    pub fn parse(text: &str) -> Result<Self> {
        let mut ini = Self::default();
        let mut current: Option<String> = None;
        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim().to_ascii_lowercase();
                ini.sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(PsoError::config(format!(
                    "line {}: expected `key = value`, found `{line}`",
                    n + 1
                )));
            };
            let Some(section) = &current else {
                return Err(PsoError::config(format!(
                    "line {}: `{}` appears before any section",
                    n + 1,
                    key.trim()
                )));
            };
            let key = key.trim().to_ascii_lowercase();
            let previous = ini
                .sections
                .entry(section.clone())
                .or_default()
                .insert(key.clone(), value.trim().to_string());
            if previous.is_some() {
                debug!("[{section}] {key} given more than once, keeping the last value");
            }
        }
        Ok(ini)
    }

    /// Returns `true` if the section exists (even if empty).
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(&section.to_ascii_lowercase())
    }

    /// The keys of a section, in sorted order.
    pub fn keys<'a>(&'a self, section: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.sections
            .get(&section.to_ascii_lowercase())
            .into_iter()
            .flat_map(|s| s.keys().map(String::as_str))
    }

    /// The raw value of `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section.to_ascii_lowercase())?
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The raw value of a key which must be present.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] naming the section and key if it is missing.
    pub fn require(&self, section: &str, key: &str) -> Result<&str> {
        self.get(section, key)
            .ok_or_else(|| PsoError::config(format!("[{section}] {key}: missing required key")))
    }

    /// Parse an optional value with [`ConfigValue`].
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] naming the section and key if the value is present
    /// but malformed.
    pub fn parse_opt<T: ConfigValue>(&self, section: &str, key: &str) -> Result<Option<T>> {
        self.get(section, key)
            .map(|raw| {
                T::parse_value(raw).ok_or_else(|| {
                    PsoError::config(format!(
                        "[{section}] {key}: cannot read `{raw}` as {}",
                        T::DESCRIPTION
                    ))
                })
            })
            .transpose()
    }

    /// Parse a required value with [`ConfigValue`].
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] if the key is missing or malformed.
    pub fn parse_req<T: ConfigValue>(&self, section: &str, key: &str) -> Result<T> {
        self.parse_opt(section, key)?
            .ok_or_else(|| PsoError::config(format!("[{section}] {key}: missing required key")))
    }

    /// Parse an optional value, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] if the value is present but malformed.
    pub fn parse_or<T: ConfigValue>(&self, section: &str, key: &str, default: T) -> Result<T> {
        Ok(self.parse_opt(section, key)?.unwrap_or(default))
    }

    /// Render the document, sections and keys in the given order with a blank line after each
    /// section header and between sections.
    pub fn render(layout: &[(&str, Vec<(&str, String)>)]) -> String {
        let mut out = String::new();
        for (i, (section, pairs)) in layout.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "[{section}]\n");
            for (key, value) in pairs {
                let _ = writeln!(out, "{key} = {value}");
            }
        }
        out
    }
}

/// A value which can be read from an INI entry.
pub trait ConfigValue: Sized {
    /// What the value should look like, for error messages.
    const DESCRIPTION: &'static str;
    /// Parse the trimmed text of an entry.
    fn parse_value(raw: &str) -> Option<Self>;
}

/// Parse a decimal number, also accepting a single `,` as the decimal separator.
fn parse_number<T: FromStr>(raw: &str) -> Option<T> {
    raw.parse().ok().or_else(|| {
        if raw.matches(',').count() == 1 && !raw.contains('.') {
            raw.replace(',', ".").parse().ok()
        } else {
            None
        }
    })
}

impl ConfigValue for Float {
    const DESCRIPTION: &'static str = "a number";
    fn parse_value(raw: &str) -> Option<Self> {
        parse_number(raw)
    }
}

impl ConfigValue for u64 {
    const DESCRIPTION: &'static str = "a non-negative integer";
    fn parse_value(raw: &str) -> Option<Self> {
        raw.parse().ok().or_else(|| {
            // integers written as `1.0`
            let v: f64 = parse_number(raw)?;
            (v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64).then_some(v as Self)
        })
    }
}

impl ConfigValue for usize {
    const DESCRIPTION: &'static str = "a non-negative integer";
    fn parse_value(raw: &str) -> Option<Self> {
        u64::parse_value(raw).and_then(|v| Self::try_from(v).ok())
    }
}

impl ConfigValue for u32 {
    const DESCRIPTION: &'static str = "a non-negative integer";
    fn parse_value(raw: &str) -> Option<Self> {
        u64::parse_value(raw).and_then(|v| Self::try_from(v).ok())
    }
}

impl ConfigValue for bool {
    const DESCRIPTION: &'static str = "0 or 1";
    fn parse_value(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "0" | "false" => Some(false),
            "1" | "true" => Some(true),
            _ => None,
        }
    }
}

impl ConfigValue for String {
    const DESCRIPTION: &'static str = "text";
    fn parse_value(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}
