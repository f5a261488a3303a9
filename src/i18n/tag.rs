//! Language tag: normalized, validated language identifier.
//!
//! Tags are compared after normalization, so `en_US`, `EN-us` and `en-us`
//! all name the same language.

use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A normalized language tag (e.g. "en", "en-us", "zh-hant-tw").
///
/// Normalization lowercases the tag, turns `_` into `-` and trims
/// surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Parse and normalize a language tag.
    ///
    /// # Returns
    /// * `Ok(LanguageTag)` for tags made of `-`/`_` separated alphanumeric
    ///   subtags (1-8 chars each) whose primary subtag is alphabetic
    /// * `Err` for empty or malformed input
    pub fn parse(raw: &str) -> Result<LanguageTag> {
        let normalized = raw.trim().replace('_', "-").to_ascii_lowercase();

        if normalized.is_empty() {
            bail!("Empty language tag");
        }

        for (idx, subtag) in normalized.split('-').enumerate() {
            if subtag.is_empty() || subtag.len() > 8 {
                bail!("Invalid language tag: '{}'", raw);
            }
            let valid = if idx == 0 {
                subtag.chars().all(|c| c.is_ascii_alphabetic())
            } else {
                subtag.chars().all(|c| c.is_ascii_alphanumeric())
            };
            if !valid {
                bail!("Invalid language tag: '{}'", raw);
            }
        }

        Ok(LanguageTag(normalized))
    }

    /// The normalized tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Broader tags implied by this one, most specific first.
    ///
    /// `zh-hant-tw` implies `zh-hant` then `zh`. Single-letter prefixes such
    /// as the `x` of private-use tags or the `i` of IANA tags are not
    /// languages and are never yielded.
    pub fn supers(&self) -> Vec<LanguageTag> {
        let mut supers = Vec::new();
        let mut current = self.0.as_str();

        while let Some(pos) = current.rfind('-') {
            current = &current[..pos];
            if current.len() == 1 {
                break;
            }
            supers.push(LanguageTag(current.to_string()));
        }

        supers
    }

    /// Whether `self` is a strictly more specific form of `other`
    /// (`en-us` is a more specific form of `en`).
    pub fn is_more_specific_than(&self, other: &LanguageTag) -> bool {
        self.0.len() > other.0.len()
            && self.0.starts_with(other.as_str())
            && self.0.as_bytes()[other.0.len()] == b'-'
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        LanguageTag::parse(s)
    }
}

impl AsRef<str> for LanguageTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
