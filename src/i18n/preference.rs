//! Accept-Language parsing and super-tag implication.

use crate::i18n::LanguageTag;
use tracing::debug;

/// Ordered language preferences, most preferred first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguagePreference {
    tags: Vec<LanguageTag>,
}

impl LanguagePreference {
    /// Build a preference list from tags already in preference order.
    ///
    /// Duplicate tags keep their first position.
    pub fn new(tags: impl IntoIterator<Item = LanguageTag>) -> Self {
        let mut deduped: Vec<LanguageTag> = Vec::new();
        for tag in tags {
            if !deduped.contains(&tag) {
                deduped.push(tag);
            }
        }
        Self { tags: deduped }
    }

    /// Parse an `Accept-Language` style header value.
    ///
    /// Tags are ordered by quality weight, highest first; equal weights keep
    /// their declaration order. `q=0` entries, wildcards and malformed tags
    /// are dropped. A malformed weight counts as `q=1`.
    ///
    /// # Example
    /// ```
    /// use lexicon_i18n::i18n::LanguagePreference;
    ///
    /// let pref = LanguagePreference::parse("fr;q=0.5, en-US, de;q=0.8");
    /// let tags: Vec<&str> = pref.tags().iter().map(|t| t.as_str()).collect();
    /// assert_eq!(tags, ["en-us", "de", "fr"]);
    /// ```
    pub fn parse(header: &str) -> Self {
        let mut weighted: Vec<(LanguageTag, f32)> = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let raw_tag = pieces.next()?.trim();
                if raw_tag.is_empty() || raw_tag == "*" {
                    return None;
                }

                let quality = pieces
                    .filter_map(|param| {
                        let (name, value) = param.split_once('=')?;
                        if name.trim().eq_ignore_ascii_case("q") {
                            let parsed = value.trim().parse::<f32>().ok().filter(|q| !q.is_nan());
                            Some(parsed.unwrap_or(1.0))
                        } else {
                            None
                        }
                    })
                    .next()
                    .unwrap_or(1.0);

                if quality <= 0.0 {
                    return None;
                }

                match LanguageTag::parse(raw_tag) {
                    Ok(tag) => Some((tag, quality)),
                    Err(e) => {
                        debug!("Skipping language preference '{}': {}", raw_tag, e);
                        None
                    }
                }
            })
            .collect();

        // Stable sort: ties keep declaration order
        weighted.sort_by(|a, b| b.1.total_cmp(&a.1));

        Self::new(weighted.into_iter().map(|(tag, _)| tag))
    }

    /// Expand the list with implied super tags.
    ///
    /// Each implied tag lands immediately after the last of its more
    /// specific forms, and a tag already present is never duplicated or
    /// moved: `en-us, fr, en-gb` becomes `en-us, fr, en-gb, en`.
    /// Expanding an expanded list returns it unchanged.
    pub fn implicate_supers(&self) -> LanguagePreference {
        let mut expanded = self.tags.clone();

        for tag in &self.tags {
            for super_tag in tag.supers() {
                if expanded.contains(&super_tag) {
                    continue;
                }
                let insert_at = expanded
                    .iter()
                    .rposition(|t| t.is_more_specific_than(&super_tag))
                    .map(|idx| idx + 1)
                    .unwrap_or(expanded.len());
                expanded.insert(insert_at, super_tag);
            }
        }

        LanguagePreference { tags: expanded }
    }

    /// Tags in preference order.
    pub fn tags(&self) -> &[LanguageTag] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
