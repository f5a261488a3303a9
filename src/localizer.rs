//! The process-wide localization object.
//!
//! A `Localizer` is built once at startup from fully loaded handles and is
//! read-only afterwards. Share it behind an `Arc`.

use crate::error::LocalizeError;
use crate::i18n::{
    HandleSet, LanguageHandle, LanguagePreference, LanguageResolver, LanguageTag, LexiconLookup,
    LocArgs, MetricsReport,
};
use std::sync::Arc;
use tracing::error;

/// Result of localizing one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localized {
    /// Language the text was looked up in; `None` when no language was available
    pub language: Option<LanguageTag>,
    pub text: String,
}

pub struct Localizer {
    handles: HandleSet,
    lookup: LexiconLookup,
    default_language: LanguageTag,
    lexicon_priority: Vec<String>,
}

impl Localizer {
    pub fn new(
        handles: HandleSet,
        lookup: LexiconLookup,
        default_language: LanguageTag,
        lexicon_priority: Vec<String>,
    ) -> Self {
        Self {
            handles,
            lookup,
            default_language,
            lexicon_priority,
        }
    }

    /// Localize `key` for a raw `Accept-Language` value.
    ///
    /// Always returns a string: the interpolated translation, or the raw key
    /// when the key is missing or no language is available.
    pub async fn loc(&self, accept_language: &str, key: &str, args: impl Into<LocArgs>) -> String {
        let preference = LanguagePreference::parse(accept_language);
        self.localize_preference(&preference, key, args.into())
            .await
            .text
    }

    /// Alias for [`loc`](Self::loc).
    pub async fn localize(&self, accept_language: &str, key: &str, args: impl Into<LocArgs>) -> String {
        self.loc(accept_language, key, args).await
    }

    /// Localize `key` for an explicit preference list, reporting the
    /// language used.
    pub async fn localize_preference(
        &self,
        preference: &LanguagePreference,
        key: &str,
        args: LocArgs,
    ) -> Localized {
        let handle = match self.resolve_preference(preference) {
            Ok(handle) => handle,
            Err(_) => {
                return Localized {
                    language: None,
                    text: key.to_string(),
                }
            }
        };

        let text = self
            .lookup
            .lookup(&handle, key, args.as_slice(), &self.lexicon_priority)
            .await;

        Localized {
            language: Some(handle.tag().clone()),
            text,
        }
    }

    /// Resolve a preference list, logging when nothing is available.
    pub fn resolve_preference(
        &self,
        preference: &LanguagePreference,
    ) -> Result<Arc<LanguageHandle>, LocalizeError> {
        LanguageResolver::resolve_preference(preference, &self.handles, &self.default_language)
            .map_err(|e| {
                self.lookup.metrics().record_unresolved_language();
                error!("FATAL: {}", e);
                e
            })
    }

    /// Loaded language tags, sorted.
    pub fn languages(&self) -> Vec<&LanguageTag> {
        self.handles.tags()
    }

    pub fn default_language(&self) -> &LanguageTag {
        &self.default_language
    }

    pub fn lexicon_priority(&self) -> &[String] {
        &self.lexicon_priority
    }

    pub fn metrics(&self) -> MetricsReport {
        self.lookup.metrics().report()
    }
}
