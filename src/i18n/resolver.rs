//! Language resolution: client preferences -> loaded handle.

use crate::error::LocalizeError;
use crate::i18n::{HandleSet, LanguageHandle, LanguagePreference, LanguageTag};
use std::sync::Arc;
use tracing::debug;

/// Picks the best loaded language handle for a client.
pub struct LanguageResolver;

impl LanguageResolver {
    /// Resolve a raw `Accept-Language` value against the loaded handles.
    ///
    /// Walks the parsed, super-expanded preferences and returns the first
    /// loaded handle. Falls back to `default_language`; if that is not loaded
    /// either, returns [`LocalizeError::NoLanguageAvailable`].
    pub fn resolve(
        raw_accept_language: &str,
        handles: &HandleSet,
        default_language: &LanguageTag,
    ) -> Result<Arc<LanguageHandle>, LocalizeError> {
        let preference = LanguagePreference::parse(raw_accept_language);
        Self::resolve_preference(&preference, handles, default_language)
    }

    /// Resolve an already-built preference list.
    pub fn resolve_preference(
        preference: &LanguagePreference,
        handles: &HandleSet,
        default_language: &LanguageTag,
    ) -> Result<Arc<LanguageHandle>, LocalizeError> {
        let expanded = preference.implicate_supers();

        if let Some(handle) = expanded.tags().iter().find_map(|tag| handles.get(tag)) {
            return Ok(Arc::clone(handle));
        }

        debug!(
            "No preferred language loaded ({:?}), trying default '{}'",
            expanded.tags(),
            default_language
        );

        handles
            .get(default_language)
            .map(Arc::clone)
            .ok_or_else(|| LocalizeError::NoLanguageAvailable {
                default: default_language.to_string(),
            })
    }
}
