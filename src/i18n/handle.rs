//! Language handles: the loaded, read-only lexicons for one language.
//!
//! Handles are built once at startup by the loader and never mutated
//! afterwards, so lookups need no locking.

use crate::i18n::LanguageTag;
use std::collections::HashMap;
use std::sync::Arc;

/// All loaded lexicons for a single language.
#[derive(Debug, Clone)]
pub struct LanguageHandle {
    tag: LanguageTag,
    /// lexicon name -> (key -> value)
    lexicons: HashMap<String, HashMap<String, String>>,
}

impl LanguageHandle {
    /// Create an empty handle for a language.
    pub fn new(tag: LanguageTag) -> Self {
        Self {
            tag,
            lexicons: HashMap::new(),
        }
    }

    /// Add (or replace) a lexicon. Used only while building the handle.
    pub fn with_lexicon(mut self, name: impl Into<String>, entries: HashMap<String, String>) -> Self {
        self.insert_lexicon(name, entries);
        self
    }

    pub(crate) fn insert_lexicon(&mut self, name: impl Into<String>, entries: HashMap<String, String>) {
        self.lexicons.insert(name.into(), entries);
    }

    pub fn tag(&self) -> &LanguageTag {
        &self.tag
    }

    /// Look a key up in one lexicon.
    pub fn get(&self, lexicon: &str, key: &str) -> Option<&str> {
        self.lexicons
            .get(lexicon)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    /// Whether a lexicon was loaded for this language.
    pub fn has_lexicon(&self, lexicon: &str) -> bool {
        self.lexicons.contains_key(lexicon)
    }

    /// Total number of entries across all lexicons.
    pub fn entry_count(&self) -> usize {
        self.lexicons.values().map(HashMap::len).sum()
    }
}

/// The set of loaded language handles, keyed by normalized tag.
#[derive(Debug, Clone, Default)]
pub struct HandleSet {
    handles: HashMap<LanguageTag, Arc<LanguageHandle>>,
}

impl HandleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handle, replacing any handle with the same tag.
    pub fn insert(&mut self, handle: LanguageHandle) {
        self.handles.insert(handle.tag().clone(), Arc::new(handle));
    }

    pub fn get(&self, tag: &LanguageTag) -> Option<&Arc<LanguageHandle>> {
        self.handles.get(tag)
    }

    pub fn contains(&self, tag: &LanguageTag) -> bool {
        self.handles.contains_key(tag)
    }

    /// Loaded language tags, sorted.
    pub fn tags(&self) -> Vec<&LanguageTag> {
        let mut tags: Vec<&LanguageTag> = self.handles.keys().collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl FromIterator<LanguageHandle> for HandleSet {
    fn from_iter<I: IntoIterator<Item = LanguageHandle>>(iter: I) -> Self {
        let mut set = HandleSet::new();
        for handle in iter {
            set.insert(handle);
        }
        set
    }
}
