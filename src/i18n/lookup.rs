//! Keyed lexicon lookup with the miss-repair protocol.

use crate::i18n::{interpolate, LanguageHandle, LookupMetrics, MissRepair};
use std::sync::Arc;
use tracing::{debug, error};

/// Looks keys up in a language handle, repairing misses.
///
/// On a hit the stored value is interpolated and returned. On a miss the
/// injected [`MissRepair`] strategy runs once and the raw key is returned;
/// repair failures are logged and never reach the caller.
pub struct LexiconLookup {
    repair: Arc<dyn MissRepair>,
    metrics: Arc<LookupMetrics>,
}

impl LexiconLookup {
    pub fn new(repair: Arc<dyn MissRepair>) -> Self {
        Self {
            repair,
            metrics: Arc::new(LookupMetrics::new()),
        }
    }

    pub fn metrics(&self) -> &Arc<LookupMetrics> {
        &self.metrics
    }

    /// Look `key` up in `handle`, searching lexicons in priority order.
    pub async fn lookup(
        &self,
        handle: &LanguageHandle,
        key: &str,
        args: &[String],
        lexicon_priority: &[String],
    ) -> String {
        if let Some(value) = lexicon_priority
            .iter()
            .find_map(|lexicon| handle.get(lexicon, key))
        {
            self.metrics.record_hit();
            return interpolate(value, args).into_owned();
        }

        self.metrics.record_miss();
        debug!("Key '{}' not found for language {}", key, handle.tag());

        match self.repair.repair(handle.tag(), key).await {
            Ok(outcome) => self.metrics.record_repair(outcome),
            Err(e) => {
                self.metrics.record_repair_failure();
                error!("{}", e);
            }
        }

        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{LexiconEntry, LexiconStore, MemoryLexiconStore, MissRecord};
    use crate::error::StoreError;
    use crate::i18n::{DisabledRepair, LanguageTag, StoreRepair};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Helper Functions ====================

    fn tag(s: &str) -> LanguageTag {
        LanguageTag::parse(s).unwrap()
    }

    fn entries(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn priority(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn english() -> LanguageHandle {
        LanguageHandle::new(tag("en")).with_lexicon(
            "messages",
            entries(&[("Hello [_1]", "Hello [_1]"), ("greeting", "Hi [_1], meet [_2]")]),
        )
    }

    fn german() -> LanguageHandle {
        LanguageHandle::new(tag("de"))
            .with_lexicon("a", entries(&[("only_a", "A")]))
            .with_lexicon("b", entries(&[("only_b", "B"), ("both", "from b")]))
            .with_lexicon("c", entries(&[("both", "from c")]))
    }

    fn repairing(store: &Arc<MemoryLexiconStore>) -> LexiconLookup {
        LexiconLookup::new(Arc::new(StoreRepair::new(Arc::clone(store), "messages")))
    }

    /// Store whose every operation fails, counting calls
    #[derive(Default)]
    struct BrokenStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LexiconStore for BrokenStore {
        async fn load_lexicon(
            &self,
            _language: &LanguageTag,
            _lexicon: &str,
        ) -> Result<Vec<LexiconEntry>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn find_entry(
            &self,
            _lexicon: &str,
            _key: &str,
            _language: &LanguageTag,
        ) -> Result<Option<LexiconEntry>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }

        async fn insert_miss(&self, _record: &MissRecord) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Unavailable("permission denied".to_string()))
        }
    }

    // ==================== Hit Tests ====================

    #[tokio::test]
    async fn test_lookup_hit_interpolates() {
        let lookup = LexiconLookup::new(Arc::new(DisabledRepair));

        let text = lookup
            .lookup(&english(), "Hello [_1]", &args(&["Catalyst"]), &priority(&["messages"]))
            .await;

        assert_eq!(text, "Hello Catalyst");
        assert_eq!(lookup.metrics().hits(), 1);
    }

    #[tokio::test]
    async fn test_lookup_hit_multiple_args() {
        let lookup = LexiconLookup::new(Arc::new(DisabledRepair));

        let text = lookup
            .lookup(&english(), "greeting", &args(&["Ann", "Bob"]), &priority(&["messages"]))
            .await;

        assert_eq!(text, "Hi Ann, meet Bob");
    }

    #[tokio::test]
    async fn test_lookup_respects_priority() {
        let lookup = LexiconLookup::new(Arc::new(DisabledRepair));
        let handle = german();

        assert_eq!(lookup.lookup(&handle, "only_b", &[], &priority(&["a", "b"])).await, "B");
        assert_eq!(lookup.lookup(&handle, "both", &[], &priority(&["b", "c"])).await, "from b");
        assert_eq!(lookup.lookup(&handle, "both", &[], &priority(&["c", "b"])).await, "from c");
    }

    #[tokio::test]
    async fn test_lookup_ignores_lexicons_outside_priority() {
        let store = Arc::new(MemoryLexiconStore::new());
        let lookup = repairing(&store);

        let text = lookup.lookup(&german(), "only_b", &[], &priority(&["a"])).await;

        assert_eq!(text, "only_b");
        assert_eq!(lookup.metrics().misses(), 1);
    }

    // ==================== Miss Repair Tests ====================

    #[tokio::test]
    async fn test_lookup_miss_returns_raw_key_and_records() {
        let store = Arc::new(MemoryLexiconStore::new());
        let lookup = repairing(&store);

        let text = lookup
            .lookup(&german(), "FooBar", &[], &priority(&["a", "b"]))
            .await;

        assert_eq!(text, "FooBar");
        assert_eq!(
            store.rows().unwrap(),
            vec![LexiconEntry::new("messages", "FooBar", tag("de"), "? FooBar")]
        );
        assert_eq!(lookup.metrics().repairs_inserted(), 1);
    }

    #[tokio::test]
    async fn test_lookup_miss_does_not_interpolate_key() {
        let store = Arc::new(MemoryLexiconStore::new());
        let lookup = repairing(&store);

        let text = lookup
            .lookup(&german(), "Missing [_1]", &args(&["x"]), &priority(&["a"]))
            .await;

        assert_eq!(text, "Missing [_1]");
    }

    #[tokio::test]
    async fn test_lookup_repeated_miss_is_idempotent() {
        let store = Arc::new(MemoryLexiconStore::new());
        let lookup = repairing(&store);
        let handle = german();

        let first = lookup.lookup(&handle, "FooBar", &[], &priority(&["a"])).await;
        let second = lookup.lookup(&handle, "FooBar", &[], &priority(&["a"])).await;

        assert_eq!(first, "FooBar");
        assert_eq!(second, "FooBar");
        assert_eq!(store.len(), 1);
        assert_eq!(lookup.metrics().repairs_present(), 1);
    }

    #[tokio::test]
    async fn test_lookup_repair_disabled_writes_nothing() {
        let store = Arc::new(MemoryLexiconStore::new());
        let lookup = LexiconLookup::new(Arc::new(DisabledRepair));

        let text = lookup.lookup(&german(), "FooBar", &[], &priority(&["a"])).await;

        assert_eq!(text, "FooBar");
        assert!(store.is_empty());
        assert_eq!(lookup.metrics().repairs_inserted(), 0);
    }

    #[tokio::test]
    async fn test_lookup_repair_failure_is_swallowed() {
        let store = Arc::new(BrokenStore::default());
        let lookup = LexiconLookup::new(Arc::new(StoreRepair::new(Arc::clone(&store), "messages")));

        let text = lookup.lookup(&german(), "FooBar", &[], &priority(&["a"])).await;

        assert_eq!(text, "FooBar");
        assert_eq!(lookup.metrics().repair_failures(), 1);
        // One point read, one insert, no retries
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }
}
