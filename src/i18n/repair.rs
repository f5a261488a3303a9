//! Miss-repair strategies: what happens when a key is not in any lexicon.

use crate::db::{LexiconStore, MissRecord};
use crate::error::LocalizeError;
use crate::i18n::LanguageTag;
use async_trait::async_trait;
use tracing::info;

/// Result of a repair attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    /// A placeholder row was written
    Inserted,
    /// A row for this key already exists; nothing written
    AlreadyPresent,
    /// Repair is turned off; storage was not touched
    Disabled,
}

/// Strategy invoked by [`LexiconLookup`](crate::i18n::LexiconLookup) on a miss.
#[async_trait]
pub trait MissRepair: Send + Sync {
    async fn repair(&self, language: &LanguageTag, key: &str)
        -> Result<RepairOutcome, LocalizeError>;
}

/// Records missing keys in a [`LexiconStore`] under one lexicon.
///
/// The existence check and the insert are separate statements, so two
/// concurrent misses for the same key can both insert. Such duplicates are
/// harmless for lookups and are tolerated.
pub struct StoreRepair<S> {
    store: S,
    lexicon: String,
}

impl<S: LexiconStore> StoreRepair<S> {
    /// Repair into `lexicon` (the default lexicon) of `store`.
    pub fn new(store: S, lexicon: impl Into<String>) -> Self {
        Self {
            store,
            lexicon: lexicon.into(),
        }
    }
}

#[async_trait]
impl<S: LexiconStore> MissRepair for StoreRepair<S> {
    async fn repair(
        &self,
        language: &LanguageTag,
        key: &str,
    ) -> Result<RepairOutcome, LocalizeError> {
        let write_error = |source| LocalizeError::RepairWrite {
            lexicon: self.lexicon.clone(),
            key: key.to_string(),
            language: language.to_string(),
            source,
        };

        let existing = self
            .store
            .find_entry(&self.lexicon, key, language)
            .await
            .map_err(write_error)?;
        if existing.is_some() {
            return Ok(RepairOutcome::AlreadyPresent);
        }

        let record = MissRecord::new(self.lexicon.as_str(), key, language.clone());
        self.store.insert_miss(&record).await.map_err(write_error)?;

        info!(
            "Recorded missing key '{}' for {} in lexicon '{}'",
            key, language, self.lexicon
        );
        Ok(RepairOutcome::Inserted)
    }
}

/// Repair turned off: misses are never persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRepair;

#[async_trait]
impl MissRepair for DisabledRepair {
    async fn repair(
        &self,
        _language: &LanguageTag,
        _key: &str,
    ) -> Result<RepairOutcome, LocalizeError> {
        Ok(RepairOutcome::Disabled)
    }
}
