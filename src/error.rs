use thiserror::Error;

/// Failures reported by a [`LexiconStore`](crate::db::LexiconStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Localization failures.
///
/// None of these ever reach a caller of `loc`/`lookup`: they are logged and
/// the caller receives a degraded string instead.
#[derive(Debug, Error)]
pub enum LocalizeError {
    /// Neither a preferred language nor the default language is loaded.
    #[error("no language handle available (default language '{default}' is not loaded)")]
    NoLanguageAvailable { default: String },

    /// A configured (language, lexicon) pair could not be loaded at startup.
    #[error("failed to load lexicon '{lexicon}' for language '{language}': {source}")]
    LexiconLoad {
        language: String,
        lexicon: String,
        #[source]
        source: StoreError,
    },

    /// Persisting a missing key failed.
    #[error("failed to record missing key '{key}' in lexicon '{lexicon}' for language '{language}': {source}")]
    RepairWrite {
        lexicon: String,
        key: String,
        language: String,
        #[source]
        source: StoreError,
    },
}
