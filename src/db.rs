use crate::error::StoreError;
use crate::i18n::LanguageTag;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Placeholder prefix written for keys that still need a translation
pub const MISSING_PREFIX: &str = "? ";

/// One (lexicon, key, language, value) row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    pub lexicon: String,
    pub key: String,
    pub language: LanguageTag,
    pub value: String,
}

impl LexiconEntry {
    pub fn new(
        lexicon: impl Into<String>,
        key: impl Into<String>,
        language: LanguageTag,
        value: impl Into<String>,
    ) -> Self {
        Self {
            lexicon: lexicon.into(),
            key: key.into(),
            language,
            value: value.into(),
        }
    }
}

/// A key that was looked up but not found, queued for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissRecord {
    pub lexicon: String,
    pub key: String,
    pub language: LanguageTag,
    /// `"? "` followed by the raw key
    pub placeholder: String,
    pub noticed_at: DateTime<Utc>,
}

impl MissRecord {
    pub fn new(lexicon: impl Into<String>, key: impl Into<String>, language: LanguageTag) -> Self {
        let key = key.into();
        Self {
            lexicon: lexicon.into(),
            placeholder: format!("{}{}", MISSING_PREFIX, key),
            key,
            language,
            noticed_at: Utc::now(),
        }
    }

    /// Note stored alongside the placeholder row
    pub fn notes(&self) -> String {
        format!("missing key noticed at {}", self.noticed_at.to_rfc3339())
    }

    pub fn to_entry(&self) -> LexiconEntry {
        LexiconEntry::new(
            self.lexicon.clone(),
            self.key.clone(),
            self.language.clone(),
            self.placeholder.clone(),
        )
    }
}

/// Persisted lexicon storage.
#[async_trait]
pub trait LexiconStore: Send + Sync {
    /// Load every entry of one lexicon for one language
    async fn load_lexicon(
        &self,
        language: &LanguageTag,
        lexicon: &str,
    ) -> Result<Vec<LexiconEntry>, StoreError>;

    /// Point read of a single (lexicon, key, language) row
    async fn find_entry(
        &self,
        lexicon: &str,
        key: &str,
        language: &LanguageTag,
    ) -> Result<Option<LexiconEntry>, StoreError>;

    /// Insert a placeholder row for a missing key
    async fn insert_miss(&self, record: &MissRecord) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: LexiconStore + ?Sized> LexiconStore for Arc<S> {
    async fn load_lexicon(
        &self,
        language: &LanguageTag,
        lexicon: &str,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        (**self).load_lexicon(language, lexicon).await
    }

    async fn find_entry(
        &self,
        lexicon: &str,
        key: &str,
        language: &LanguageTag,
    ) -> Result<Option<LexiconEntry>, StoreError> {
        (**self).find_entry(lexicon, key, language).await
    }

    async fn insert_miss(&self, record: &MissRecord) -> Result<(), StoreError> {
        (**self).insert_miss(record).await
    }
}

// ==================== PostgreSQL ====================

/// Lexicon storage backed by the PostgreSQL `lexicon` table:
///
/// ```sql
/// CREATE TABLE lexicon (
///     id        SERIAL PRIMARY KEY,
///     lang      VARCHAR(15),
///     lex       VARCHAR(255),
///     lex_key   TEXT,
///     lex_value TEXT,
///     notes     TEXT
/// );
/// ```
///
/// Stored language codes are compared after normalization, so rows written
/// as `pt_BR` are found for `pt-br`.
#[derive(Clone)]
pub struct PgLexiconStore {
    pool: PgPool,
}

impl PgLexiconStore {
    /// Build connection options from a DSN, with optional credentials
    /// overriding any embedded in the DSN.
    pub fn connect_options(
        dsn: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<PgConnectOptions, StoreError> {
        let mut options = PgConnectOptions::from_str(dsn)?;
        if let Some(user) = user {
            options = options.username(user);
        }
        if let Some(password) = password {
            options = options.password(password);
        }
        Ok(options)
    }

    /// Open a single eager connection for the startup load phase.
    ///
    /// Call [`close`](Self::close) once loading is finished.
    pub async fn connect_startup(options: PgConnectOptions) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Create a lazily-connecting pool for miss-repair writes.
    ///
    /// No connection is opened until the first write.
    pub fn connect_lazy(options: PgConnectOptions) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect_lazy_with(options);
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl LexiconStore for PgLexiconStore {
    async fn load_lexicon(
        &self,
        language: &LanguageTag,
        lexicon: &str,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(
            r#"
            SELECT lex_key, lex_value
            FROM lexicon
            WHERE lower(replace(lang, '_', '-')) = $1 AND lex = $2
            ORDER BY id
            "#,
        )
        .bind(language.as_str())
        .bind(lexicon)
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .filter_map(|(key, value)| {
                value.map(|value| LexiconEntry::new(lexicon, key, language.clone(), value))
            })
            .collect();

        Ok(entries)
    }

    async fn find_entry(
        &self,
        lexicon: &str,
        key: &str,
        language: &LanguageTag,
    ) -> Result<Option<LexiconEntry>, StoreError> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            r#"
            SELECT lex_value
            FROM lexicon
            WHERE lex = $1 AND lex_key = $2 AND lower(replace(lang, '_', '-')) = $3
            LIMIT 1
            "#,
        )
        .bind(lexicon)
        .bind(key)
        .bind(language.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(value,)| {
            LexiconEntry::new(lexicon, key, language.clone(), value.unwrap_or_default())
        }))
    }

    async fn insert_miss(&self, record: &MissRecord) -> Result<(), StoreError> {
        // Plain insert: concurrent identical misses may leave duplicate rows
        sqlx::query(
            r#"
            INSERT INTO lexicon (lang, lex, lex_key, lex_value, notes)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.language.as_str())
        .bind(&record.lexicon)
        .bind(&record.key)
        .bind(&record.placeholder)
        .bind(record.notes())
        .execute(&self.pool)
        .await?;

        debug!(
            "Inserted placeholder for '{}' ({}/{})",
            record.key, record.lexicon, record.language
        );
        Ok(())
    }
}

// ==================== In-memory ====================

/// Process-local lexicon storage for development and tests.
#[derive(Debug, Default)]
pub struct MemoryLexiconStore {
    rows: Mutex<Vec<LexiconEntry>>,
}

impl MemoryLexiconStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = LexiconEntry>) -> Self {
        Self {
            rows: Mutex::new(entries.into_iter().collect()),
        }
    }

    /// Add a row directly (no duplicate check)
    pub fn insert(&self, entry: LexiconEntry) -> Result<(), StoreError> {
        self.lock()?.push(entry);
        Ok(())
    }

    /// Snapshot of all stored rows, in insertion order
    pub fn rows(&self) -> Result<Vec<LexiconEntry>, StoreError> {
        Ok(self.lock()?.clone())
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<LexiconEntry>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable("lexicon store lock poisoned".to_string()))
    }
}

#[async_trait]
impl LexiconStore for MemoryLexiconStore {
    async fn load_lexicon(
        &self,
        language: &LanguageTag,
        lexicon: &str,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|row| &row.language == language && row.lexicon == lexicon)
            .cloned()
            .collect())
    }

    async fn find_entry(
        &self,
        lexicon: &str,
        key: &str,
        language: &LanguageTag,
    ) -> Result<Option<LexiconEntry>, StoreError> {
        Ok(self
            .lock()?
            .iter()
            .find(|row| row.lexicon == lexicon && row.key == key && &row.language == language)
            .cloned())
    }

    async fn insert_miss(&self, record: &MissRecord) -> Result<(), StoreError> {
        self.insert(record.to_entry())
    }
}
