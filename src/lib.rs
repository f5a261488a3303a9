//! Database-backed localization lookup.
//!
//! Language handles are loaded from a `lexicon` table once at startup.
//! Requests are resolved to the best loaded language from their
//! `Accept-Language` preferences, keys are looked up in priority-ordered
//! lexicons, and missing keys are recorded back to the table so they can
//! be translated.

pub mod config;
pub mod db;
pub mod error;
pub mod i18n;
pub mod loader;
pub mod localizer;
pub mod retry;
pub mod server;

pub use error::{LocalizeError, StoreError};
pub use localizer::{Localized, Localizer};
