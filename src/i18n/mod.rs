//! Internationalization (i18n) core: language resolution and lexicon lookup.
//!
//! # Architecture
//!
//! - `tag`: Normalized `LanguageTag` and its implied super tags
//! - `preference`: `Accept-Language` parsing and super-tag implication
//! - `handle`: Loaded per-language lexicons (`LanguageHandle`, `HandleSet`)
//! - `resolver`: Preferences -> best loaded handle, with default fallback
//! - `interpolate`: `[_N]` positional argument substitution
//! - `repair`: Miss-repair strategies (record missing keys, or do nothing)
//! - `lookup`: Priority-ordered keyed lookup driving the repair strategy
//! - `metrics`: Lookup observability
//!
//! # Example
//!
//! ```rust,ignore
//! use lexicon_i18n::i18n::{LanguageResolver, LexiconLookup, DisabledRepair};
//!
//! let handle = LanguageResolver::resolve("de-AT, en;q=0.5", &handles, &default)?;
//! let lookup = LexiconLookup::new(Arc::new(DisabledRepair));
//! let text = lookup.lookup(&handle, "Hello [_1]", &args, &priority).await;
//! ```

mod handle;
mod interpolate;
mod lookup;
mod metrics;
mod preference;
mod repair;
mod resolver;
mod tag;

pub use handle::{HandleSet, LanguageHandle};
pub use interpolate::{interpolate, LocArgs};
pub use lookup::LexiconLookup;
pub use metrics::{LookupMetrics, MetricsReport};
pub use preference::LanguagePreference;
pub use repair::{DisabledRepair, MissRepair, RepairOutcome, StoreRepair};
pub use resolver::LanguageResolver;
pub use tag::LanguageTag;
