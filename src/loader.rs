//! Startup loading of language handles from storage.

use crate::db::LexiconStore;
use crate::error::LocalizeError;
use crate::i18n::{HandleSet, LanguageHandle, LanguageTag};
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Load every configured (language, lexicon) pair into a handle set.
///
/// A pair that fails to load is logged and left out; a language with no
/// loaded lexicon at all gets no handle. Neither is fatal.
pub async fn load_handles<S>(store: &S, languages: &[LanguageTag], lexicons: &[String]) -> HandleSet
where
    S: LexiconStore + ?Sized,
{
    let mut handles = HandleSet::new();

    for language in languages {
        let mut handle = LanguageHandle::new(language.clone());
        let mut loaded = 0;

        for lexicon in lexicons {
            match store.load_lexicon(language, lexicon).await {
                Ok(rows) => {
                    let mut entries: HashMap<String, String> = HashMap::with_capacity(rows.len());
                    for row in rows {
                        // Duplicate keys: the first stored row wins
                        entries.entry(row.key).or_insert(row.value);
                    }
                    info!(
                        "✓ Loaded lexicon '{}' for {} ({} entries)",
                        lexicon,
                        language,
                        entries.len()
                    );
                    handle.insert_lexicon(lexicon.as_str(), entries);
                    loaded += 1;
                }
                Err(source) => {
                    let err = LocalizeError::LexiconLoad {
                        language: language.to_string(),
                        lexicon: lexicon.clone(),
                        source,
                    };
                    error!("{}", err);
                }
            }
        }

        if loaded > 0 {
            info!(
                "✓ {} ready: {} lexicons, {} entries",
                language,
                loaded,
                handle.entry_count()
            );
            handles.insert(handle);
        } else {
            warn!("No lexicon loaded for {}, language will be unavailable", language);
        }
    }

    info!(
        "Loaded {} of {} configured languages",
        handles.len(),
        languages.len()
    );

    handles
}
