//! HTTP surface: shares the `Localizer` with handlers through axum state.

use crate::i18n::{LanguagePreference, LanguageTag, LocArgs, MetricsReport};
use crate::localizer::{Localized, Localizer};
use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub localizer: Arc<Localizer>,
}

impl FromRef<AppState> for Arc<Localizer> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.localizer)
    }
}

/// Per-request localization, bound to the client's `Accept-Language`.
pub struct RequestLocalizer {
    localizer: Arc<Localizer>,
    preference: LanguagePreference,
}

impl RequestLocalizer {
    pub fn new(localizer: Arc<Localizer>, accept_language: &str) -> Self {
        Self {
            localizer,
            preference: LanguagePreference::parse(accept_language),
        }
    }

    /// Replace the header-derived preferences with an explicit list.
    pub fn with_languages(mut self, languages: impl IntoIterator<Item = LanguageTag>) -> Self {
        self.preference = LanguagePreference::new(languages);
        self
    }

    pub async fn localize(&self, key: &str, args: impl Into<LocArgs>) -> Localized {
        self.localizer
            .localize_preference(&self.preference, key, args.into())
            .await
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestLocalizer
where
    Arc<Localizer>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let accept_language = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        Ok(RequestLocalizer::new(
            Arc::<Localizer>::from_ref(state),
            accept_language,
        ))
    }
}

// ==================== Handlers ====================

/// Positional arguments as sent by clients: one scalar or a list of scalars
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ArgsInput {
    Many(Vec<serde_json::Value>),
    One(serde_json::Value),
}

impl Default for ArgsInput {
    fn default() -> Self {
        ArgsInput::Many(Vec::new())
    }
}

impl From<ArgsInput> for LocArgs {
    fn from(input: ArgsInput) -> Self {
        let values = match input {
            ArgsInput::Many(values) => values,
            ArgsInput::One(value) => vec![value],
        };
        values
            .into_iter()
            .map(|value| match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect::<Vec<String>>()
            .into()
    }
}

#[derive(Debug, Deserialize)]
pub struct LocalizeRequest {
    pub key: String,
    #[serde(default)]
    pub args: ArgsInput,
    /// Overrides the `Accept-Language` header when present
    #[serde(default)]
    pub languages: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct LocalizeResponse {
    pub language: Option<LanguageTag>,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub default: LanguageTag,
    pub loaded: Vec<LanguageTag>,
    pub lexicons: Vec<String>,
}

async fn health() -> &'static str {
    "OK"
}

async fn languages(State(localizer): State<Arc<Localizer>>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        default: localizer.default_language().clone(),
        loaded: localizer.languages().into_iter().cloned().collect(),
        lexicons: localizer.lexicon_priority().to_vec(),
    })
}

async fn localize(
    loc: RequestLocalizer,
    Json(request): Json<LocalizeRequest>,
) -> Json<LocalizeResponse> {
    let loc = match request.languages {
        Some(codes) => {
            let tags = codes.iter().filter_map(|code| match LanguageTag::parse(code) {
                Ok(tag) => Some(tag),
                Err(e) => {
                    warn!("Ignoring requested language '{}': {}", code, e);
                    None
                }
            });
            loc.with_languages(tags.collect::<Vec<_>>())
        }
        None => loc,
    };

    let localized = loc.localize(&request.key, request.args).await;

    Json(LocalizeResponse {
        language: localized.language,
        text: localized.text,
    })
}

async fn metrics(State(localizer): State<Arc<Localizer>>) -> Json<MetricsReport> {
    Json(localizer.metrics())
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/languages", get(languages))
        .route("/localize", post(localize))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
