use anyhow::{Context, Result};
use lexicon_i18n::config::Config;
use lexicon_i18n::db::PgLexiconStore;
use lexicon_i18n::i18n::{DisabledRepair, LexiconLookup, MissRepair, StoreRepair};
use lexicon_i18n::loader::load_handles;
use lexicon_i18n::retry::{is_retryable_connect_error, with_retry_if, RetryConfig};
use lexicon_i18n::server::{router, AppState};
use lexicon_i18n::Localizer;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lexicon_i18n=info".parse()?),
        )
        .init();

    info!("Starting lexicon localization service");

    let config = Config::from_env()?;
    info!("Configuration: {:?}", config);
    if !config.default_lang_configured() {
        warn!(
            "I18N_DEFAULT_LANG '{}' is not in I18N_LANGUAGES, fallback will fail",
            config.default_lang
        );
    }

    let options = PgLexiconStore::connect_options(
        &config.dsn,
        config.user.as_deref(),
        config.password.as_deref(),
    )
    .context("Invalid database DSN")?;

    // Step 1: Load all handles over a connection held only for this phase
    let handles = {
        let store = with_retry_if(
            &RetryConfig::startup_connect(),
            &format!("Lexicon database connection ({})", options.get_host()),
            || PgLexiconStore::connect_startup(options.clone()),
            is_retryable_connect_error,
        )
        .await
        .context("Failed to connect to lexicon database")?;

        let handles = load_handles(&store, &config.languages, &config.lexicons).await;
        store.close().await;
        handles
    };

    // Step 2: Pick the miss-repair strategy
    let repair: Arc<dyn MissRepair> = if config.fail_with {
        info!(
            "Missing keys will be recorded in lexicon '{}'",
            config.default_lexicon
        );
        Arc::new(StoreRepair::new(
            PgLexiconStore::connect_lazy(options),
            config.default_lexicon.clone(),
        ))
    } else {
        info!("Missing key recording disabled");
        Arc::new(DisabledRepair)
    };

    // Step 3: Publish the fully built localizer
    let localizer = Arc::new(Localizer::new(
        handles,
        LexiconLookup::new(repair),
        config.default_lang.clone(),
        config.lexicons.clone(),
    ));

    let app = router(AppState { localizer });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("✓ Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
