//! Campaign Forge — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the provider, the content store, and
//! the metrics endpoint.
//!
//! See `README.md` for quickstart.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use campaign_forge::api::{create_router, AppState};
use campaign_forge::config::AppConfig;
use campaign_forge::metrics::Metrics;
use campaign_forge::providers::build_provider;
use campaign_forge::store::build_store;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - FORGE_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("FORGE_DEV_LOG").ok().is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("campaign_forge=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This is where ANTHROPIC_API_KEY / OPENAI_API_KEY / SANITY_API_WRITE_TOKEN
    // come from when the config file says "ENV".
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    // Missing/broken config falls back to mock provider + memory store.
    let cfg = AppConfig::load_or_default("config/forge.json");
    // Safe diagnostics: never log the key itself.
    tracing::info!(
        "forge cfg loaded: provider={}, store={}, key_len={}",
        cfg.provider,
        cfg.store.backend,
        cfg.api_key.len()
    );

    let metrics = Metrics::init();

    let state = AppState {
        provider: build_provider(&cfg),
        store: build_store(&cfg.store),
    };
    let router = create_router(state).merge(metrics.router());

    Ok(router.into())
}
