// src/config.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

fn default_dataset() -> String {
    "production".to_string()
}
fn default_api_version() -> String {
    "2025-01-01".to_string()
}

/// Service configuration, loaded from `config/forge.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// "anthropic" | "openai" | "mock" (case-insensitive)
    pub provider: String,
    /// Model override; each adapter has its own default.
    #[serde(default)]
    pub model: Option<String>,
    /// "ENV" means: read from ANTHROPIC_API_KEY / OPENAI_API_KEY (by provider)
    #[serde(default)]
    pub api_key: String,
    /// Endpoint override for OpenAI-compatible hosts.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "sanity" | "memory"
    pub backend: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// "ENV" means: read from SANITY_API_WRITE_TOKEN
    #[serde(default)]
    pub token: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            project_id: String::new(),
            dataset: default_dataset(),
            api_version: default_api_version(),
            token: String::new(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            model: None,
            api_key: String::new(),
            base_url: None,
            store: StoreConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: AppConfig = serde_json::from_str(&data)?;

        // Normalize provider
        cfg.provider = cfg.provider.to_lowercase();
        cfg.store.backend = cfg.store.backend.to_lowercase();

        // Resolve api key if "ENV"
        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = match cfg.provider.as_str() {
                "anthropic" => env::var("ANTHROPIC_API_KEY")
                    .map_err(|_| anyhow::anyhow!("Missing ANTHROPIC_API_KEY env var"))?,
                "openai" => env::var("OPENAI_API_KEY")
                    .map_err(|_| anyhow::anyhow!("Missing OPENAI_API_KEY env var"))?,
                "mock" => String::new(),
                other => anyhow::bail!("Unsupported provider in config: {other}"),
            };
        }

        // Resolve store token if "ENV"
        if cfg.store.token.trim().eq_ignore_ascii_case("env") {
            cfg.store.token = env::var("SANITY_API_WRITE_TOKEN")
                .map_err(|_| anyhow::anyhow!("Missing SANITY_API_WRITE_TOKEN env var"))?;
        }

        Ok(cfg)
    }

    /// Load config or fall back to the credential-free default (mock provider
    /// plus in-memory store) so a fresh checkout can boot. A file that exists
    /// but fails to load is a misconfiguration and is logged, not swallowed.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(&path) {
            Ok(cfg) => cfg,
            Err(err) => {
                if path.as_ref().exists() {
                    tracing::warn!(
                        error = %err,
                        "config file present but unusable; falling back to mock provider + memory store"
                    );
                } else {
                    tracing::debug!("no config file; using mock provider + memory store");
                }
                Self::default()
            }
        }
    }
}
