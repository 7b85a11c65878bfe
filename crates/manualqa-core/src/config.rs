//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `MANUALQA_*`
//! env vars. `Settings` reads the flat key set with defaults so callers get
//! a typed view. Helpers expand `~` and `${VAR}` and resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::env;
use std::path::{Path, PathBuf};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        let overlay = match env_name.as_str() {
            "dev" | "development" => Some("config.dev.toml"),
            "prod" | "production" => Some("config.prod.toml"),
            "test" | "testing" => Some("config.test.toml"),
            _ => None,
        };

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        if let Some(file) = overlay {
            figment = figment.merge(Toml::file(file));
        }
        figment = figment.merge(Env::prefixed("MANUALQA_"));

        Ok(Self { figment })
    }

    pub fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> anyhow::Result<T> {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("config key '{key}': {e}"))
    }
}

/// Typed view over the flat config keys, with the pipeline's defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the chunk snapshot (`chunks.json`).
    pub persist_dir: PathBuf,
    /// Embedding model directory, or `"hash"` for the builtin fallback.
    pub embedding_model: String,
    /// Reranker model directory, or `"overlap"` for the builtin fallback.
    pub reranker_model: String,
    pub hybrid_top_k: usize,
    pub rerank_top_k: usize,
    /// Chunks handed to the generator (context budget).
    pub generate_chunks: usize,
    pub rrf_k: f32,
    pub pool_multiplier: usize,
    pub generation_model: String,
    pub generation_api_key: String,
    pub generation_base_url: String,
    pub generation_max_tokens: u32,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            persist_dir: expand_path(
                config
                    .get::<String>("persist_dir")
                    .unwrap_or_else(|_| "data".to_string()),
            ),
            embedding_model: config
                .get("embedding_model")
                .unwrap_or_else(|_| "models/bge-m3".to_string()),
            reranker_model: config
                .get("reranker_model")
                .unwrap_or_else(|_| "models/bge-reranker-v2-m3".to_string()),
            hybrid_top_k: config.get("hybrid_top_k").unwrap_or(20),
            rerank_top_k: config.get("rerank_top_k").unwrap_or(5),
            generate_chunks: config.get("generate_chunks").unwrap_or(5),
            rrf_k: config.get("rrf_k").unwrap_or(60.0),
            pool_multiplier: config.get("pool_multiplier").unwrap_or(2),
            generation_model: config
                .get("generation_model")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            generation_api_key: config
                .get("generation_api_key")
                .unwrap_or_else(|_| String::new()),
            generation_base_url: config.get("generation_base_url").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            generation_max_tokens: config.get("generation_max_tokens").unwrap_or(1024),
            request_timeout_secs: config.get("request_timeout_secs").unwrap_or(30),
            max_retries: config.get("max_retries").unwrap_or(3),
            initial_backoff_ms: config.get("initial_backoff_ms").unwrap_or(500),
        }
    }

    pub fn load() -> anyhow::Result<Self> {
        let config = Config::load()?;
        Ok(Self::from_config(&config))
    }
}

/// Expand `${VAR}`/`$VAR` references and a leading `~` in a user-supplied
/// path. Unknown variables leave the string untouched. The result is not
/// canonicalized and may not exist.
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let raw = input.as_ref();
    let with_env = match shellexpand::env(raw) {
        Ok(expanded) => expanded.into_owned(),
        Err(_) => raw.to_string(),
    };
    PathBuf::from(shellexpand::tilde(&with_env).into_owned())
}

/// Resolve `p` against `base` after expansion. Absolute paths pass through.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let expanded = expand_path(p);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}
