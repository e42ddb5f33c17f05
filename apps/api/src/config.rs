use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_EMBEDDING_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Application configuration loaded from environment variables.
/// Everything has a default; the embedding provider and NER service are
/// only wired up when their variables are set.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedding_api_key: Option<String>,
    pub embedding_base_url: String,
    pub embedding_model: String,
    pub embedding_timeout_secs: u64,
    pub embedding_max_retries: u32,
    pub ner_endpoint: Option<String>,
    pub vocabulary_path: Option<PathBuf>,
    pub experience_month_precision: bool,
    /// Lexical share of the combined score. `None` means equal weight.
    pub lexical_weight: Option<f64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedding_api_key: get("EMBEDDING_API_KEY"),
            embedding_base_url: get("EMBEDDING_BASE_URL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_BASE_URL.to_string()),
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_timeout_secs: get("EMBEDDING_TIMEOUT_SECS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("EMBEDDING_TIMEOUT_SECS must be a whole number of seconds")?
                .unwrap_or(30),
            embedding_max_retries: get("EMBEDDING_MAX_RETRIES")
                .map(|v| v.parse::<u32>())
                .transpose()
                .context("EMBEDDING_MAX_RETRIES must be a non-negative integer")?
                .unwrap_or(3),
            ner_endpoint: get("NER_ENDPOINT"),
            vocabulary_path: get("VOCABULARY_PATH").map(PathBuf::from),
            experience_month_precision: get("EXPERIENCE_MONTH_PRECISION")
                .map(|v| parse_bool(&v))
                .transpose()?
                .unwrap_or(false),
            lexical_weight: get("LEXICAL_WEIGHT")
                .map(|v| parse_weight(&v))
                .transpose()
                .context("LEXICAL_WEIGHT must be a number between 0 and 1")?,
        })
    }
}

fn parse_weight(raw: &str) -> Result<f64> {
    let weight = raw.trim().parse::<f64>()?;
    anyhow::ensure!((0.0..=1.0).contains(&weight), "weight {weight} is out of range");
    Ok(weight)
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("Expected a boolean, got '{other}'"),
    }
}
