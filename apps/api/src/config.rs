use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::tailoring::matcher::DEFAULT_FUZZY_THRESHOLD;

/// Which relevance backend tailors records at request time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelevanceBackend {
    /// Skill-intersection rule, no external calls.
    #[default]
    Skills,
    /// Entry positions chosen by the LLM.
    Llm,
}

impl FromStr for RelevanceBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "skills" => Ok(Self::Skills),
            "llm" => Ok(Self::Llm),
            other => bail!("RELEVANCE_BACKEND must be 'skills' or 'llm', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub llm_model: String,
    pub port: u16,
    pub rust_log: String,
    pub latex_bin: String,
    pub latex_timeout: Duration,
    pub fuzzy_match_threshold: f64,
    pub relevance_backend: RelevanceBackend,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            latex_bin: optional_env("LATEX_BIN").unwrap_or_else(|| "pdflatex".to_string()),
            latex_timeout: Duration::from_secs(
                optional_env("LATEX_TIMEOUT_SECS")
                    .unwrap_or_else(|| "60".to_string())
                    .parse::<u64>()
                    .context("LATEX_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            fuzzy_match_threshold: parse_threshold(optional_env("FUZZY_MATCH_THRESHOLD"))?,
            relevance_backend: optional_env("RELEVANCE_BACKEND")
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_threshold(raw: Option<String>) -> Result<f64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_FUZZY_THRESHOLD);
    };
    let threshold = raw
        .trim()
        .parse::<f64>()
        .context("FUZZY_MATCH_THRESHOLD must be a number")?;
    if !(0.0..=1.0).contains(&threshold) {
        bail!("FUZZY_MATCH_THRESHOLD must lie between 0 and 1, got {threshold}");
    }
    Ok(threshold)
}
