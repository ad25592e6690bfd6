use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::agent::StopPolicy;

/// Application configuration loaded from environment variables.
/// Every setting has a default; unparsable values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_base_url: String,
    pub llm_model: String,
    /// Per-call LLM timeout, also the wall-clock bound of one reasoning run.
    pub llm_timeout: Duration,
    pub qdrant_url: String,
    pub agent_max_iterations: usize,
    /// What the reasoning loop does when it hits `agent_max_iterations`.
    pub agent_stop_policy: StopPolicy,
    pub memory_token_limit: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ollama_base_url: env_or("OLLAMA_BASE_URL", "http://localhost:11434"),
            llm_model: env_or("LLM_MODEL", "llama3.1:8b"),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 180)?),
            qdrant_url: env_or("QDRANT_URL", "http://localhost:6333"),
            agent_max_iterations: parse_env("AGENT_MAX_ITERATIONS", 10)?,
            agent_stop_policy: parse_env("AGENT_STOP_POLICY", StopPolicy::Generate)?,
            memory_token_limit: parse_env("MEMORY_TOKEN_LIMIT", 2048)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
