use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use pagedeck_graph::DEFAULT_BASE_URL;

/// Server configuration, read from the environment (after `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// User-level access token for the graph API.
    pub access_token: String,
    pub graph_base_url: String,
    pub graph_timeout: Duration,
    /// Mount the raw-response debug routes.
    pub debug_routes: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            host: var("PAGEDECK_HOST", "0.0.0.0"),
            port: var("PAGEDECK_PORT", "8000")
                .parse()
                .context("PAGEDECK_PORT must be a valid port")?,
            db_path: var("PAGEDECK_DB_PATH", "pagedeck.db").into(),
            access_token: var("GRAPH_ACCESS_TOKEN", ""),
            graph_base_url: var("GRAPH_API_BASE", DEFAULT_BASE_URL),
            graph_timeout: Duration::from_secs(
                var("GRAPH_TIMEOUT_SECS", "30")
                    .parse()
                    .context("GRAPH_TIMEOUT_SECS must be a number of seconds")?,
            ),
            debug_routes: parse_flag(&var("PAGEDECK_DEBUG_ROUTES", "false")),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
