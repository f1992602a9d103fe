// ABOUTME: Environment-driven configuration for the CLI
// ABOUTME: Defaults target a local backend, overridable per deployment

use std::env;

const DEFAULT_API_URL: &str = "http://localhost:3001/api";
const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";

/// Resolved endpoints for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the JSON API.
    pub api_url: String,
    /// Base URL serving uploads and generated documents.
    pub backend_url: String,
}

impl Config {
    /// Read `LLC_API_URL` / `LLC_BACKEND_URL`, falling back to the local
    /// development backend. Blank values count as unset.
    pub fn from_env() -> Self {
        Self {
            api_url: env_or("LLC_API_URL", DEFAULT_API_URL),
            backend_url: env_or("LLC_BACKEND_URL", DEFAULT_BACKEND_URL),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.trim().trim_end_matches('/').to_string(),
        _ => default.to_string(),
    }
}
