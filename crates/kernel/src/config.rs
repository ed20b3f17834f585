//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

/// Shell configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path opened on startup (default: /dashboard).
    pub landing_path: String,

    /// Maximum departed paths kept for `back` (default: 50).
    pub history_limit: usize,

    /// Refuse to start while any registered route lacks a permission
    /// requirement (default: false).
    pub strict_permissions: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `from_env` routes through here; tests pass their own lookup so
    /// outcomes never depend on the ambient environment.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let landing_path = get("LANDING_PATH").unwrap_or_else(|| "/dashboard".to_string());

        let history_limit = get("HISTORY_LIMIT")
            .unwrap_or_else(|| "50".to_string())
            .parse()
            .context("HISTORY_LIMIT must be a valid usize")?;

        let strict_permissions = get("STRICT_PERMISSIONS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            landing_path,
            history_limit,
            strict_permissions,
        })
    }
}
