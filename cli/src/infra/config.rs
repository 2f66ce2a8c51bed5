//! Intersight connection settings loaded from the environment.
//!
//! Each field maps to `IS_<FIELD>`:
//!   - `IS_KEYID`   (required, API key id)
//!   - `IS_KEYFILE` (required, path to the PEM secret key)
//!   - `IS_HOST`    (default `intersight.com`; may carry an explicit scheme)

use anyhow::{Context, Result};
use serde::Deserialize;

/// Prefix shared by every Intersight environment variable.
pub const ENV_PREFIX: &str = "IS_";

/// Intersight API credentials and endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IntersightConfig {
    /// API key id.
    pub keyid: String,

    /// Path to the file holding the PEM private key.
    pub keyfile: String,

    /// API host, e.g. `intersight.com` or `https://eu-central-1.intersight.com`.
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_host() -> String {
    "intersight.com".to_string()
}

impl IntersightConfig {
    /// Load from `IS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `IS_KEYID` or `IS_KEYFILE` is missing.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Load from an explicit set of variables (used by tests).
    ///
    /// # Errors
    ///
    /// Returns an error if `IS_KEYID` or `IS_KEYFILE` is missing.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .context("failed to load Intersight config from IS_* env vars (IS_KEYID and IS_KEYFILE are required)")
    }

    /// Base URL for API requests.
    ///
    /// A bare host gets `https://`; a value with an explicit scheme is kept.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }
}
