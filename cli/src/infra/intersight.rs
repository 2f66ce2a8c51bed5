//! Infrastructure implementation of the `ManagedObjectSource` port.
//!
//! `IntersightClient` issues signed, read-only GET requests against the
//! Intersight REST API.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::application::ports::ManagedObjectSource;
use crate::domain::error::ApiError;
use crate::infra::config::IntersightConfig;
use crate::infra::signing::RequestSigner;

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Signed HTTP client for the Intersight API.
pub struct IntersightClient {
    http: reqwest::Client,
    base_url: String,
    host: String,
    signer: RequestSigner,
}

impl IntersightClient {
    /// Build a client for `base_url` (scheme + authority, no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL has no host or the HTTP client cannot be built.
    pub fn new(base_url: &str, signer: RequestSigner) -> Result<Self> {
        let parsed = reqwest::Url::parse(base_url)
            .with_context(|| format!("invalid Intersight URL {base_url}"))?;
        let host = match (parsed.host_str(), parsed.port()) {
            (Some(h), Some(p)) => format!("{h}:{p}"),
            (Some(h), None) => h.to_string(),
            (None, _) => anyhow::bail!("Intersight URL {base_url} has no host"),
        };
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("tfcomply/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            host,
            signer,
        })
    }

    /// Build a client from `IS_*` configuration, reading the key file.
    ///
    /// # Errors
    ///
    /// Returns an error if the key file cannot be loaded or the URL is invalid.
    pub fn from_config(config: &IntersightConfig) -> Result<Self> {
        let signer = RequestSigner::from_key_file(&config.keyid, &config.keyfile)?;
        Self::new(&config.base_url(), signer)
    }
}

impl ManagedObjectSource for IntersightClient {
    async fn get(&self, path: &str) -> Result<Value> {
        let headers = self
            .signer
            .sign("GET", &self.host, path, b"", chrono::Utc::now());
        let url = format!("{}{path}", self.base_url);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::DATE, &headers.date)
            .header("Digest", &headers.digest)
            .header(reqwest::header::AUTHORIZATION, &headers.authorization)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Transport {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path, status = status.as_u16(), bytes = body.len(), "intersight response");

        if !status.is_success() {
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body: body.trim().to_string(),
            }
            .into());
        }
        serde_json::from_str(&body).map_err(|e| {
            ApiError::Decode {
                path: path.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
