//! Retryable-error policy for provisioning commands.
//!
//! Pure data: a table of output patterns that mark a failure as transient,
//! plus the retry budget. The driver decides when to sleep and re-run.

use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;

/// Transient Terraform failures worth another attempt, with a short description.
pub const DEFAULT_RETRYABLE_ERRORS: &[(&str, &str)] = &[
    (
        ".*read: connection reset by peer.*",
        "Connection reset by remote peer.",
    ),
    (
        ".*TLS handshake timeout.*",
        "Failed to reach a registry due to TLS handshake timeout.",
    ),
    (
        ".*Error installing provider.*",
        "Failed to download Terraform plugins.",
    ),
    (
        ".*Failed to query available provider packages.*",
        "Failed to query provider registry.",
    ),
    (
        ".*timeout while waiting for plugin to start.*",
        "Failed to start Terraform plugin.",
    ),
    (
        ".*timed out waiting for server handshake.*",
        "Provider plugin handshake timed out.",
    ),
    (
        "could not query provider registry for",
        "Failed to query provider registry.",
    ),
    (
        ".*Could not retrieve the list of available versions for provider.*",
        "Failed to list provider versions.",
    ),
    (
        ".*Client\\.Timeout exceeded while awaiting headers.*",
        "Remote API did not answer in time.",
    ),
    (
        ".*Failed to install provider.*",
        "Failed to install Terraform provider.",
    ),
];

/// Default number of retries after the first failed attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default pause between attempts.
pub const DEFAULT_TIME_BETWEEN_RETRIES: Duration = Duration::from_secs(5);

/// Which failures are retried, how often, and how far apart.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    patterns: Vec<(Regex, String)>,
    pub max_retries: u32,
    pub time_between_retries: Duration,
}

impl RetryPolicy {
    /// Build a policy from `(pattern, description)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern is not a valid regular expression.
    pub fn new(
        patterns: &[(&str, &str)],
        max_retries: u32,
        time_between_retries: Duration,
    ) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|(p, d)| {
                Regex::new(p)
                    .with_context(|| format!("invalid retryable error pattern {p}"))
                    .map(|re| (re, (*d).to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            max_retries,
            time_between_retries,
        })
    }

    /// Description of the first pattern matching `output`, if any.
    #[must_use]
    pub fn matching(&self, output: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(re, _)| re.is_match(output))
            .map(|(_, d)| d.as_str())
    }

    /// Whether a failure on attempt number `attempt` (0-based) with `output` should be retried.
    #[must_use]
    pub fn should_retry(&self, attempt: u32, output: &str) -> Option<&str> {
        if attempt >= self.max_retries {
            return None;
        }
        self.matching(output)
    }
}

impl Default for RetryPolicy {
    #[allow(clippy::expect_used)] // patterns are compile-time constants covered by tests
    fn default() -> Self {
        Self::new(
            DEFAULT_RETRYABLE_ERRORS,
            DEFAULT_MAX_RETRIES,
            DEFAULT_TIME_BETWEEN_RETRIES,
        )
        .expect("default retryable error patterns are valid")
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
