//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

use crate::domain::comply::Mismatch;

// ── Scenario errors ───────────────────────────────────────────────────────────

/// Errors raised while assembling or running a test scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Environment variable {env} (for var '{var}') is not set.")]
    MissingEnvironment { var: String, env: String },

    #[error("Terraform output '{0}' is empty. The module did not report an identifier.")]
    EmptyOutput(String),

    #[error("Invalid variable '{0}': expected KEY=VALUE")]
    InvalidVar(String),

    #[error("Invalid name prefix '{0}': must be non-empty and contain no whitespace")]
    InvalidNamePrefix(String),

    #[error("Interrupted before verification finished.")]
    Interrupted,
}

// ── Template errors ───────────────────────────────────────────────────────────

/// Errors produced while rendering an expected-document template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template references '{{{{ .{0} }}}}' but no such variable was supplied.")]
    MissingVariable(String),

    #[error("Rendered template is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Variable '{key}' = '{value}' cannot be used in an API path: only letters, digits, '-', '.', '_' and '~' are allowed.")]
    UnsafePathValue { key: String, value: String },
}

// ── Compliance errors ─────────────────────────────────────────────────────────

/// Errors produced by the template-subset comparison.
#[derive(Debug, Error)]
pub enum ComplyError {
    #[error("API path '{0}' must start with '/'")]
    InvalidPath(String),

    #[error("{path} does not comply with the expected document ({} mismatch(es)):\n{}", .mismatches.len(), render_mismatches(.mismatches))]
    Mismatch {
        path: String,
        mismatches: Vec<Mismatch>,
    },
}

fn render_mismatches(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(|m| format!("  {m}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Errors reported by the provisioning driver.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("terraform {command} failed (exit code {code}):\n{stderr}")]
    CommandFailed {
        command: String,
        code: String,
        stderr: String,
    },

    #[error("terraform output '{key}' is not valid JSON: {reason}")]
    InvalidOutput { key: String, reason: String },
}

// ── API errors ────────────────────────────────────────────────────────────────

/// Errors reported by the management API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GET {path} returned HTTP {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("GET {path} returned a body that is not JSON: {reason}")]
    Decode { path: String, reason: String },

    #[error("GET {path} failed: {reason}")]
    Transport { path: String, reason: String },
}

// ── Credential errors ─────────────────────────────────────────────────────────

/// Errors related to API key material.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Secret key file {0} is empty.")]
    EmptyKeyFile(String),

    #[error("Unsupported private key format in {0}: expected an RSA or EC P-256 PEM key")]
    UnsupportedKey(String),

    #[error("API key id is empty. Set IS_KEYID.")]
    EmptyKeyId,
}
