//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

use crate::domain::{RetryPolicy, TemplateVars};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Everything the provisioning driver needs to act on one module instance.
#[derive(Debug, Clone)]
pub struct TerraformOptions {
    /// Directory holding the Terraform module.
    pub dir: PathBuf,
    /// Input variables, exported as `TF_VAR_<name>`.
    pub vars: TemplateVars,
    /// Which failures of init/apply/destroy are retried.
    pub retry: RetryPolicy,
}

impl TerraformOptions {
    /// Options for `dir` with the default retryable-error policy.
    #[must_use]
    pub fn with_default_retryable_errors(dir: impl Into<PathBuf>, vars: TemplateVars) -> Self {
        Self {
            dir: dir.into(),
            vars,
            retry: RetryPolicy::default(),
        }
    }
}

// ── Provisioning Port ─────────────────────────────────────────────────────────

/// Apply, inspect, and tear down provisioned infrastructure.
#[allow(async_fn_in_trait)]
pub trait Provisioner {
    /// Initialise the module and apply it.
    async fn init_and_apply(&self, opts: &TerraformOptions) -> Result<()>;
    /// Read one output value as a string.
    async fn output(&self, opts: &TerraformOptions, key: &str) -> Result<String>;
    /// Destroy everything the module created.
    async fn destroy(&self, opts: &TerraformOptions) -> Result<()>;
}

// ── Management API Port ───────────────────────────────────────────────────────

/// Read-only access to managed objects on the remote API.
#[allow(async_fn_in_trait)]
pub trait ManagedObjectSource {
    /// GET the JSON document at `path` (e.g. `/api/v1/snmp/Policies/<moid>`).
    async fn get(&self, path: &str) -> Result<Value>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program with extra environment variables and a timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(String, String)],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
