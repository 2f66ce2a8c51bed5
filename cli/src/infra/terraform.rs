//! Infrastructure implementation of the `Provisioner` port.
//!
//! `TerraformDriver<R>` routes all terraform CLI calls through a
//! `CommandRunner`. Input variables travel as `TF_VAR_*` environment
//! variables so secrets never show up in the process list.

use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, Provisioner, TerraformOptions};
use crate::domain::error::ProvisionError;
use crate::infra::command_runner::{DEFAULT_APPLY_TIMEOUT, DEFAULT_CMD_TIMEOUT, TokioCommandRunner};

/// Environment variable overriding the terraform binary.
pub const TERRAFORM_BIN_ENV: &str = "TFCOMPLY_TERRAFORM";

/// Infrastructure adapter that routes all terraform CLI calls through a `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct TerraformDriver<R: CommandRunner> {
    runner: R,
    binary: String,
    apply_timeout: Duration,
    output_timeout: Duration,
}

impl<R: CommandRunner> TerraformDriver<R> {
    /// Create a driver that invokes `binary` through `runner`.
    pub fn new(runner: R, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            apply_timeout: DEFAULT_APPLY_TIMEOUT,
            output_timeout: DEFAULT_CMD_TIMEOUT,
        }
    }

    /// Run `terraform -chdir=<dir> <args>` once.
    async fn invoke(&self, opts: &TerraformOptions, args: &[&str], timeout: Duration) -> Result<Output> {
        let chdir = format!("-chdir={}", opts.dir.display());
        let mut full = vec![chdir.as_str()];
        full.extend_from_slice(args);
        let env = tf_var_env(opts);
        tracing::debug!(binary = %self.binary, args = ?full, "running terraform");
        self.runner
            .run_with_env(&self.binary, &full, &env, timeout)
            .await
            .with_context(|| format!("terraform {}", args.first().copied().unwrap_or_default()))
    }

    /// Run a terraform subcommand, retrying failures the policy marks transient.
    async fn invoke_with_retry(&self, opts: &TerraformOptions, args: &[&str]) -> Result<Output> {
        let command = args.first().copied().unwrap_or_default();
        let mut attempt = 0;
        loop {
            let output = self.invoke(opts, args, self.apply_timeout).await?;
            if output.status.success() {
                return Ok(output);
            }
            let combined = format!(
                "{}\n{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
            match opts.retry.should_retry(attempt, &combined) {
                Some(reason) => {
                    attempt += 1;
                    tracing::warn!(
                        command,
                        attempt,
                        max_retries = opts.retry.max_retries,
                        reason,
                        "terraform failed with a retryable error"
                    );
                    tokio::time::sleep(opts.retry.time_between_retries).await;
                }
                None => return Err(command_failed(command, &output).into()),
            }
        }
    }
}

impl TerraformDriver<TokioCommandRunner> {
    /// Convenience constructor for production use.
    ///
    /// Uses `$TFCOMPLY_TERRAFORM` when set, `terraform` otherwise.
    #[must_use]
    pub fn default_runner() -> Self {
        let binary = std::env::var(TERRAFORM_BIN_ENV)
            .ok()
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "terraform".to_string());
        Self::new(TokioCommandRunner, binary)
    }
}

impl<R: CommandRunner> Provisioner for TerraformDriver<R> {
    async fn init_and_apply(&self, opts: &TerraformOptions) -> Result<()> {
        self.invoke_with_retry(
            opts,
            &["init", "-upgrade=false", "-input=false", "-no-color"],
        )
        .await?;
        self.invoke_with_retry(
            opts,
            &["apply", "-input=false", "-auto-approve", "-lock=false", "-no-color"],
        )
        .await?;
        tracing::info!(dir = %opts.dir.display(), "terraform apply complete");
        Ok(())
    }

    async fn output(&self, opts: &TerraformOptions, key: &str) -> Result<String> {
        let output = self
            .invoke(opts, &["output", "-no-color", "-json", key], self.output_timeout)
            .await?;
        if !output.status.success() {
            return Err(command_failed("output", &output).into());
        }
        parse_output_value(key, &output.stdout)
    }

    async fn destroy(&self, opts: &TerraformOptions) -> Result<()> {
        self.invoke_with_retry(
            opts,
            &["destroy", "-auto-approve", "-input=false", "-lock=false", "-no-color"],
        )
        .await?;
        tracing::info!(dir = %opts.dir.display(), "terraform destroy complete");
        Ok(())
    }
}

/// `TF_VAR_<name>=<value>` pairs for every input variable.
fn tf_var_env(opts: &TerraformOptions) -> Vec<(String, String)> {
    opts.vars
        .iter()
        .map(|(k, v)| (format!("TF_VAR_{k}"), v.clone()))
        .collect()
}

/// Decode `terraform output -json <key>`: strings are unquoted, anything else
/// is returned as compact JSON.
fn parse_output_value(key: &str, stdout: &[u8]) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_slice(stdout).map_err(|e| ProvisionError::InvalidOutput {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn command_failed(command: &str, output: &Output) -> ProvisionError {
    ProvisionError::CommandFailed {
        command: command.to_string(),
        code: output
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string()),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}
