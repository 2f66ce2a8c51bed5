//! Application service: the full acceptance scenario.
//!
//! check templates → apply → read output → fetch → compare, then destroy on
//! every exit path, including cancellation.
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::future::Future;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{
    ManagedObjectSource, ProgressReporter, Provisioner, TerraformOptions,
};
use crate::application::services::comply::{self, ComplianceReport};
use crate::domain::error::ScenarioError;
use crate::domain::scenario::{Scenario, ScenarioFile};
use crate::domain::template;

/// Result of a successful scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptanceReport {
    pub instance_name: String,
    /// Name of the Terraform output that identified the object.
    pub output: String,
    /// Value of that output (the MOID).
    pub object_id: String,
    pub compliance: ComplianceReport,
}

/// Stand-in for the output value while templates are checked before apply.
const PENDING_OBJECT_ID: &str = "000000000000000000000000";

/// Run `scenario` against the module described by `file`.
///
/// `file` must already have its paths resolved. `expected` is the raw
/// expected-document template. Both templates are checked before anything
/// is provisioned. Once apply has started, destroy is attempted exactly once,
/// after verification has finished or `cancel` has resolved.
///
/// # Errors
///
/// Returns the template error if the scenario is misconfigured, the
/// verification error if apply, output, fetch, or comparison fails,
/// [`ScenarioError::Interrupted`] if `cancel` resolved first, or the destroy
/// error if only teardown fails.
pub async fn run_scenario(
    provisioner: &impl Provisioner,
    source: &impl ManagedObjectSource,
    reporter: &impl ProgressReporter,
    file: &ScenarioFile,
    expected: &str,
    scenario: &Scenario,
    cancel: impl Future<Output = ()>,
) -> Result<AcceptanceReport> {
    check_templates(file, expected, scenario)?;

    let opts = TerraformOptions::with_default_retryable_errors(
        file.terraform_dir.clone(),
        scenario.vars.clone(),
    );

    tracing::info!(
        instance = %scenario.instance_name,
        dir = %opts.dir.display(),
        "starting acceptance scenario"
    );

    let outcome = tokio::select! {
        outcome = verify(provisioner, source, reporter, file, expected, scenario, &opts) => outcome,
        () = cancel => {
            tracing::warn!(instance = %scenario.instance_name, "interrupted; destroying the module");
            reporter.warn("Interrupted");
            Err(ScenarioError::Interrupted.into())
        }
    };

    reporter.step(&format!("Destroying {}...", scenario.instance_name));
    let teardown = provisioner.destroy(&opts).await;

    match (outcome, teardown) {
        (Ok(report), Ok(())) => {
            reporter.success(&format!("Destroyed {}", scenario.instance_name));
            Ok(report)
        }
        (Ok(_), Err(destroy_err)) => {
            Err(destroy_err.context("verification passed but terraform destroy failed"))
        }
        (Err(err), Ok(())) => {
            reporter.success(&format!("Destroyed {}", scenario.instance_name));
            Err(err)
        }
        (Err(err), Err(destroy_err)) => {
            tracing::error!(
                instance = %scenario.instance_name,
                error = %format!("{destroy_err:#}"),
                "terraform destroy failed; resources may have leaked"
            );
            reporter.warn("Destroy failed; resources may have leaked");
            Err(err.context(format!("terraform destroy also failed: {destroy_err:#}")))
        }
    }
}

/// Render both templates with a stand-in object id so a misconfigured
/// scenario fails before anything is provisioned.
fn check_templates(file: &ScenarioFile, expected: &str, scenario: &Scenario) -> Result<()> {
    let mut vars = scenario.vars.clone();
    vars.insert(file.output.clone(), PENDING_OBJECT_ID.to_string());
    template::render_path(&file.api_path, &vars).context("checking API path")?;
    template::render_json(expected, &vars).context("checking expected document")?;
    Ok(())
}

async fn verify(
    provisioner: &impl Provisioner,
    source: &impl ManagedObjectSource,
    reporter: &impl ProgressReporter,
    file: &ScenarioFile,
    expected: &str,
    scenario: &Scenario,
    opts: &TerraformOptions,
) -> Result<AcceptanceReport> {
    reporter.step(&format!("Applying module for {}...", scenario.instance_name));
    provisioner
        .init_and_apply(opts)
        .await
        .context("terraform init/apply")?;
    reporter.success("Module applied");

    let object_id = provisioner
        .output(opts, &file.output)
        .await
        .with_context(|| format!("reading terraform output '{}'", file.output))?;
    if object_id.trim().is_empty() {
        return Err(ScenarioError::EmptyOutput(file.output.clone()).into());
    }

    let mut vars = scenario.vars.clone();
    vars.insert(file.output.clone(), object_id.clone());
    let path = template::render_path(&file.api_path, &vars).context("rendering API path")?;

    reporter.step(&format!("Checking {path}..."));
    let compliance = comply::assert_compliance(source, &path, expected, &vars).await?;
    reporter.success(&format!("{path} complies with the expected document"));

    Ok(AcceptanceReport {
        instance_name: scenario.instance_name.clone(),
        output: file.output.clone(),
        object_id,
        compliance,
    })
}
