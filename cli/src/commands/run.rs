//! `tfcomply run <scenario.yaml>`: apply a module, check it, destroy it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::acceptance;
use crate::domain::scenario::{Scenario, generate_unique_id};
use crate::infra::config::IntersightConfig;
use crate::infra::intersight::IntersightClient;
use crate::infra::scenario;
use crate::infra::terraform::TerraformDriver;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Scenario file (YAML)
    pub scenario: PathBuf,
}

/// Entry point for `tfcomply run`.
///
/// Credentials and the scenario are validated before anything is provisioned.
/// Ctrl-C stops verification and still destroys the module.
///
/// # Errors
///
/// Returns an error if setup fails, the scenario fails, or teardown fails.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<()> {
    let loaded = scenario::load(&args.scenario)?;
    let config = IntersightConfig::from_env()?;
    let client = IntersightClient::from_config(&config)?;
    let driver = TerraformDriver::default_runner();

    let mut scenario = Scenario::assemble(&loaded.file, &generate_unique_id(), |name| {
        std::env::var(name).ok()
    })?;
    scenario.set_endpoint(&loaded.file, &config.base_url());

    let reporter = app.reporter();
    let report = acceptance::run_scenario(
        &driver,
        &client,
        &reporter,
        &loaded.file,
        &loaded.expected,
        &scenario,
        interrupted(),
    )
    .await?;
    drop(reporter);

    app.emit(&report, |h| h.render_acceptance(&report))
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
