//! tfcomply - Terraform acceptance tests with managed-object compliance checks

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tfcomply::cli::Cli;
use tfcomply::domain::error::{ApiError, ComplyError, CredentialError, ProvisionError, ScenarioError};
use tfcomply::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = cli.app();
    match cli.run(&app).await {
        Ok(code) => code,
        Err(e) => {
            if app.is_json() {
                match json::format_error(&format!("{e:#}"), error_code(&e)) {
                    Ok(doc) => println!("{doc}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                app.output.error(&format!("Error: {e:#}"));
            }
            ExitCode::FAILURE
        }
    }
}

/// Machine-readable code for the JSON error object.
fn error_code(e: &anyhow::Error) -> &'static str {
    if e.downcast_ref::<ComplyError>().is_some() {
        "NOT_COMPLIANT"
    } else if e.downcast_ref::<ProvisionError>().is_some() {
        "PROVISION_FAILED"
    } else if e.downcast_ref::<ApiError>().is_some() {
        "API_ERROR"
    } else if e.downcast_ref::<CredentialError>().is_some() {
        "BAD_CREDENTIALS"
    } else if e.downcast_ref::<ScenarioError>().is_some() {
        "BAD_SCENARIO"
    } else {
        "ERROR"
    }
}
