//! `tfcomply comply`: check an existing managed object against a template.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::comply;
use crate::domain::scenario::parse_var;
use crate::domain::template::{self, TemplateVars};
use crate::infra::config::IntersightConfig;
use crate::infra::intersight::IntersightClient;
use crate::infra::scenario::read_template;

/// Arguments for the comply command.
#[derive(Args)]
pub struct ComplyArgs {
    /// API path, e.g. /api/v1/snmp/Policies/{{ .moid }}
    #[arg(long)]
    pub path: String,

    /// Expected-document template (JSON with {{ .key }} placeholders)
    #[arg(long)]
    pub expected: PathBuf,

    /// Template variable, repeatable
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,
}

/// Entry point for `tfcomply comply`.
///
/// Exits non-zero when the object does not comply, after printing the report.
///
/// # Errors
///
/// Returns an error if arguments are invalid or the object cannot be fetched.
pub async fn run(app: &AppContext, args: &ComplyArgs) -> Result<ExitCode> {
    let vars = args
        .vars
        .iter()
        .map(|raw| parse_var(raw))
        .collect::<Result<TemplateVars>>()?;
    let path = template::render_path(&args.path, &vars).context("rendering API path")?;
    let expected = read_template(&args.expected)?;

    let config = IntersightConfig::from_env()?;
    let client = IntersightClient::from_config(&config)?;

    let report = comply::check_compliance(&client, &path, &expected, &vars).await?;
    app.emit(&report, |h| h.render_compliance(&report))?;

    Ok(if report.compliant {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
