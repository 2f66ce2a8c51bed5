//! Application service: template compliance of a managed object.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::ManagedObjectSource;
use crate::domain::comply::{self, Mismatch};
use crate::domain::error::ComplyError;
use crate::domain::template::{self, TemplateVars};

/// Outcome of comparing one managed object with its expected document.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    /// API path that was fetched.
    pub path: String,
    /// `true` when `mismatches` is empty.
    pub compliant: bool,
    pub mismatches: Vec<Mismatch>,
}

/// Render `template`, fetch `api_path`, and compare without failing on mismatches.
///
/// # Errors
///
/// Returns an error if the path is malformed, the template cannot be
/// rendered, or the fetch fails.
pub async fn check_compliance(
    source: &impl ManagedObjectSource,
    api_path: &str,
    template: &str,
    vars: &TemplateVars,
) -> Result<ComplianceReport> {
    if !api_path.starts_with('/') {
        return Err(ComplyError::InvalidPath(api_path.to_string()).into());
    }
    let expected = template::render_json(template, vars).context("rendering expected document")?;

    tracing::debug!(path = api_path, "fetching managed object");
    let actual = source
        .get(api_path)
        .await
        .with_context(|| format!("fetching {api_path}"))?;

    let mismatches = comply::compare(&expected, &actual);
    tracing::info!(
        path = api_path,
        mismatches = mismatches.len(),
        "compared managed object with expected document"
    );

    Ok(ComplianceReport {
        path: api_path.to_string(),
        compliant: mismatches.is_empty(),
        mismatches,
    })
}

/// Fail unless the object at `api_path` contains every field of the rendered template.
///
/// Fields present only in the fetched document are ignored.
///
/// # Errors
///
/// Returns [`ComplyError::Mismatch`] listing every non-compliant field, or any
/// error from [`check_compliance`].
pub async fn assert_compliance(
    source: &impl ManagedObjectSource,
    api_path: &str,
    template: &str,
    vars: &TemplateVars,
) -> Result<ComplianceReport> {
    let report = check_compliance(source, api_path, template, vars).await?;
    if !report.compliant {
        return Err(ComplyError::Mismatch {
            path: report.path,
            mismatches: report.mismatches,
        }
        .into());
    }
    Ok(report)
}
