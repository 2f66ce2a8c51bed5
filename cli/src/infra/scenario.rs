//! Loading scenario files and expected-document templates from disk.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::scenario::ScenarioFile;

/// A scenario file with paths resolved, plus its expected-document template.
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    pub file: ScenarioFile,
    pub expected: String,
}

/// Read a YAML scenario and the template it points at.
///
/// Relative paths in the file are resolved against the file's directory.
///
/// # Errors
///
/// Returns an error if either file cannot be read or the YAML is invalid.
pub fn load(path: &Path) -> Result<LoadedScenario> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let file: ScenarioFile = serde_yaml::from_str(&content)
        .with_context(|| format!("cannot parse {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let file = file.resolve_paths(base);
    let expected = read_template(&file.expected)?;
    Ok(LoadedScenario { file, expected })
}

/// Read an expected-document template.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}
