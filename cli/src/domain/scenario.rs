//! Test scenario domain types and pure helpers.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! Environment lookups are injected as closures so resolution stays testable.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ScenarioError;
use crate::domain::template::TemplateVars;

/// Variable that always carries the generated instance name.
pub const NAME_VAR: &str = "name";

/// Alphabet of generated unique ids.
const BASE62: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of generated unique ids.
pub const UNIQUE_ID_LEN: usize = 6;

/// Scenario description loaded from a YAML file.
///
/// Relative paths are resolved against the directory holding the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    /// Prefix of the generated instance name, e.g. `test-policies-snmp`.
    pub name_prefix: String,
    /// Terraform module directory.
    #[serde(default = "default_terraform_dir")]
    pub terraform_dir: PathBuf,
    /// Terraform output holding the managed-object identifier.
    #[serde(default = "default_output")]
    pub output: String,
    /// API path template, e.g. `/api/v1/snmp/Policies/{{ .moid }}`.
    pub api_path: String,
    /// Expected-document template file.
    pub expected: PathBuf,
    /// Terraform variable name → environment variable holding its value.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Static Terraform variables.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    /// Terraform variable that receives the API base URL (`IS_HOST`), so the
    /// module provisions against the host that is later queried.
    #[serde(default)]
    pub endpoint_var: Option<String>,
}

fn default_terraform_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output() -> String {
    "moid".to_string()
}

impl ScenarioFile {
    /// Resolve `terraform_dir` and `expected` against `base`.
    #[must_use]
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        if self.terraform_dir.is_relative() {
            self.terraform_dir = base.join(&self.terraform_dir);
        }
        if self.expected.is_relative() {
            self.expected = base.join(&self.expected);
        }
        self
    }
}

/// A single run of a scenario: the generated name plus every variable.
///
/// `vars` doubles as the Terraform input set and the template variables.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub unique_id: String,
    pub instance_name: String,
    pub vars: TemplateVars,
}

impl Scenario {
    /// Build a scenario for `file`, resolving `env` mappings through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingEnvironment`] for the first mapped
    /// environment variable that is unset or empty, and
    /// [`ScenarioError::InvalidNamePrefix`] for an unusable prefix.
    pub fn assemble<F>(file: &ScenarioFile, unique_id: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let instance_name = instance_name(&file.name_prefix, unique_id)?;

        let mut vars = file.vars.clone();
        for (var, env) in &file.env {
            let value = lookup(env).filter(|v| !v.is_empty()).ok_or_else(|| {
                ScenarioError::MissingEnvironment {
                    var: var.clone(),
                    env: env.clone(),
                }
            })?;
            vars.insert(var.clone(), value);
        }
        vars.insert(NAME_VAR.to_string(), instance_name.clone());

        Ok(Self {
            unique_id: unique_id.to_string(),
            instance_name,
            vars,
        })
    }

    /// Set the variable named by `file.endpoint_var` to `base_url`.
    pub fn set_endpoint(&mut self, file: &ScenarioFile, base_url: &str) {
        if let Some(var) = &file.endpoint_var {
            self.vars.insert(var.clone(), base_url.to_string());
        }
    }
}

/// Compose `<prefix>-<unique_id>`.
///
/// # Errors
///
/// Returns an error if `prefix` is empty or contains whitespace.
pub fn instance_name(prefix: &str, unique_id: &str) -> Result<String> {
    if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
        return Err(ScenarioError::InvalidNamePrefix(prefix.to_string()).into());
    }
    Ok(format!("{prefix}-{unique_id}"))
}

/// Generate a short unique identifier for test objects.
///
/// Format: 6 characters from `[0-9A-Za-z]`.
/// Entropy sources: nanosecond timestamp and two independent `RandomState` hashes.
#[must_use]
pub fn generate_unique_id() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    hasher.write_u64(RandomState::new().build_hasher().finish());
    hasher.write_u64(RandomState::new().build_hasher().finish());

    let mut n = hasher.finish();
    let mut id = String::with_capacity(UNIQUE_ID_LEN);
    for _ in 0..UNIQUE_ID_LEN {
        #[allow(clippy::cast_possible_truncation)] // n % 62 < 62
        id.push(char::from(BASE62[(n % 62) as usize]));
        n /= 62;
    }
    id
}

/// Returns `true` if `id` has the shape produced by [`generate_unique_id`].
#[must_use]
pub fn is_unique_id(id: &str) -> bool {
    id.len() == UNIQUE_ID_LEN && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Parse a `KEY=VALUE` pair as given on the command line.
///
/// # Errors
///
/// Returns [`ScenarioError::InvalidVar`] when there is no `=` or the key is empty.
pub fn parse_var(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(ScenarioError::InvalidVar(raw.to_string()).into()),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
