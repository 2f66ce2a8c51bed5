//! Expected-document templates.
//!
//! Templates are JSON text with `{{ .key }}` placeholders. Substituted values
//! are escaped as JSON string content, so a placeholder is expected to sit
//! inside a quoted string (`"Name": "{{ .name }}"`). API paths use the same
//! placeholders but take values verbatim, see [`render_path`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use anyhow::Result;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::domain::error::{ComplyError, TemplateError};

/// Template variables, keyed by placeholder name.
pub type TemplateVars = BTreeMap<String, String>;

#[allow(clippy::expect_used)] // compile-time constant pattern
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid placeholder regex")
});

/// Substitute every `{{ .key }}` in `template` with the escaped value of `key`.
///
/// # Errors
///
/// Returns [`TemplateError::MissingVariable`] for the first placeholder whose
/// key is not in `vars`.
pub fn render(template: &str, vars: &TemplateVars) -> Result<String> {
    Ok(substitute(template, vars, |_, value| Ok(escape(value)))?)
}

/// Render an API path template such as `/api/v1/snmp/Policies/{{ .moid }}`.
///
/// Values are inserted verbatim and must be single path segments made of
/// unreserved characters (`A-Z a-z 0-9 - . _ ~`).
///
/// # Errors
///
/// Returns [`TemplateError::MissingVariable`] or
/// [`TemplateError::UnsafePathValue`] for a bad placeholder, and
/// [`ComplyError::InvalidPath`] when the result does not start with `/`.
pub fn render_path(template: &str, vars: &TemplateVars) -> Result<String> {
    let path = substitute(template, vars, |key, value| {
        if is_path_segment(value) {
            Ok(value.to_string())
        } else {
            Err(TemplateError::UnsafePathValue {
                key: key.to_string(),
                value: value.to_string(),
            })
        }
    })?;
    if !path.starts_with('/') {
        return Err(ComplyError::InvalidPath(path).into());
    }
    Ok(path)
}

fn substitute<F>(template: &str, vars: &TemplateVars, mut encode: F) -> Result<String, TemplateError>
where
    F: FnMut(&str, &str) -> Result<String, TemplateError>,
{
    let mut failure: Option<TemplateError> = None;
    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        let key = &caps[1];
        let encoded = match vars.get(key) {
            Some(value) => encode(key, value),
            None => Err(TemplateError::MissingVariable(key.to_string())),
        };
        encoded.unwrap_or_else(|e| {
            failure.get_or_insert(e);
            String::new()
        })
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(rendered.into_owned()),
    }
}

fn is_path_segment(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'))
}

/// Render `template` and parse the result as a JSON document.
///
/// # Errors
///
/// Returns an error if a variable is missing or the rendered text is not JSON.
pub fn render_json(template: &str, vars: &TemplateVars) -> Result<Value> {
    let rendered = render(template, vars)?;
    serde_json::from_str(&rendered)
        .map_err(|e| TemplateError::InvalidJson(e.to_string()).into())
}

/// Escape `value` as the content of a JSON string (without surrounding quotes).
fn escape(value: &str) -> String {
    let quoted = Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
