//! Template-subset comparison between an expected and an actual JSON document.
//!
//! Pure functions only, no I/O.
//!
//! Rules:
//! - objects: every expected key must be present and comply; extra actual keys are ignored
//! - arrays: equal length, element-wise compliance by index
//! - numbers: numeric equality (`161` == `161.0`)
//! - everything else: exact equality

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A single field that does not satisfy the expected document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    /// RFC 6901 JSON Pointer to the field, `""` for the document root.
    pub pointer: String,
    #[serde(flatten)]
    pub kind: MismatchKind,
}

/// Why a field failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MismatchKind {
    /// Expected key is absent from the actual object.
    Missing { expected: Value },
    /// Both sides have the same JSON type but different values.
    ValueDiffers { expected: Value, actual: Value },
    /// The two sides have different JSON types.
    TypeDiffers {
        expected: &'static str,
        actual: &'static str,
    },
    /// Arrays differ in length.
    LengthDiffers { expected: usize, actual: usize },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = if self.pointer.is_empty() {
            "/"
        } else {
            &self.pointer
        };
        match &self.kind {
            MismatchKind::Missing { expected } => {
                write!(f, "{at}: missing (expected {expected})")
            }
            MismatchKind::ValueDiffers { expected, actual } => {
                write!(f, "{at}: expected {expected}, got {actual}")
            }
            MismatchKind::TypeDiffers { expected, actual } => {
                write!(f, "{at}: expected {expected}, got {actual}")
            }
            MismatchKind::LengthDiffers { expected, actual } => {
                write!(f, "{at}: expected {expected} element(s), got {actual}")
            }
        }
    }
}

/// Compare `expected` against `actual` and collect every mismatch.
///
/// An empty result means `actual` complies with `expected`.
#[must_use]
pub fn compare(expected: &Value, actual: &Value) -> Vec<Mismatch> {
    let mut out = Vec::new();
    walk(expected, actual, &mut String::new(), &mut out);
    out
}

fn walk(expected: &Value, actual: &Value, pointer: &mut String, out: &mut Vec<Mismatch>) {
    match (expected, actual) {
        (Value::Object(exp), Value::Object(act)) => {
            for (key, exp_val) in exp {
                let len = pointer.len();
                push_token(pointer, key);
                match act.get(key) {
                    Some(act_val) => walk(exp_val, act_val, pointer, out),
                    None => out.push(Mismatch {
                        pointer: pointer.clone(),
                        kind: MismatchKind::Missing {
                            expected: exp_val.clone(),
                        },
                    }),
                }
                pointer.truncate(len);
            }
        }
        (Value::Array(exp), Value::Array(act)) => {
            if exp.len() != act.len() {
                out.push(Mismatch {
                    pointer: pointer.clone(),
                    kind: MismatchKind::LengthDiffers {
                        expected: exp.len(),
                        actual: act.len(),
                    },
                });
                return;
            }
            for (i, (e, a)) in exp.iter().zip(act).enumerate() {
                let len = pointer.len();
                push_token(pointer, &i.to_string());
                walk(e, a, pointer, out);
                pointer.truncate(len);
            }
        }
        (Value::Number(e), Value::Number(a)) => {
            if !numbers_equal(e, a) {
                out.push(value_differs(pointer, expected, actual));
            }
        }
        (e, a) if type_name(e) == type_name(a) => {
            if e != a {
                out.push(value_differs(pointer, expected, actual));
            }
        }
        (e, a) => out.push(Mismatch {
            pointer: pointer.clone(),
            kind: MismatchKind::TypeDiffers {
                expected: type_name(e),
                actual: type_name(a),
            },
        }),
    }
}

fn value_differs(pointer: &str, expected: &Value, actual: &Value) -> Mismatch {
    Mismatch {
        pointer: pointer.to_string(),
        kind: MismatchKind::ValueDiffers {
            expected: expected.clone(),
            actual: actual.clone(),
        },
    }
}

#[allow(clippy::float_cmp)]
fn numbers_equal(e: &serde_json::Number, a: &serde_json::Number) -> bool {
    if let (Some(x), Some(y)) = (e.as_i64(), a.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (e.as_u64(), a.as_u64()) {
        return x == y;
    }
    match (e.as_f64(), a.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Append one escaped reference token (RFC 6901 §3) to `pointer`.
fn push_token(pointer: &mut String, token: &str) {
    pointer.push('/');
    for c in token.chars() {
        match c {
            '~' => pointer.push_str("~0"),
            '/' => pointer.push_str("~1"),
            c => pointer.push(c),
        }
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
