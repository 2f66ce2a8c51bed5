//! Domain layer: pure logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod comply;
pub mod error;
pub mod retry;
pub mod scenario;
pub mod template;

pub use comply::{Mismatch, MismatchKind, compare};
pub use error::{ApiError, ComplyError, CredentialError, ProvisionError, ScenarioError, TemplateError};
pub use retry::RetryPolicy;
pub use scenario::{Scenario, ScenarioFile, generate_unique_id};
pub use template::{TemplateVars, render, render_json, render_path};
