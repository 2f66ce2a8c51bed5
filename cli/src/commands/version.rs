//! Version command

use anyhow::Result;

use crate::app::AppContext;

#[derive(serde::Serialize)]
struct VersionOutput {
    version: &'static str,
}

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    app.emit(&VersionOutput { version }, |h| h.render_version(version))
}
