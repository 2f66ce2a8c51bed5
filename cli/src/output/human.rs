//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::application::services::acceptance::AcceptanceReport;
use crate::application::services::comply::ComplianceReport;
use crate::output::OutputContext;

/// Renders reports as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("tfcomply {version}");
    }

    /// Render a compliance report, listing each mismatch.
    pub fn render_compliance(&self, report: &ComplianceReport) {
        if report.compliant {
            self.ctx.success(&format!("{} complies", report.path));
            return;
        }
        self.ctx.error(&format!(
            "{} does not comply ({} mismatch(es))",
            report.path,
            report.mismatches.len()
        ));
        for m in &report.mismatches {
            eprintln!("      {}", m.to_string().style(self.ctx.styles.dim));
        }
    }

    /// Render the summary of a full acceptance run.
    pub fn render_acceptance(&self, report: &AcceptanceReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header("Acceptance passed");
        self.ctx.kv("Instance:", &report.instance_name);
        self.ctx.kv(&format!("{}:", report.output), &report.object_id);
        self.ctx.kv("Checked:", &report.compliance.path);
    }
}
