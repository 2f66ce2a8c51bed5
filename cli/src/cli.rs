//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Terraform acceptance tests with managed-object compliance checks
#[derive(Parser)]
#[command(
    name = "tfcomply",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply a scenario's module, verify the object, then destroy it
    Run(commands::run::RunArgs),

    /// Check an existing managed object against an expected template
    Comply(commands::comply::ComplyArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Build the application context from the global flags.
    #[must_use]
    pub fn app(&self) -> AppContext {
        AppContext::new(&AppFlags {
            no_color: self.no_color,
            quiet: self.quiet,
            json: self.json,
        })
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self, app: &AppContext) -> Result<ExitCode> {
        match self.command {
            Command::Version => commands::version::run(app).map(|()| ExitCode::SUCCESS),
            Command::Run(args) => commands::run::run(app, &args)
                .await
                .map(|()| ExitCode::SUCCESS),
            Command::Comply(args) => commands::comply::run(app, &args).await,
        }
    }
}
