//! Tint CLI
//!
//! Command-line front end for the theme engine:
//! - Create and edit theme documents (`init`, `set`, `set-color`)
//! - Read variables (`vars`, `get`)
//! - Manage override rules (`overrides list|upsert|delete`)
//! - Inspect an element of a DOM snapshot (`inspect`)

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::Project;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let project = Project::load(&cli.project)?;
    tracing::debug!("Theme document: {}", project.theme_path.display());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&project, cli.command, &mut out)
}
