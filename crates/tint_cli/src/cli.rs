//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Edit theme variable sheets and inspect element scopes
#[derive(Parser, Debug)]
#[command(name = "tint")]
#[command(about = "Edit theme variable sheets and inspect element scopes")]
#[command(version)]
pub struct Cli {
    /// Project directory or path to tint.toml
    #[arg(short = 'C', long, default_value = ".", global = true)]
    pub project: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Write a theme document with every variable at its default
    Init {
        /// Overwrite an existing theme document
        #[arg(long)]
        force: bool,
    },

    /// List theme variables
    Vars {
        /// Also list variables outside the schema
        #[arg(long)]
        all: bool,
    },

    /// Print one variable's value
    Get {
        /// Variable name (`oui-rounded`, `--oui-rounded`, or a color key like `primary`)
        name: String,
    },

    /// Set a color variable from a hex value
    SetColor {
        /// Color key (`primary`, `gradient-brand-start`) or full variable name
        name: String,
        /// Hex color, e.g. `#ff8040`
        hex: String,
    },

    /// Set a variable to a raw value
    Set {
        /// Variable name
        name: String,
        /// Raw CSS value
        value: String,
    },

    /// Manage override rules
    Overrides {
        #[command(subcommand)]
        action: OverridesAction,
    },

    /// Resolve variables and override rules for an element of a DOM snapshot
    Inspect {
        /// DOM snapshot (JSON)
        #[arg(long)]
        snapshot: PathBuf,

        /// Selector of the element to inspect
        #[arg(long)]
        select: String,

        /// Only variables declared on the element and its ancestors
        #[arg(long)]
        scoped: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum OverridesAction {
    /// List override rules
    List,
    /// Add a rule or replace the properties of an existing one
    Upsert {
        selector: String,
        properties: String,
    },
    /// Remove the rule for a selector
    Delete { selector: String },
}
