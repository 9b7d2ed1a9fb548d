//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Gantry - readiness checks and launch gating for Unity Voice Lab.
#[derive(Debug, Parser)]
#[command(name = "gantry")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default gantry.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the readiness checklist (default if no command specified)
    Check(CheckArgs),

    /// Run the checklist and launch the app if every check passes
    Launch(LaunchArgs),

    /// Render the landing document
    Page(PageArgs),

    /// Validate a landing document against the markup contract
    Audit(AuditArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Output the readiness report as JSON
    #[arg(long)]
    pub json: bool,

    /// No prompts; exit after the checks settle
    #[arg(long)]
    pub non_interactive: bool,

    /// Seconds to wait for the asynchronous checks to settle
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Landing origin URL (overrides the configured origin)
    #[arg(long, value_name = "URL")]
    pub origin: Option<String>,
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            json: false,
            non_interactive: false,
            timeout: 10,
            origin: None,
        }
    }
}

/// Arguments for the `launch` command.
#[derive(Debug, Clone, clap::Args)]
pub struct LaunchArgs {
    /// Base URL to resolve the app destination against
    /// (defaults to the configured origin)
    #[arg(long, value_name = "URL")]
    pub base: Option<String>,

    /// Output the launch outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Seconds to wait for the asynchronous checks to settle
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Landing origin URL (overrides the configured origin)
    #[arg(long, value_name = "URL")]
    pub origin: Option<String>,
}

/// Arguments for the `page` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PageArgs {
    /// Write the document to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// Arguments for the `audit` command.
#[derive(Debug, Clone, clap::Args)]
pub struct AuditArgs {
    /// Landing document to validate
    pub file: PathBuf,

    /// Output format: human, json
    #[arg(long, default_value = "human")]
    pub format: String,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
