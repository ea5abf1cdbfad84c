//! Command-line interface for pilgrimage.
//!
//! The `pilgrim` binary drives the core the way the app's screens would,
//! which makes it handy for demos and for poking at the SOS flow.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BundleCommand, ConfigCommand, DashboardCommand, IdentitiesCommand, SosCommand,
};

/// pilgrim - Pilgrimage companion core
///
/// Sign in as a demo identity, view role dashboards, switch language and run
/// the SOS escalation flow.
#[derive(Debug, Parser)]
#[command(name = "pilgrim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the demo identities
    Identities(IdentitiesCommand),

    /// Sign in and show the role dashboard
    Dashboard(DashboardCommand),

    /// Run the SOS escalation flow
    Sos(SosCommand),

    /// Show translated strings
    Bundle(BundleCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
