//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Identities command arguments.
#[derive(Debug, Args)]
pub struct IdentitiesCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Demo identity to sign in as
    #[arg(long = "as", value_name = "ID", default_value = "pilgrim")]
    pub identity: String,

    /// Language code for display strings
    #[arg(short, long)]
    pub lang: Option<String>,
}

/// SOS command arguments.
#[derive(Debug, Args)]
pub struct SosCommand {
    /// Demo identity to sign in as
    #[arg(long = "as", value_name = "ID", default_value = "pilgrim")]
    pub identity: String,

    /// Back out at the confirmation step instead of sending
    #[arg(long)]
    pub cancel: bool,

    /// Message to attach to the SOS record
    #[arg(short, long)]
    pub message: Option<String>,

    /// Language code for display strings
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Wait for notifications to expire before exiting
    #[arg(short, long)]
    pub wait: bool,
}

/// Bundle command arguments.
#[derive(Debug, Args)]
pub struct BundleCommand {
    /// Language code (unknown codes show the default language)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Show a single key instead of the whole bundle
    #[arg(short, long)]
    pub key: Option<String>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sos_command_debug() {
        let cmd = SosCommand {
            identity: "volunteer".to_string(),
            cancel: true,
            message: None,
            lang: Some("ur".to_string()),
            wait: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("volunteer"));
        assert!(debug_str.contains("cancel: true"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
