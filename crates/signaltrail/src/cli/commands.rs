//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Signal command arguments.
#[derive(Debug, Args)]
pub struct SignalCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Locate command arguments.
#[derive(Debug, Args)]
pub struct LocateCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Log command arguments.
#[derive(Debug, Args)]
pub struct LogCommand {
    /// Output the logged point as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Explicit latitude to log, skipping the resolver
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Explicit longitude to log, skipping the resolver
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Location type recorded with explicit coordinates
    #[arg(long, default_value = "Manual")]
    pub location_type: String,

    /// City recorded with explicit coordinates
    #[arg(long, default_value = "")]
    pub city: String,

    /// Region recorded with explicit coordinates
    #[arg(long, default_value = "")]
    pub region: String,

    /// Country recorded with explicit coordinates
    #[arg(long, default_value = "")]
    pub country: String,
}

/// Route command arguments.
#[derive(Debug, Args)]
pub struct RouteCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Print raw log contents instead of the parsed route
    #[arg(long)]
    pub raw: bool,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
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
    fn test_signal_command_debug() {
        let cmd = SignalCommand { json: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("json"));
    }

    #[test]
    fn test_route_command_debug() {
        let cmd = RouteCommand {
            json: false,
            raw: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("raw"));
    }

    #[test]
    fn test_clear_command_debug() {
        let cmd = ClearCommand { yes: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("yes"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
