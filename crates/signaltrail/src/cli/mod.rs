//! Command-line interface for signaltrail.
//!
//! This module provides the CLI structure and command definitions for the
//! `sigtrail` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ClearCommand, ConfigCommand, LocateCommand, LogCommand, RouteCommand, SignalCommand,
};

/// sigtrail - Log where your Wi-Fi takes you
///
/// Watches your Wi-Fi association, and whenever you connect to or roam
/// between networks, resolves your IP-based location and appends it to a
/// personal route log you can summarize later.
#[derive(Debug, Parser)]
#[command(name = "sigtrail")]
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
    /// Watch Wi-Fi transitions and log locations automatically
    Watch,

    /// Show the current Wi-Fi signal and an encouragement to match
    Signal(SignalCommand),

    /// Resolve the current location without logging it
    Locate(LocateCommand),

    /// Resolve the current location and append it to the route log
    Log(LogCommand),

    /// Show the logged route and its statistics
    Route(RouteCommand),

    /// Clear the route log
    Clear(ClearCommand),

    /// View or validate configuration
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "sigtrail");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: true,
            command: Command::Watch,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: false,
            command: Command::Watch,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose() {
        let cli = Cli {
            config: None,
            verbose: 1,
            quiet: false,
            command: Command::Watch,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_trace() {
        let cli = Cli {
            config: None,
            verbose: 3,
            quiet: false,
            command: Command::Watch,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_watch() {
        let args = vec!["sigtrail", "watch"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Watch));
    }

    #[test]
    fn test_parse_signal_json() {
        let args = vec!["sigtrail", "signal", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Signal(SignalCommand { json: true })));
    }

    #[test]
    fn test_parse_log() {
        let args = vec!["sigtrail", "log"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Log(_)));
    }

    #[test]
    fn test_parse_log_with_explicit_coordinates() {
        let args = vec![
            "sigtrail", "log", "--lat", "-33.87", "--lon", "151.21", "--city", "Sydney",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Log(cmd) = cli.command else {
            panic!("expected log command");
        };
        assert_eq!(cmd.lat, Some(-33.87));
        assert_eq!(cmd.lon, Some(151.21));
        assert_eq!(cmd.city, "Sydney");
        assert_eq!(cmd.location_type, "Manual");
        assert_eq!(cmd.region, "");
    }

    #[test]
    fn test_parse_log_lat_requires_lon() {
        let args = vec!["sigtrail", "log", "--lat", "9.99"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_route_raw() {
        let args = vec!["sigtrail", "route", "--raw"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Route(RouteCommand { raw: true, .. })));
    }

    #[test]
    fn test_parse_clear_yes() {
        let args = vec!["sigtrail", "clear", "-y"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Clear(ClearCommand { yes: true })));
    }

    #[test]
    fn test_parse_config_show() {
        let args = vec!["sigtrail", "config", "show"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: false })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["sigtrail", "-c", "/custom/config.toml", "watch"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let args = vec!["sigtrail", "-v", "watch"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["sigtrail", "-q", "watch"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }
}
