//! CLI interface for Roster
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines all commands and global flags for building and inspecting teams.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Roster team balancing engine
///
/// Splits the registered member pool into teams balanced on leadership,
/// personality, gender and preference, using each member's survey answers.
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Balance the eligible pool into teams and save them
    Build {
        /// Number of eligible members expected in the pool
        #[arg(long, value_name = "N")]
        total: usize,

        /// Number of teams to build
        #[arg(long, value_name = "K")]
        teams: usize,
    },

    /// Show the saved teams
    Teams,

    /// Delete the saved teams and reset grouped markers
    Clear,

    /// Load members, questions and answers from a JSON roster file
    Import {
        /// Roster file path
        file: PathBuf,
    },

    /// List eligible members
    Members,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["roster", "teams"]);
        assert!(matches!(cli.command, Command::Teams));
        assert!(!cli.json);
        assert!(cli.log.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["roster", "--json", "--log", "debug", "members"]);
        assert!(cli.json);
        assert_eq!(cli.log, Some("debug".to_string()));
    }

    #[test]
    fn test_build_command() {
        let cli = Cli::parse_from(["roster", "build", "--total", "12", "--teams", "3"]);
        if let Command::Build { total, teams } = cli.command {
            assert_eq!(total, 12);
            assert_eq!(teams, 3);
        } else {
            panic!("Expected Build command");
        }
    }

    #[test]
    fn test_build_requires_both_numbers() {
        assert!(Cli::try_parse_from(["roster", "build", "--total", "12"]).is_err());
        assert!(Cli::try_parse_from(["roster", "build", "--total", "x", "--teams", "2"]).is_err());
    }

    #[test]
    fn test_import_command() {
        let cli = Cli::parse_from(["roster", "import", "roster.json", "--config", "/tmp/c.toml"]);
        if let Command::Import { file } = cli.command {
            assert_eq!(file, PathBuf::from("roster.json"));
        } else {
            panic!("Expected Import command");
        }
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_clear_command() {
        let cli = Cli::parse_from(["roster", "clear"]);
        assert!(matches!(cli.command, Command::Clear));
    }
}
