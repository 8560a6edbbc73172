//! CLI argument definitions using clap
//!
//! Commands:
//! - checked demo
//! - checked construct --config <path> --type <Name>
//! - checked describe --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::Severity;

/// checked - validated record types
#[derive(Parser, Debug)]
#[command(name = "checked")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Minimum log severity written to stderr (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<Severity>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the built-in Movie and Cat examples
    Demo,

    /// Construct records from JSON keyword arguments, one object per stdin line
    Construct {
        /// Path to the record type catalog
        #[arg(long, default_value = "./checked.json")]
        config: PathBuf,

        /// Name of the record type to construct
        #[arg(long = "type")]
        type_name: String,
    },

    /// Print the declared fields of every record type
    Describe {
        /// Path to the record type catalog
        #[arg(long, default_value = "./checked.json")]
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_construct() {
        let cli = Cli::try_parse_from([
            "checked",
            "construct",
            "--config",
            "types.json",
            "--type",
            "Movie",
        ])
        .unwrap();
        match cli.command {
            Command::Construct { config, type_name } => {
                assert_eq!(config, PathBuf::from("types.json"));
                assert_eq!(type_name, "Movie");
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_parse_log_level() {
        let cli = Cli::try_parse_from(["checked", "demo", "--log-level", "trace"]).unwrap();
        assert_eq!(cli.log_level, Some(Severity::Trace));
        assert!(Cli::try_parse_from(["checked", "demo", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_construct_requires_type() {
        assert!(Cli::try_parse_from(["checked", "construct"]).is_err());
    }
}
