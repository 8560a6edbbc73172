//! CLI module for checked
//!
//! Provides command-line interface for:
//! - demo: run the built-in record examples
//! - construct: build records of a declared type from JSON lines on stdin
//! - describe: list declared record types and their fields

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{construct, construct_stream, demo, describe, run, run_command};
pub use config::Config;
pub use errors::{CliError, CliResult};
pub use io::{read_requests, write_error, write_response};
