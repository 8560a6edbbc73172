//! CLI failures that end the process
//!
//! Per-record rejections are not CLI errors. They are written to stdout as
//! error responses and the input stream keeps going.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Config file unreadable, malformed, or declaring an invalid record type
    #[error("{0}")]
    Config(String),

    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record type '{0}' is not declared in the config")]
    UnknownType(String),
}

impl CliError {
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "CHECKED_CLI_CONFIG_ERROR",
            CliError::Io(_) | CliError::Json(_) => "CHECKED_CLI_IO_ERROR",
            CliError::UnknownType(_) => "CHECKED_CLI_UNKNOWN_TYPE",
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_message() {
        let err = CliError::UnknownType("Dog".into());
        assert_eq!(err.code(), "CHECKED_CLI_UNKNOWN_TYPE");
        assert_eq!(
            err.to_string(),
            "record type 'Dog' is not declared in the config"
        );
    }

    #[test]
    fn test_io_and_json_share_a_code() {
        let io_err: CliError = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert_eq!(io_err.code(), "CHECKED_CLI_IO_ERROR");
        assert!(io_err.to_string().contains("closed"));

        let json_err: CliError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(json_err.code(), "CHECKED_CLI_IO_ERROR");
        assert!(json_err.to_string().starts_with("malformed JSON"));
    }
}
