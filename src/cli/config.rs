//! Record type catalog configuration
//!
//! ```json
//! {
//!   "log_level": "warn",
//!   "record_types": [
//!     { "name": "Cat",
//!       "fields": [
//!         { "name": "name", "type": "str" },
//!         { "name": "weight", "type": "float", "default": 0.0 } ] } ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::record::{TypeDeclaration, TypeRegistry};

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Minimum log severity (optional, default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: Severity,

    /// Declared record types
    #[serde(default)]
    pub record_types: Vec<TypeDeclaration>,
}

fn default_log_level() -> Severity {
    Severity::Warn
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parse configuration text.
    ///
    /// Record type declarations are checked by [`Config::registry`], so a
    /// caller can set the log level before any declaration is logged.
    pub fn from_json(content: &str) -> CliResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| CliError::Config(format!("Invalid config JSON: {}", e)))
    }

    /// Builds the registry of declared record types
    pub fn registry(&self) -> CliResult<TypeRegistry> {
        TypeRegistry::from_declarations(&self.record_types)
            .map_err(|e| CliError::Config(format!("Invalid record type: {}", e)))
    }
}
