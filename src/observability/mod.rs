//! Observability for checked
//!
//! Structured JSON logging of record declaration, construction and rejection
//! events. Logging never changes the outcome of an operation.
//!
//! ```ignore
//! use checked::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::info("CATALOG_LOADED", &[("types", "2")]);
//! ```

mod logger;

pub use logger::{Logger, Severity};
