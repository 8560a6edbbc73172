//! checked - validated record types
//!
//! Records declare their fields with coercion rules and optional defaults;
//! every construction and assignment goes through the field's validator.

pub mod cli;
pub mod observability;
pub mod record;
