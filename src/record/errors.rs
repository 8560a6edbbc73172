//! Record error types
//!
//! Error codes:
//! - CHECKED_COERCION_FAILED (REJECT)
//! - CHECKED_UNEXPECTED_ARGUMENT (REJECT)
//! - CHECKED_MISSING_ARGUMENT (REJECT)
//! - CHECKED_UNKNOWN_ATTRIBUTE (REJECT)
//! - CHECKED_INVALID_DECLARATION (REJECT)
//!
//! `Display` renders only the message, so callers can match on exact text.

use std::fmt;

use thiserror::Error;

/// Severity levels for record errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The single offending operation is rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Why a coercion rule refused a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The value's type cannot be converted at all
    TypeError,
    /// The type is acceptable but this particular value is not
    ValueError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::TypeError => write!(f, "TypeError"),
            FailureKind::ValueError => write!(f, "ValueError"),
        }
    }
}

/// Failure reported by a coercion rule.
///
/// Wrapped into [`RecordError::Coercion`] by the field validator, which adds
/// the field's storage name and the rejected value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {reason}")]
pub struct CoercionFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl CoercionFailure {
    pub fn type_error(reason: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::TypeError,
            reason: reason.into(),
        }
    }

    pub fn value_error(reason: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::ValueError,
            reason: reason.into(),
        }
    }
}

/// Errors raised while declaring, constructing or mutating records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A supplied or default value could not be coerced
    #[error("{storage_name} cannot be set to {value_repr}")]
    Coercion {
        storage_name: String,
        value_repr: String,
        #[source]
        source: CoercionFailure,
    },

    /// A keyword matched no declared field
    #[error("got an unexpected keyword argument '{0}'")]
    UnexpectedArgument(String),

    /// The same keyword was supplied twice
    #[error("got multiple values for argument '{0}'")]
    DuplicateArgument(String),

    /// A required field was neither supplied nor defaulted
    #[error("missing a required argument: '{0}'")]
    MissingArgument(String),

    /// Read or write of a name outside the declared field set
    #[error("'{type_name}' object has no attribute '{attribute}'")]
    UnknownAttribute { type_name: String, attribute: String },

    /// The record type declaration itself is malformed
    #[error("invalid declaration of '{type_name}': {reason}")]
    InvalidDeclaration { type_name: String, reason: String },
}

impl RecordError {
    pub fn unknown_attribute(type_name: impl Into<String>, attribute: impl Into<String>) -> Self {
        RecordError::UnknownAttribute {
            type_name: type_name.into(),
            attribute: attribute.into(),
        }
    }

    pub fn invalid_declaration(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        RecordError::InvalidDeclaration {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RecordError::Coercion { .. } => "CHECKED_COERCION_FAILED",
            RecordError::UnexpectedArgument(_) | RecordError::DuplicateArgument(_) => {
                "CHECKED_UNEXPECTED_ARGUMENT"
            }
            RecordError::MissingArgument(_) => "CHECKED_MISSING_ARGUMENT",
            RecordError::UnknownAttribute { .. } => "CHECKED_UNKNOWN_ATTRIBUTE",
            RecordError::InvalidDeclaration { .. } => "CHECKED_INVALID_DECLARATION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;
