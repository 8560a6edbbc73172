//! Validated record types
//!
//! A record type is declared by naming its fields, each with a coercion rule
//! and an optional default. Every value a field receives, at construction or
//! by later assignment, is coerced by that field's validator.
//!
//! # Rules
//!
//! - Construction binds keyword arguments strictly: unknown or repeated
//!   names and missing required fields are rejected
//! - Defaults pass through their field's coercion like supplied values
//! - Stored values are always the coerced values
//! - The attribute set of an instance is exactly the declared field set
//! - Failed construction never yields a partial record
//!
//! ```
//! use checked::record::{FieldType, RecordType};
//!
//! let movie = RecordType::builder("Movie")
//!     .field("title", FieldType::Str)
//!     .field("year", FieldType::Int)
//!     .field("box_office", FieldType::Float)
//!     .build()
//!     .unwrap();
//!
//! let godfather = movie
//!     .bind()
//!     .arg("title", "The Godfather")
//!     .arg("year", 1972)
//!     .arg("box_office", 137)
//!     .apply()
//!     .unwrap();
//! assert_eq!(
//!     godfather.to_string(),
//!     "Movie(title='The Godfather', year=1972, box_office=137.0)"
//! );
//! ```

mod binding;
mod coercion;
mod errors;
mod instance;
mod registry;
mod types;
mod validator;
mod value;

pub use binding::Binding;
pub use coercion::{CoerceFn, Coercion, FieldType};
pub use errors::{CoercionFailure, FailureKind, RecordError, RecordResult, Severity};
pub use instance::Record;
pub use registry::{FieldDeclaration, TypeDeclaration, TypeRegistry};
pub use types::{RecordType, RecordTypeBuilder};
pub use validator::FieldValidator;
pub use value::Value;
