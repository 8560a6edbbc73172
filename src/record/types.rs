//! Record type declarations
//!
//! A record type is declared once through [`RecordTypeBuilder`]. Building it
//! turns each field declaration into a [`FieldValidator`] and freezes the slot
//! table, after which the set of attributes an instance may hold is fixed.

use std::collections::HashMap;
use std::sync::Arc;

use crate::observability::Logger;

use super::binding::Binding;
use super::coercion::Coercion;
use super::errors::{RecordError, RecordResult};
use super::instance::Record;
use super::validator::FieldValidator;
use super::value::Value;

/// A frozen record type: its name and validators in declaration order.
#[derive(Debug)]
pub struct RecordType {
    name: String,
    fields: Vec<FieldValidator>,
    slots: HashMap<String, usize>,
}

impl RecordType {
    /// Starts declaring a record type
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validators in declaration order
    pub fn fields(&self) -> &[FieldValidator] {
        &self.fields
    }

    /// Looks up a field's validator through the type itself
    pub fn field(&self, name: &str) -> Option<&FieldValidator> {
        self.slots.get(name).map(|&slot| &self.fields[slot])
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldValidator::name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Starts an explicit construction binding
    pub fn bind(self: &Arc<Self>) -> Binding {
        Binding::new(Arc::clone(self))
    }

    /// Constructs a record from keyword arguments.
    ///
    /// # Errors
    ///
    /// - `UnexpectedArgument` / `DuplicateArgument` for names that do not bind
    /// - `MissingArgument` for a required field left out
    /// - `Coercion` for the first field (in declaration order) whose value is rejected
    pub fn construct<I, K, V>(self: &Arc<Self>, kwargs: I) -> RecordResult<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.bind().args(kwargs).apply()
    }
}

/// Pending field declaration
struct FieldDecl {
    name: String,
    coercion: Coercion,
    default: Option<Value>,
}

/// Collects field declarations for a record type.
pub struct RecordTypeBuilder {
    name: String,
    fields: Vec<FieldDecl>,
}

impl RecordTypeBuilder {
    /// Declares a required field
    pub fn field(mut self, name: impl Into<String>, coercion: impl Into<Coercion>) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            coercion: coercion.into(),
            default: None,
        });
        self
    }

    /// Declares a field that may be omitted at construction
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        coercion: impl Into<Coercion>,
        default: impl Into<Value>,
    ) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            coercion: coercion.into(),
            default: Some(default.into()),
        });
        self
    }

    /// Freezes the declaration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDeclaration` if the type or a field name is not an
    /// identifier, a field is declared twice, or no field is declared.
    pub fn build(self) -> RecordResult<Arc<RecordType>> {
        if !is_identifier(&self.name) {
            return Err(RecordError::invalid_declaration(
                &self.name,
                "type name is not an identifier",
            ));
        }
        if self.fields.is_empty() {
            return Err(RecordError::invalid_declaration(
                &self.name,
                "at least one field must be declared",
            ));
        }

        let mut slots = HashMap::with_capacity(self.fields.len());
        let mut fields = Vec::with_capacity(self.fields.len());

        for (slot, decl) in self.fields.into_iter().enumerate() {
            if !is_identifier(&decl.name) {
                return Err(RecordError::invalid_declaration(
                    &self.name,
                    format!("field name '{}' is not an identifier", decl.name),
                ));
            }
            if slots.insert(decl.name.clone(), slot).is_some() {
                return Err(RecordError::invalid_declaration(
                    &self.name,
                    format!("field '{}' declared more than once", decl.name),
                ));
            }
            fields.push(FieldValidator::new(decl.name, slot, decl.coercion, decl.default));
        }

        let count = fields.len().to_string();
        Logger::trace(
            "RECORD_TYPE_DECLARED",
            &[("type", self.name.as_str()), ("fields", count.as_str())],
        );

        Ok(Arc::new(RecordType {
            name: self.name,
            fields,
            slots,
        }))
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
