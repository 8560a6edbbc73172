//! Per-field validator
//!
//! Every value a field ever receives, at construction or by later
//! assignment, passes through that field's validator. The validator owns the
//! coercion rule, the optional default and the index of the storage slot it
//! guards.

use super::coercion::Coercion;
use super::errors::{RecordError, RecordResult};
use super::instance::Record;
use super::value::Value;

/// Validator bound to exactly one declared field.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    name: String,
    storage_name: String,
    slot: usize,
    coercion: Coercion,
    default: Option<Value>,
}

impl FieldValidator {
    pub(crate) fn new(name: String, slot: usize, coercion: Coercion, default: Option<Value>) -> Self {
        Self {
            storage_name: format!("_{}", name),
            name,
            slot,
            coercion,
            default,
        }
    }

    /// Public field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Internal storage name, used to identify the field in coercion errors
    pub fn storage_name(&self) -> &str {
        &self.storage_name
    }

    /// Position of the field in declaration order
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn coercion(&self) -> &Coercion {
        &self.coercion
    }

    /// Declared default, before coercion
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// A field without a declared default must be supplied at construction
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Coerces a raw value, mapping rule failures to `RecordError::Coercion`.
    pub fn coerce(&self, raw: &Value) -> RecordResult<Value> {
        self.coercion
            .apply(raw)
            .map_err(|source| RecordError::Coercion {
                storage_name: self.storage_name.clone(),
                value_repr: raw.repr(),
                source,
            })
    }

    /// Resolves the value for a construction slot.
    ///
    /// `None` means the caller supplied nothing: the default is coerced in its
    /// place, or `Ok(None)` reports the slot as unfilled.
    pub fn resolve(&self, raw: Option<&Value>) -> RecordResult<Option<Value>> {
        match raw.or(self.default.as_ref()) {
            Some(value) => self.coerce(value).map(Some),
            None => Ok(None),
        }
    }

    /// Coerces `raw` and writes it into this field's slot.
    ///
    /// The slot keeps its old value if coercion fails.
    pub(crate) fn store(&self, slots: &mut [Value], raw: &Value) -> RecordResult<()> {
        let value = self.coerce(raw)?;
        slots[self.slot] = value;
        Ok(())
    }

    /// Reads this field from a record of the declaring type.
    pub fn read<'r>(&self, record: &'r Record) -> RecordResult<&'r Value> {
        let owned = record
            .record_type()
            .field(&self.name)
            .map_or(false, |field| field.slot == self.slot);
        if !owned {
            return Err(RecordError::unknown_attribute(
                record.type_name(),
                &self.name,
            ));
        }
        Ok(&record.values()[self.slot])
    }
}
