//! Record instances
//!
//! An instance holds exactly one canonical value per declared field. Reads
//! and writes go through the field's validator, and names outside the
//! declared set are refused.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value as Json};

use crate::observability::Logger;

use super::errors::{RecordError, RecordResult};
use super::types::RecordType;
use super::value::Value;

/// A constructed record.
#[derive(Debug, Clone)]
pub struct Record {
    record_type: Arc<RecordType>,
    values: Vec<Value>,
}

impl Record {
    pub(crate) fn new(record_type: Arc<RecordType>, values: Vec<Value>) -> Self {
        debug_assert_eq!(record_type.fields().len(), values.len());
        Self {
            record_type,
            values,
        }
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    pub fn type_name(&self) -> &str {
        self.record_type.name()
    }

    pub(crate) fn values(&self) -> &[Value] {
        &self.values
    }

    /// Reads a declared field.
    pub fn get(&self, name: &str) -> RecordResult<&Value> {
        self.record_type
            .field(name)
            .map(|field| &self.values[field.slot()])
            .ok_or_else(|| RecordError::unknown_attribute(self.type_name(), name))
    }

    /// Assigns a declared field through its validator.
    ///
    /// # Errors
    ///
    /// - `UnknownAttribute` if `name` is not declared, whatever the value
    /// - `Coercion` if the validator rejects the value; the field keeps its
    ///   previous value
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> RecordResult<()> {
        let value = value.into();
        let result = match self.record_type.field(name) {
            Some(field) => field.store(&mut self.values, &value),
            None => Err(RecordError::unknown_attribute(self.type_name(), name)),
        };

        if let Err(err) = &result {
            Logger::warn(
                "FIELD_ASSIGNMENT_REJECTED",
                &[
                    ("code", err.code()),
                    ("field", name),
                    ("type", self.type_name()),
                ],
            );
        }
        result
    }

    /// Field names and values in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.record_type.field_names().zip(self.values.iter())
    }

    /// JSON object of the canonical field values
    pub fn to_json(&self) -> Json {
        let map: Map<String, Json> = self
            .fields()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect();
        Json::Object(map)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name()
            && self.record_type.field_names().eq(other.record_type.field_names())
            && self.values == other.values
    }
}

/// `TypeName(field=repr, ...)` in declaration order
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name())?;
        for (i, (name, value)) in self.fields().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value.repr())?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::coercion::FieldType;
    use serde_json::json;

    fn felix() -> Record {
        RecordType::builder("Cat")
            .field("name", FieldType::Str)
            .field("weight", FieldType::Float)
            .build()
            .unwrap()
            .construct([("name", Value::from("Felix")), ("weight", Value::from(3.2))])
            .unwrap()
    }

    #[test]
    fn test_get_declared_field() {
        let cat = felix();
        assert_eq!(cat.get("name").unwrap(), &Value::from("Felix"));
        assert_eq!(cat.get("weight").unwrap().as_float(), Some(3.2));
    }

    #[test]
    fn test_get_unknown_field() {
        let err = felix().get("color").unwrap_err();
        assert_eq!(err.to_string(), "'Cat' object has no attribute 'color'");
    }

    #[test]
    fn test_set_coerces() {
        let mut cat = felix();
        cat.set("weight", 4).unwrap();
        assert_eq!(cat.get("weight").unwrap(), &Value::Float(4.0));
    }

    #[test]
    fn test_set_rejection_keeps_value() {
        let mut cat = felix();
        let err = cat.set("weight", "heavy").unwrap_err();
        assert_eq!(err.to_string(), "_weight cannot be set to 'heavy'");
        assert_eq!(cat.get("weight").unwrap(), &Value::Float(3.2));
    }

    #[test]
    fn test_set_unknown_attribute() {
        let mut cat = felix();
        let err = cat.set("color", "tan").unwrap_err();
        assert_eq!(err.to_string(), "'Cat' object has no attribute 'color'");
        assert_eq!(cat.fields().count(), 2);
    }

    #[test]
    fn test_validator_read_checks_owner() {
        let cat = felix();
        let weight = cat.record_type().field("weight").unwrap().clone();
        assert_eq!(weight.read(&cat).unwrap(), &Value::Float(3.2));

        let dog = RecordType::builder("Dog")
            .field("bark", FieldType::Str)
            .build()
            .unwrap()
            .construct([("bark", "woof")])
            .unwrap();
        assert!(weight.read(&dog).is_err());
    }

    #[test]
    fn test_display_and_json() {
        let cat = felix();
        assert_eq!(cat.to_string(), "Cat(name='Felix', weight=3.2)");
        assert_eq!(cat.to_json(), json!({"name": "Felix", "weight": 3.2}));
    }

    #[test]
    fn test_equality() {
        assert_eq!(felix(), felix());
        let mut heavier = felix();
        heavier.set("weight", 5.0).unwrap();
        assert_ne!(felix(), heavier);
    }
}
