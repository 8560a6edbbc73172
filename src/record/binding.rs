//! Construction binding
//!
//! Binds keyword arguments against a record type's declared fields:
//! 1. every supplied name must match a field, and appear only once
//! 2. every field without a default must be supplied
//! 3. each field's value (supplied or default) passes its validator,
//!    in declaration order
//!
//! A record is only returned once all three steps succeed.

use std::collections::HashSet;
use std::sync::Arc;

use crate::observability::Logger;

use super::errors::{RecordError, RecordResult};
use super::instance::Record;
use super::types::RecordType;
use super::value::Value;

/// Keyword arguments pending binding against one record type.
#[derive(Debug)]
pub struct Binding {
    record_type: Arc<RecordType>,
    args: Vec<(String, Value)>,
}

impl Binding {
    pub(crate) fn new(record_type: Arc<RecordType>) -> Self {
        Self {
            record_type,
            args: Vec::new(),
        }
    }

    /// Supplies one keyword argument
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.push((name.into(), value.into()));
        self
    }

    /// Supplies several keyword arguments, keeping their order
    pub fn args<I, K, V>(mut self, kwargs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.args
            .extend(kwargs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Validates the binding and builds the record.
    pub fn apply(self) -> RecordResult<Record> {
        let record_type = Arc::clone(&self.record_type);
        match self.bind_and_coerce() {
            Ok(values) => {
                Logger::trace("RECORD_CONSTRUCTED", &[("type", record_type.name())]);
                Ok(Record::new(record_type, values))
            }
            Err(err) => {
                let message = err.to_string();
                Logger::warn(
                    "RECORD_REJECTED",
                    &[
                        ("code", err.code()),
                        ("message", message.as_str()),
                        ("type", record_type.name()),
                    ],
                );
                Err(err)
            }
        }
    }

    fn bind_and_coerce(self) -> RecordResult<Vec<Value>> {
        let record_type = self.record_type;
        let mut supplied: Vec<Option<Value>> = vec![None; record_type.fields().len()];
        let mut seen = HashSet::with_capacity(self.args.len());

        for (name, value) in self.args {
            let field = record_type
                .field(&name)
                .ok_or_else(|| RecordError::UnexpectedArgument(name.clone()))?;
            if !seen.insert(field.slot()) {
                return Err(RecordError::DuplicateArgument(name));
            }
            supplied[field.slot()] = Some(value);
        }

        if let Some(missing) = record_type
            .fields()
            .iter()
            .find(|field| field.is_required() && supplied[field.slot()].is_none())
        {
            return Err(RecordError::MissingArgument(missing.name().to_string()));
        }

        let mut values = Vec::with_capacity(supplied.len());
        for (field, raw) in record_type.fields().iter().zip(&supplied) {
            let value = field
                .resolve(raw.as_ref())?
                .ok_or_else(|| RecordError::MissingArgument(field.name().to_string()))?;
            values.push(value);
        }
        Ok(values)
    }
}
