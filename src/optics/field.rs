//! Named record fields.

use std::fmt;
use std::sync::Arc;

use super::access::{FocusedAccess, Mapper, MapperMut};
use crate::error::{OpticError, OpticResult};
use crate::value::Value;

/// Focuses the record field `name`.
///
/// Reading or replacing a field the record lacks fails with
/// [`OpticError::MissingField`]; any other kind of value fails with
/// [`OpticError::StructuralTypeError`]. [`insert`](FocusedAccess::insert)
/// appends the field (or overwrites it), and [`delete`](FocusedAccess::delete)
/// removes it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    name: Arc<str>,
}

impl Field {
    /// Creates a field optic.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// The focused field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrows the focus.
    ///
    /// # Errors
    ///
    /// Fails when `source` is not a record or lacks the field.
    pub fn peek<'a>(&self, source: &'a Value) -> OpticResult<&'a Value> {
        match source {
            Value::Record(record) => record.require(&self.name),
            other => Err(OpticError::structural("record", other.kind())),
        }
    }

    fn slot<'a>(&self, target: &'a mut Value) -> OpticResult<&'a mut Value> {
        match target {
            Value::Record(record) => record.require_mut(&self.name),
            other => Err(OpticError::structural("record", other.kind())),
        }
    }
}

impl FocusedAccess for Field {
    fn read(&self, source: &Value) -> OpticResult<Value> {
        self.peek(source).cloned()
    }

    fn replace(&self, mut source: Value, value: Value) -> OpticResult<Value> {
        *self.slot(&mut source)? = value;
        Ok(source)
    }

    fn update(&self, mut source: Value, function: &mut Mapper<'_>) -> OpticResult<Value> {
        let slot = self.slot(&mut source)?;
        *slot = function(std::mem::take(slot))?;
        Ok(source)
    }

    fn focus_mut(&self, target: &mut Value, function: &mut MapperMut<'_>) -> OpticResult<()> {
        function(self.slot(target)?)
    }

    fn insert(&self, source: Value, value: Value) -> OpticResult<Value> {
        let record = source.into_record()?;
        Ok(Value::Record(record.with_new_field(self.name.clone(), value)))
    }

    fn delete(&self, source: Value) -> OpticResult<Value> {
        source
            .into_record()?
            .without_field(&self.name)
            .map(Value::Record)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, ".{}", self.name)
    }
}
