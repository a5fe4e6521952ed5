//! Named records.
//!
//! A [`Record`] is the capability pair the engine needs from any record
//! type: read a named field, and rebuild the record with one named field
//! replaced. Field order is the declaration order and survives every
//! rebuild.

use std::fmt;
use std::sync::Arc;

use super::Value;
use crate::error::{OpticError, OpticResult};

type Fields = Vec<(Arc<str>, Value)>;

/// A named record with ordered fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    name: Arc<str>,
    fields: Arc<Fields>,
}

impl Record {
    /// Creates an empty record of type `name`.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            fields: Arc::new(Vec::new()),
        }
    }

    /// Starts building a record of type `name`.
    ///
    /// # Example
    ///
    /// ```
    /// use optica::value::{Record, Value};
    ///
    /// let point = Record::builder("Point").field("x", 1).field("y", 2).build();
    /// assert_eq!(point.field("x"), Some(&Value::Int(1)));
    /// assert_eq!(point.field_names().collect::<Vec<_>>(), vec!["x", "y"]);
    /// ```
    pub fn builder(name: impl Into<Arc<str>>) -> RecordBuilder {
        RecordBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Creates a record from `(field, value)` pairs in declaration order.
    ///
    /// A repeated field name keeps its first position and its last value.
    pub fn from_fields<I, K, V>(name: impl Into<Arc<str>>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Arc<str>>,
        V: Into<Value>,
    {
        fields
            .into_iter()
            .fold(Self::new(name), |record, (field, value)| {
                record.with_new_field(field, value)
            })
    }

    /// The type name of the record.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| &**name)
    }

    /// `(name, value)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (&**name, value))
    }

    /// Reads a named field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|position| &self.fields[position].1)
    }

    /// Reads a named field, reporting its absence as an error.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::MissingField`] when the field does not exist.
    pub fn require(&self, name: &str) -> OpticResult<&Value> {
        self.field(name)
            .ok_or_else(|| OpticError::missing_field(name, self.name()))
    }

    /// Mutable access to a named field, copying the field storage first if
    /// it is shared with another record.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        let position = self.position(name)?;
        Some(&mut Arc::make_mut(&mut self.fields)[position].1)
    }

    /// Mutable access to a named field, reporting its absence as an error.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::MissingField`] when the field does not exist.
    pub fn require_mut(&mut self, name: &str) -> OpticResult<&mut Value> {
        let position = self
            .position(name)
            .ok_or_else(|| OpticError::missing_field(name, self.name()))?;
        Ok(&mut Arc::make_mut(&mut self.fields)[position].1)
    }

    /// Rebuilds the record with the named field replaced.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::MissingField`] when the field does not exist.
    pub fn with_field(mut self, name: &str, value: Value) -> OpticResult<Self> {
        *self.require_mut(name)? = value;
        Ok(self)
    }

    /// Rebuilds the record with a field added at the end, or overwritten in
    /// place when it already exists.
    pub fn with_new_field(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.field_mut(&name) {
            Some(slot) => *slot = value,
            None => Arc::make_mut(&mut self.fields).push((name, value)),
        }
        self
    }

    /// Rebuilds the record without the named field.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::MissingField`] when the field does not exist.
    pub fn without_field(mut self, name: &str) -> OpticResult<Self> {
        let position = self
            .position(name)
            .ok_or_else(|| OpticError::missing_field(name, self.name()))?;
        Arc::make_mut(&mut self.fields).remove(position);
        Ok(self)
    }

    /// Rebuilds the record with every field mapped through `function`, in
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `function`.
    pub fn map_fields<F>(mut self, mut function: F) -> OpticResult<Self>
    where
        F: FnMut(Value) -> OpticResult<Value>,
    {
        for (_, value) in Arc::make_mut(&mut self.fields).iter_mut() {
            *value = function(std::mem::take(value))?;
        }
        Ok(self)
    }

    /// Mutable access to every field value, in declaration order.
    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        Arc::make_mut(&mut self.fields)
            .iter_mut()
            .map(|(_, value)| value)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(field, _)| &**field == name)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {{", self.name)?;
        for (position, (name, value)) in self.fields().enumerate() {
            let separator = if position == 0 { " " } else { ", " };
            write!(formatter, "{separator}{name}: {value}")?;
        }
        if self.is_empty() {
            formatter.write_str("}")
        } else {
            formatter.write_str(" }")
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

/// Incremental construction of a [`Record`].
#[derive(Clone, Debug)]
pub struct RecordBuilder {
    name: Arc<str>,
    fields: Fields,
}

impl RecordBuilder {
    /// Appends a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Finishes the record.
    pub fn build(self) -> Record {
        Record::from_fields(self.name, self.fields)
    }
}
