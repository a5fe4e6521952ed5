//! The immutable composite values optics operate on.
//!
//! A [`Value`] is a tree of scalars, sequences, tuples, mappings and
//! records. Composite payloads live behind [`Arc`], so cloning a value is
//! cheap and rebuilding one after an update shares every subtree that was
//! not touched.
//!
//! # Examples
//!
//! ```
//! use optica::value::{Record, Value};
//!
//! let point = Record::builder("Point").field("x", 0).field("y", 1).build();
//! let value = Value::from(point);
//!
//! assert_eq!(value.as_record().and_then(|record| record.field("y")), Some(&Value::Int(1)));
//! ```

mod convert;
mod record;
#[cfg(feature = "serde")]
mod serde;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use convert::FromValue;
pub use record::{Record, RecordBuilder};

use crate::error::{OpticError, OpticResult};

/// Keys of a [`Value::Map`].
pub type MapKey = Arc<str>;

/// A mapping from names to values, iterated in key order.
pub type Mapping = BTreeMap<MapKey, Value>;

/// An immutable composite value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// The absent value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(Arc<str>),
    /// A growable ordered sequence.
    Seq(Arc<Vec<Value>>),
    /// A fixed-size ordered tuple.
    Tuple(Arc<Vec<Value>>),
    /// A mapping from names to values.
    Map(Arc<Mapping>),
    /// A named record with ordered fields.
    Record(Record),
}

/// The variant of a [`Value`], used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Null`]
    Null,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Float`]
    Float,
    /// [`Value::Str`]
    Str,
    /// [`Value::Seq`]
    Seq,
    /// [`Value::Tuple`]
    Tuple,
    /// [`Value::Map`]
    Map,
    /// [`Value::Record`]
    Record,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
            Self::Seq => "sequence",
            Self::Tuple => "tuple",
            Self::Map => "map",
            Self::Record => "record",
        };
        formatter.write_str(name)
    }
}

impl Value {
    /// Builds a sequence from an iterator of convertible items.
    pub fn seq<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::Seq(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Builds a tuple from an iterator of convertible items.
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::Tuple(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Builds a mapping from `(key, value)` pairs.
    pub fn map<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<MapKey>,
        T: Into<Self>,
    {
        Self::Map(Arc::new(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ))
    }

    /// Returns the variant of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::Seq(_) => ValueKind::Seq,
            Self::Tuple(_) => ValueKind::Tuple,
            Self::Map(_) => ValueKind::Map,
            Self::Record(_) => ValueKind::Record,
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for sequences, tuples, mappings and records.
    pub const fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Seq(_) | Self::Tuple(_) | Self::Map(_) | Self::Record(_)
        )
    }

    /// Returns the integer payload, if any.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the numeric payload as a float, widening integers.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the boolean payload, if any.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(&**value),
            _ => None,
        }
    }

    /// Returns the items of a sequence or tuple.
    pub fn as_slice(&self) -> Option<&[Self]> {
        match self {
            Self::Seq(items) | Self::Tuple(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Returns the entries of a mapping.
    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Self::Map(entries) => Some(&**entries),
            _ => None,
        }
    }

    /// Returns the record payload, if any.
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Unwraps a record or reports the kind that was found instead.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::StructuralTypeError`] for every other variant.
    pub fn into_record(self) -> OpticResult<Record> {
        match self {
            Self::Record(record) => Ok(record),
            other => Err(OpticError::structural("record", other.kind())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(
            formatter: &mut fmt::Formatter<'_>,
            open: &str,
            close: &str,
            items: &[Value],
        ) -> fmt::Result {
            formatter.write_str(open)?;
            for (position, item) in items.iter().enumerate() {
                if position > 0 {
                    formatter.write_str(", ")?;
                }
                write!(formatter, "{item}")?;
            }
            formatter.write_str(close)
        }

        match self {
            Self::Null => formatter.write_str("null"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value:?}"),
            Self::Str(value) => write!(formatter, "{value:?}"),
            Self::Seq(items) => list(formatter, "[", "]", items),
            Self::Tuple(items) => list(formatter, "(", ")", items),
            Self::Map(entries) => {
                formatter.write_str("{")?;
                for (position, (key, value)) in entries.iter().enumerate() {
                    if position > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{key:?} => {value}")?;
                }
                formatter.write_str("}")
            }
            Self::Record(record) => write!(formatter, "{record}"),
        }
    }
}

/// Addresses one element of an ordered or keyed container.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A zero-based position in a sequence or tuple.
    Pos(usize),
    /// The final element of a sequence or tuple.
    Last,
    /// A key of a mapping.
    Name(MapKey),
}

impl Key {
    /// Resolves the key to a concrete position in a container of length `len`.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::IndexOutOfRange`] when the position does not
    /// exist, and [`OpticError::StructuralTypeError`] for [`Key::Name`].
    pub fn position(&self, len: usize, found: ValueKind) -> OpticResult<usize> {
        match self {
            Self::Pos(index) if *index < len => Ok(*index),
            Self::Pos(index) => Err(OpticError::IndexOutOfRange { index: *index, len }),
            Self::Last => len
                .checked_sub(1)
                .ok_or(OpticError::IndexOutOfRange { index: 0, len }),
            Self::Name(_) => Err(OpticError::structural("map", found)),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pos(index) => write!(formatter, "{index}"),
            Self::Last => formatter.write_str("end"),
            Self::Name(name) => write!(formatter, "{name:?}"),
        }
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Self::Pos(index)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::Name(name.into())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Name(name.into())
    }
}
