//! Positional and keyed element access.

use std::fmt;
use std::sync::Arc;

use super::access::{FocusedAccess, Mapper, MapperMut};
use crate::error::{OpticError, OpticResult};
use crate::value::{Key, Value, ValueKind};

/// Focuses one element of a sequence, tuple or map.
///
/// [`Key::Pos`] and [`Key::Last`] address sequences and tuples,
/// [`Key::Name`] addresses maps.
///
/// ```
/// use optica::optics::Optic;
/// use optica::value::Value;
///
/// let items = Value::seq([1, 2, 3]);
/// assert_eq!(Optic::last().get(&items).unwrap(), Value::Int(3));
///
/// let grown = Optic::index(1).insert(items, Value::Int(9)).unwrap();
/// assert_eq!(grown, Value::seq([1, 9, 2, 3]));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Index {
    key: Key,
}

impl Index {
    /// Creates an index optic.
    pub fn new(key: impl Into<Key>) -> Self {
        Self { key: key.into() }
    }

    /// Focuses the final element.
    pub const fn last() -> Self {
        Self { key: Key::Last }
    }

    /// The focused key.
    pub const fn key(&self) -> &Key {
        &self.key
    }

    /// Borrows the focus.
    ///
    /// # Errors
    ///
    /// Fails when the element does not exist or `source` is not indexable.
    pub fn peek<'a>(&self, source: &'a Value) -> OpticResult<&'a Value> {
        match (source, &self.key) {
            (Value::Seq(items) | Value::Tuple(items), key) => {
                let position = key.position(items.len(), source.kind())?;
                Ok(&items[position])
            }
            (Value::Map(entries), Key::Name(name)) => entries
                .get(name)
                .ok_or_else(|| OpticError::key_not_found(&**name)),
            (Value::Map(_), _) => Err(OpticError::structural("sequence", source.kind())),
            (other, _) => Err(OpticError::structural("indexable value", other.kind())),
        }
    }

    fn slot<'a>(&self, target: &'a mut Value) -> OpticResult<&'a mut Value> {
        let kind = target.kind();
        match (target, &self.key) {
            (Value::Seq(items) | Value::Tuple(items), key) => {
                let position = key.position(items.len(), kind)?;
                Ok(&mut Arc::make_mut(items)[position])
            }
            (Value::Map(entries), Key::Name(name)) => {
                if !entries.contains_key(name) {
                    return Err(OpticError::key_not_found(&**name));
                }
                Arc::make_mut(entries)
                    .get_mut(name)
                    .ok_or_else(|| OpticError::key_not_found(&**name))
            }
            (Value::Map(_), _) => Err(OpticError::structural("sequence", kind)),
            _ => Err(OpticError::structural("indexable value", kind)),
        }
    }

    fn reject_tuple(&self, operation: &'static str) -> OpticError {
        OpticError::unsupported(operation, format_args!("_{self}"))
    }
}

impl FocusedAccess for Index {
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

    /// Inserts before the addressed position (appending for [`Key::Last`]
    /// or a position equal to the length), or adds a map key, overwriting
    /// an existing entry.
    fn insert(&self, source: Value, value: Value) -> OpticResult<Value> {
        match (source, &self.key) {
            (Value::Seq(mut items), Key::Pos(index)) => {
                if *index > items.len() {
                    return Err(OpticError::IndexOutOfRange {
                        index: *index,
                        len: items.len(),
                    });
                }
                Arc::make_mut(&mut items).insert(*index, value);
                Ok(Value::Seq(items))
            }
            (Value::Seq(mut items), Key::Last) => {
                Arc::make_mut(&mut items).push(value);
                Ok(Value::Seq(items))
            }
            (Value::Map(mut entries), Key::Name(name)) => {
                Arc::make_mut(&mut entries).insert(name.clone(), value);
                Ok(Value::Map(entries))
            }
            (Value::Tuple(_), _) => Err(self.reject_tuple("insert")),
            (Value::Seq(_), Key::Name(_)) => Err(OpticError::structural("map", ValueKind::Seq)),
            (other, _) => Err(OpticError::structural("sequence or map", other.kind())),
        }
    }

    fn delete(&self, source: Value) -> OpticResult<Value> {
        match (source, &self.key) {
            (Value::Seq(mut items), key) => {
                let position = key.position(items.len(), ValueKind::Seq)?;
                Arc::make_mut(&mut items).remove(position);
                Ok(Value::Seq(items))
            }
            (Value::Map(mut entries), Key::Name(name)) => {
                if !entries.contains_key(name) {
                    return Err(OpticError::key_not_found(&**name));
                }
                Arc::make_mut(&mut entries).remove(name);
                Ok(Value::Map(entries))
            }
            (Value::Tuple(_), _) => Err(self.reject_tuple("delete")),
            (other, _) => Err(OpticError::structural("sequence or map", other.kind())),
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[{}]", self.key)
    }
}
