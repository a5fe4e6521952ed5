//! Optics built from closures.

use std::fmt;

use super::access::{FocusedAccess, Mapper, TraversalAccess};
use crate::error::OpticResult;
use crate::value::Value;

/// A single-focus optic from a getter and a setter.
///
/// The setter receives the source and the new focus value, and returns the
/// rebuilt source.
pub struct FunctionLens<G, S> {
    getter: G,
    setter: S,
}

impl<G, S> FunctionLens<G, S>
where
    G: Fn(&Value) -> OpticResult<Value>,
    S: Fn(Value, Value) -> OpticResult<Value>,
{
    /// Creates a lens from its two halves.
    pub const fn new(getter: G, setter: S) -> Self {
        Self { getter, setter }
    }
}

impl<G, S> fmt::Debug for FunctionLens<G, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("FunctionLens")
    }
}

impl<G, S> FocusedAccess for FunctionLens<G, S>
where
    G: Fn(&Value) -> OpticResult<Value> + Send + Sync,
    S: Fn(Value, Value) -> OpticResult<Value> + Send + Sync,
{
    fn read(&self, source: &Value) -> OpticResult<Value> {
        (self.getter)(source)
    }

    fn replace(&self, source: Value, value: Value) -> OpticResult<Value> {
        (self.setter)(source, value)
    }
}

/// A multi-focus optic defined by how it maps a function over its foci.
///
/// Reading is derived from mapping: the foci are whatever the closure hands
/// to the mapper, in the order it does so.
///
/// ```
/// use std::sync::Arc;
///
/// use optica::optics::Optic;
/// use optica::value::{Mapping, Value};
/// use optica::{OpticError, OpticResult};
///
/// // Every key of a map, as a string value.
/// let keys = Optic::modify_based(|source, function| {
///     let entries = match source {
///         Value::Map(entries) => entries,
///         other => return Err(OpticError::structural("map", other.kind())),
///     };
///     let mut renamed = Mapping::new();
///     for (key, value) in entries.iter() {
///         let key = function(Value::from(key.clone()))?;
///         let key = key.as_str().ok_or_else(|| OpticError::custom("keys must be strings"))?;
///         renamed.insert(key.into(), value.clone());
///     }
///     OpticResult::Ok(Value::Map(Arc::new(renamed)))
/// });
///
/// let source = Value::map([("a", 1), ("b", 2)]);
/// let shouted = keys
///     .modify(source, |key| Value::from(key.as_str().unwrap().to_uppercase()))
///     .unwrap();
/// assert_eq!(shouted, Value::map([("A", 1), ("B", 2)]));
/// ```
pub struct FunctionTraversal<M> {
    modify: M,
}

impl<M> FunctionTraversal<M>
where
    M: Fn(Value, &mut Mapper<'_>) -> OpticResult<Value>,
{
    /// Creates a traversal from its mapping function.
    pub const fn new(modify: M) -> Self {
        Self { modify }
    }
}

impl<M> fmt::Debug for FunctionTraversal<M> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("FunctionTraversal")
    }
}

impl<M> TraversalAccess for FunctionTraversal<M>
where
    M: Fn(Value, &mut Mapper<'_>) -> OpticResult<Value> + Send + Sync,
{
    fn apply_all(&self, source: Value, function: &mut Mapper<'_>) -> OpticResult<Value> {
        (self.modify)(source, function)
    }
}
