//! Traversals over every element of a container.

use std::sync::Arc;

use super::access::{Mapper, MapperMut, TraversalAccess};
use crate::error::{OpticError, OpticResult};
use crate::value::{Mapping, Value, ValueKind};

/// Every element of a sequence or tuple, or every value of a map in key
/// order. The rebuilt container has the same shape as the source.
///
/// ```
/// use optica::optics::Optic;
/// use optica::value::Value;
///
/// let doubled = Optic::elements()
///     .modify(Value::seq([1, 2, 3]), |x| Value::Int(x.as_int().unwrap() * 2))
///     .unwrap();
/// assert_eq!(doubled, Value::seq([2, 4, 6]));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Elements;

/// Every field of a record in declaration order, every slot of a tuple, or
/// every value of a map. Scalars have no properties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Properties;

fn map_items(
    mut items: Arc<Vec<Value>>,
    function: &mut Mapper<'_>,
) -> OpticResult<Arc<Vec<Value>>> {
    for item in Arc::make_mut(&mut items).iter_mut() {
        *item = function(std::mem::take(item))?;
    }
    Ok(items)
}

fn map_values(mut entries: Arc<Mapping>, function: &mut Mapper<'_>) -> OpticResult<Arc<Mapping>> {
    for value in Arc::make_mut(&mut entries).values_mut() {
        *value = function(std::mem::take(value))?;
    }
    Ok(entries)
}

fn visit_all<'a>(
    mut values: impl Iterator<Item = &'a Value>,
    visit: &mut dyn FnMut(&Value) -> OpticResult<()>,
) -> OpticResult<()> {
    values.try_for_each(visit)
}

fn mutate_all<'a>(
    mut values: impl Iterator<Item = &'a mut Value>,
    function: &mut MapperMut<'_>,
) -> OpticResult<()> {
    values.try_for_each(function)
}

impl TraversalAccess for Elements {
    fn apply_all(&self, source: Value, function: &mut Mapper<'_>) -> OpticResult<Value> {
        match source {
            Value::Seq(items) => map_items(items, function).map(Value::Seq),
            Value::Tuple(items) => map_items(items, function).map(Value::Tuple),
            Value::Map(entries) => map_values(entries, function).map(Value::Map),
            other => Err(OpticError::structural("collection", other.kind())),
        }
    }

    fn for_each(
        &self,
        source: &Value,
        visit: &mut dyn FnMut(&Value) -> OpticResult<()>,
    ) -> OpticResult<()> {
        match source {
            Value::Seq(items) | Value::Tuple(items) => visit_all(items.iter(), visit),
            Value::Map(entries) => visit_all(entries.values(), visit),
            other => Err(OpticError::structural("collection", other.kind())),
        }
    }

    fn apply_mut(&self, target: &mut Value, function: &mut MapperMut<'_>) -> OpticResult<()> {
        match target {
            Value::Seq(items) | Value::Tuple(items) => {
                mutate_all(Arc::make_mut(items).iter_mut(), function)
            }
            Value::Map(entries) => mutate_all(Arc::make_mut(entries).values_mut(), function),
            other => Err(OpticError::structural("collection", other.kind())),
        }
    }
}

impl TraversalAccess for Properties {
    fn apply_all(&self, source: Value, function: &mut Mapper<'_>) -> OpticResult<Value> {
        match source {
            Value::Record(record) => record.map_fields(function).map(Value::Record),
            Value::Tuple(items) => map_items(items, function).map(Value::Tuple),
            Value::Map(entries) => map_values(entries, function).map(Value::Map),
            Value::Seq(_) => Err(OpticError::structural("record", ValueKind::Seq)),
            scalar => Ok(scalar),
        }
    }

    fn for_each(
        &self,
        source: &Value,
        visit: &mut dyn FnMut(&Value) -> OpticResult<()>,
    ) -> OpticResult<()> {
        match source {
            Value::Record(record) => visit_all(record.fields().map(|(_, value)| value), visit),
            Value::Tuple(items) => visit_all(items.iter(), visit),
            Value::Map(entries) => visit_all(entries.values(), visit),
            Value::Seq(_) => Err(OpticError::structural("record", ValueKind::Seq)),
            _ => Ok(()),
        }
    }

    fn apply_mut(&self, target: &mut Value, function: &mut MapperMut<'_>) -> OpticResult<()> {
        match target {
            Value::Record(record) => mutate_all(record.values_mut(), function),
            Value::Tuple(items) => mutate_all(Arc::make_mut(items).iter_mut(), function),
            Value::Map(entries) => mutate_all(Arc::make_mut(entries).values_mut(), function),
            Value::Seq(_) => Err(OpticError::structural("record", ValueKind::Seq)),
            _ => Ok(()),
        }
    }
}
