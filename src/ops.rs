//! Bulk operations.
//!
//! Every operation is available both as a method on [`Optic`] and as a free
//! function taking the object first:
//!
//! ```
//! use optica::optics::Optic;
//! use optica::value::Value;
//!
//! let items = Value::seq([1, 2, 3]);
//! let second = Optic::index(1);
//!
//! assert_eq!(optica::get(&items, &second), second.get(&items));
//! assert_eq!(
//!     optica::set_all(items, &Optic::elements(), [7, 8, 9].map(Value::Int)).unwrap(),
//!     Value::seq([7, 8, 9]),
//! );
//! ```

use crate::error::{OpticError, OpticResult};
use crate::optics::Optic;
use crate::value::Value;

// =============================================================================
// Single focus
// =============================================================================

impl Optic {
    /// Reads the single focus.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] for traversal-style
    /// optics, and the primitive's error when the focus is absent.
    #[tracing::instrument(level = "trace", skip_all, fields(optic = %self))]
    pub fn get(&self, source: &Value) -> OpticResult<Value> {
        self.read(source)
    }

    /// Rebuilds `source` with the single focus set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] for traversal-style
    /// optics, and the primitive's error when the focus is absent.
    #[tracing::instrument(level = "trace", skip_all, fields(optic = %self))]
    pub fn set(&self, source: Value, value: Value) -> OpticResult<Value> {
        self.replace(source, value)
    }

    // =========================================================================
    // Any style
    // =========================================================================

    /// Rebuilds `source` with every focus mapped through `function`.
    ///
    /// For a focused optic this equals `set(source, function(get(source)))`.
    ///
    /// # Errors
    ///
    /// Propagates structural errors.
    pub fn modify<F>(&self, source: Value, mut function: F) -> OpticResult<Value>
    where
        F: FnMut(Value) -> Value,
    {
        self.try_modify(source, |focus| Ok(function(focus)))
    }

    /// Like [`modify`](Self::modify) with a fallible function. The first
    /// error stops the traversal.
    ///
    /// # Errors
    ///
    /// Propagates structural errors and errors from `function`.
    #[tracing::instrument(level = "trace", skip_all, fields(optic = %self))]
    pub fn try_modify<F>(&self, source: Value, mut function: F) -> OpticResult<Value>
    where
        F: FnMut(Value) -> OpticResult<Value>,
    {
        self.apply_all(source, &mut function)
    }

    /// Every focus, in traversal order. A focused optic yields exactly one.
    ///
    /// # Errors
    ///
    /// Propagates structural errors.
    #[tracing::instrument(level = "trace", skip_all, fields(optic = %self))]
    pub fn get_all(&self, source: &Value) -> OpticResult<Vec<Value>> {
        let mut foci = Vec::new();
        self.for_each(source, &mut |focus| {
            foci.push(focus.clone());
            Ok(())
        })?;
        Ok(foci)
    }

    /// The number of foci.
    ///
    /// # Errors
    ///
    /// Propagates structural errors.
    pub fn count(&self, source: &Value) -> OpticResult<usize> {
        let mut count = 0;
        self.for_each(source, &mut |_| {
            count += 1;
            Ok(())
        })?;
        Ok(count)
    }

    /// Rebuilds `source` with the foci replaced by `values`, consumed in the
    /// order [`get_all`](Self::get_all) enumerates them.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::ArityMismatch`] when the number of values
    /// differs from the number of foci; nothing is rebuilt in that case.
    #[tracing::instrument(level = "trace", skip_all, fields(optic = %self))]
    pub fn set_all(
        &self,
        source: Value,
        values: impl IntoIterator<Item = Value>,
    ) -> OpticResult<Value> {
        let values: Vec<Value> = values.into_iter().collect();
        let expected = self.count(&source)?;
        let found = values.len();
        if expected != found {
            tracing::debug!(expected, found, "set_all arity mismatch");
            return Err(OpticError::ArityMismatch { expected, found });
        }
        let mut values = values.into_iter();
        self.apply_all(source, &mut |_| {
            values
                .next()
                .ok_or(OpticError::ArityMismatch { expected, found })
        })
    }

    /// Rebuilds `source` with every focus replaced by `value`.
    ///
    /// # Errors
    ///
    /// Propagates structural errors.
    pub fn set_uniform(&self, source: Value, value: &Value) -> OpticResult<Value> {
        self.modify(source, |_| value.clone())
    }

    // =========================================================================
    // Shape changes
    // =========================================================================

    /// Rebuilds `source` with a new focus holding `value`.
    ///
    /// Supported when the last primitive of the optic is a [`Field`], an
    /// [`Index`] on a sequence or map, or an extension primitive that
    /// implements it.
    ///
    /// [`Field`]: crate::optics::Field
    /// [`Index`]: crate::optics::Index
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] when the optic cannot
    /// change shape.
    #[tracing::instrument(level = "trace", skip_all, fields(optic = %self))]
    pub fn insert(&self, source: Value, value: Value) -> OpticResult<Value> {
        self.insert_into(source, value)
    }

    /// Rebuilds `source` without the focus.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] when the optic cannot
    /// change shape, and the primitive's error when the focus is absent.
    #[tracing::instrument(level = "trace", skip_all, fields(optic = %self))]
    pub fn delete(&self, source: Value) -> OpticResult<Value> {
        self.delete_from(source)
    }

    // =========================================================================
    // In place
    // =========================================================================

    /// Mutates every focus of `target` in place.
    ///
    /// Storage uniquely owned by `target` is updated without copying. If
    /// the traversal fails, foci visited before the failure stay updated.
    ///
    /// # Errors
    ///
    /// Propagates structural errors.
    ///
    /// ```
    /// use optica::optics::Optic;
    /// use optica::value::Value;
    ///
    /// let mut items = Value::seq([1, 2, 3]);
    /// Optic::elements()
    ///     .modify_in_place(&mut items, |x| *x = Value::Int(x.as_int().unwrap() * 10))
    ///     .unwrap();
    /// assert_eq!(items, Value::seq([10, 20, 30]));
    /// ```
    pub fn modify_in_place<F>(&self, target: &mut Value, mut function: F) -> OpticResult<()>
    where
        F: FnMut(&mut Value),
    {
        self.apply_mut(target, &mut |focus| {
            function(focus);
            Ok(())
        })
    }

    /// Sets the single focus of `target` in place.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] for traversal-style
    /// optics, and the primitive's error when the focus is absent.
    pub fn set_in_place(&self, target: &mut Value, value: Value) -> OpticResult<()> {
        self.require_focused("set")?;
        let mut value = Some(value);
        self.apply_mut(target, &mut |focus| {
            if let Some(value) = value.take() {
                *focus = value;
            }
            Ok(())
        })
    }
}

// =============================================================================
// Free functions
// =============================================================================

/// Reads the single focus of `optic` in `source`. See [`Optic::get`].
///
/// # Errors
///
/// See [`Optic::get`].
pub fn get(source: &Value, optic: &Optic) -> OpticResult<Value> {
    optic.get(source)
}

/// Sets the single focus of `optic` in `source`. See [`Optic::set`].
///
/// # Errors
///
/// See [`Optic::set`].
pub fn set(source: Value, optic: &Optic, value: Value) -> OpticResult<Value> {
    optic.set(source, value)
}

/// Maps every focus of `optic` in `source`. See [`Optic::modify`].
///
/// # Errors
///
/// See [`Optic::modify`].
pub fn modify<F>(source: Value, optic: &Optic, function: F) -> OpticResult<Value>
where
    F: FnMut(Value) -> Value,
{
    optic.modify(source, function)
}

/// Every focus of `optic` in `source`. See [`Optic::get_all`].
///
/// # Errors
///
/// See [`Optic::get_all`].
pub fn get_all(source: &Value, optic: &Optic) -> OpticResult<Vec<Value>> {
    optic.get_all(source)
}

/// Replaces the foci of `optic` in `source`. See [`Optic::set_all`].
///
/// # Errors
///
/// See [`Optic::set_all`].
pub fn set_all(
    source: Value,
    optic: &Optic,
    values: impl IntoIterator<Item = Value>,
) -> OpticResult<Value> {
    optic.set_all(source, values)
}

/// Adds the focus of `optic` to `source`. See [`Optic::insert`].
///
/// # Errors
///
/// See [`Optic::insert`].
pub fn insert(source: Value, optic: &Optic, value: Value) -> OpticResult<Value> {
    optic.insert(source, value)
}

/// Removes the focus of `optic` from `source`. See [`Optic::delete`].
///
/// # Errors
///
/// See [`Optic::delete`].
pub fn delete(source: Value, optic: &Optic) -> OpticResult<Value> {
    optic.delete(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::Predicate;
    use crate::value::{Record, ValueKind};
    use rstest::rstest;

    fn increment(value: Value) -> Value {
        Value::Int(value.as_int().unwrap_or_default() + 1)
    }

    fn point(x: i64, y: i64) -> Value {
        Value::from(Record::builder("Point").field("x", x).field("y", y).build())
    }

    #[test]
    fn get_rejects_traversals() {
        assert!(matches!(
            Optic::elements().get(&Value::seq([1])),
            Err(OpticError::UnsupportedOperation { operation: "read", .. })
        ));
    }

    #[test]
    fn modify_on_a_focused_optic_is_get_then_set() {
        let optic = Optic::field("x");
        let source = point(1, 2);
        let expected = optic
            .set(source.clone(), increment(optic.get(&source).unwrap()))
            .unwrap();
        assert_eq!(optic.modify(source, increment), Ok(expected));
    }

    #[test]
    fn try_modify_stops_at_the_first_error() {
        let mut seen = Vec::new();
        let result = Optic::elements().try_modify(Value::seq([1, 2, 3]), |value| {
            seen.push(value.clone());
            Err(OpticError::custom("stop"))
        });
        assert_eq!(result, Err(OpticError::custom("stop")));
        assert_eq!(seen, vec![Value::Int(1)]);
    }

    #[rstest]
    #[case(Optic::field("x"), vec![Value::Int(1)])]
    #[case(Optic::properties(), vec![Value::Int(1), Value::Int(2)])]
    #[case(Optic::when(Predicate::is_kind(ValueKind::Seq)), vec![])]
    fn get_all_enumerates_foci(#[case] optic: Optic, #[case] expected: Vec<Value>) {
        assert_eq!(optic.get_all(&point(1, 2)), Ok(expected.clone()));
        assert_eq!(optic.count(&point(1, 2)), Ok(expected.len()));
    }

    #[test]
    fn set_all_replays_get_all() {
        let optic = Optic::elements().then(Optic::field("y"));
        let source = Value::seq([point(0, 1), point(0, 2)]);
        let foci = optic.get_all(&source).unwrap();
        assert_eq!(optic.set_all(source.clone(), foci), Ok(source));
    }

    #[rstest]
    #[case(vec![1, 2], 2)]
    #[case(vec![1, 2, 3, 4], 4)]
    fn set_all_rejects_wrong_arity(#[case] values: Vec<i64>, #[case] found: usize) {
        let result = Optic::elements().set_all(
            Value::seq([1, 2, 3]),
            values.into_iter().map(Value::Int),
        );
        assert_eq!(result, Err(OpticError::ArityMismatch { expected: 3, found }));
    }

    #[test]
    fn set_uniform_replaces_every_focus() {
        let zeroed = Optic::elements().set_uniform(Value::seq([1, 2, 3]), &Value::Int(0));
        assert_eq!(zeroed, Ok(Value::seq([0, 0, 0])));
    }

    #[test]
    fn insert_and_delete_through_a_path() {
        let path = Optic::field("tags").then(Optic::index("color"));
        let source = Value::from(
            Record::builder("Item")
                .field("tags", Value::map([("size", "L")]))
                .build(),
        );
        let tagged = path.insert(source.clone(), Value::from("red")).unwrap();
        assert_eq!(path.get(&tagged), Ok(Value::from("red")));
        assert_eq!(path.delete(tagged), Ok(source));
    }

    #[test]
    fn shape_changes_need_a_supporting_primitive() {
        assert!(matches!(
            Optic::elements().delete(Value::seq([1])),
            Err(OpticError::UnsupportedOperation { operation: "delete", .. })
        ));
    }

    #[test]
    fn set_in_place_requires_a_single_focus() {
        let mut target = Value::seq([1, 2]);
        assert!(Optic::elements().set_in_place(&mut target, Value::Null).is_err());
        Optic::index(0).set_in_place(&mut target, Value::Null).unwrap();
        assert_eq!(target, Value::seq([Value::Null, Value::Int(2)]));
    }

    #[test]
    fn free_functions_mirror_methods() {
        let optic = Optic::field("y");
        let source = point(1, 2);
        assert_eq!(get(&source, &optic), Ok(Value::Int(2)));
        assert_eq!(get_all(&source, &optic), Ok(vec![Value::Int(2)]));
        assert_eq!(
            modify(source.clone(), &optic, increment),
            set(source, &optic, Value::Int(3))
        );
    }
}
