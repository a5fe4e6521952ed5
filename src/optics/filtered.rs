//! Predicate-driven optics.
//!
//! - [`If`]: the value itself when a predicate holds. Composed after
//!   [`Elements`](super::Elements) it exempts failing elements from the
//!   mapped function without removing them.
//! - [`Filter`]: the sub-collection of elements satisfying a predicate, as
//!   a single focus. Writing back fewer elements shrinks the container.
//!
//! # Examples
//!
//! ```
//! use optica::optics::{Optic, Predicate};
//! use optica::value::Value;
//!
//! let is_odd = Predicate::named("is_odd", |value: &Value| {
//!     value.as_int().is_some_and(|int| int % 2 != 0)
//! });
//! let increment = |value: Value| Value::Int(value.as_int().unwrap_or_default() + 1);
//! let data = Value::seq([2, 1, 3, 6, 9, 4, 8]);
//!
//! let odd_elements = Optic::elements().then(Optic::when(is_odd.clone()));
//! assert_eq!(
//!     odd_elements.modify(data.clone(), increment).unwrap(),
//!     Value::seq([2, 2, 4, 6, 10, 4, 8]),
//! );
//!
//! let last_odd = Optic::filter(is_odd).then(Optic::last());
//! assert_eq!(
//!     last_odd.modify(data, increment).unwrap(),
//!     Value::seq([2, 1, 3, 6, 10, 4, 8]),
//! );
//! ```

use std::fmt;
use std::ops::Not;
use std::sync::Arc;

use smallvec::SmallVec;

use super::access::{Mapper, MapperMut, TraversalAccess};
use crate::error::{OpticError, OpticResult};
use crate::value::{Key, Mapping, Value, ValueKind};

type Test = dyn Fn(&Value) -> bool + Send + Sync;

/// A shared, labelled test on values.
///
/// Predicates compare by identity: two predicates are equal only when they
/// share the same underlying closure.
#[derive(Clone)]
pub struct Predicate {
    label: Arc<str>,
    test: Arc<Test>,
}

impl Predicate {
    /// Wraps `test` with a generic label.
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::named("f", test)
    }

    /// Wraps `test` with a label used when rendering optics.
    pub fn named<F>(label: impl Into<Arc<str>>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// Holds for values of the given kind.
    ///
    /// ```
    /// use optica::optics::Predicate;
    /// use optica::value::{Value, ValueKind};
    ///
    /// let is_tuple = Predicate::is_kind(ValueKind::Tuple);
    /// assert!(is_tuple.test(&Value::tuple([1, 2])));
    /// assert!(!is_tuple.test(&Value::seq([1, 2])));
    /// ```
    pub fn is_kind(kind: ValueKind) -> Self {
        Self::named(format!("is_{kind}"), move |value| value.kind() == kind)
    }

    /// Holds for every value.
    pub fn always() -> Self {
        Self::named("always", |_| true)
    }

    /// Holds for no value.
    pub fn never() -> Self {
        Self::named("never", |_| false)
    }

    /// The rendering label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluates the predicate.
    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl<F> From<F> for Predicate
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    fn from(test: F) -> Self {
        Self::new(test)
    }
}

impl Not for Predicate {
    type Output = Self;

    fn not(self) -> Self {
        let label = format!("!{}", self.label);
        Self::named(label, move |value| !self.test(value))
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.test, &other.test)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("Predicate").field(&self.label).finish()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.label)
    }
}

/// Focuses the value itself when the predicate holds, and nothing
/// otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct If {
    predicate: Predicate,
}

impl If {
    /// Creates a conditional optic.
    pub fn new(predicate: impl Into<Predicate>) -> Self {
        Self {
            predicate: predicate.into(),
        }
    }

    /// The guarding predicate.
    pub const fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl TraversalAccess for If {
    fn apply_all(&self, source: Value, function: &mut Mapper<'_>) -> OpticResult<Value> {
        if self.predicate.test(&source) {
            function(source)
        } else {
            Ok(source)
        }
    }

    fn for_each(
        &self,
        source: &Value,
        visit: &mut dyn FnMut(&Value) -> OpticResult<()>,
    ) -> OpticResult<()> {
        if self.predicate.test(source) {
            visit(source)
        } else {
            Ok(())
        }
    }

    fn apply_mut(&self, target: &mut Value, function: &mut MapperMut<'_>) -> OpticResult<()> {
        if self.predicate.test(target) {
            function(target)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for If {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "If({})", self.predicate)
    }
}

/// Focuses the sub-collection of a sequence or map whose elements satisfy
/// the predicate, as one value.
///
/// The mapped sub-collection is written back into the matching positions:
///
/// - for sequences, returning fewer elements removes the trailing matches
///   and returning more fails with [`OpticError::ArityMismatch`];
/// - for maps, matching keys absent from the result are removed and keys
///   that were not matched fail with [`OpticError::KeyNotFound`].
///
/// Adjacent filters merge on composition, so `Filter(p) ∘ Filter(q)`
/// selects the elements satisfying both. Inserting or deleting through
/// `Filter ∘ Index` addresses the matched element in the source container.
///
/// ```
/// use optica::optics::Optic;
/// use optica::value::Value;
///
/// let small = Optic::filter(|value: &Value| value.as_int().is_some_and(|int| int < 3));
/// let trimmed = small
///     .modify(Value::seq([1, 5, 2, 7]), |_| Value::seq([0]))
///     .unwrap();
/// assert_eq!(trimmed, Value::seq([0, 5, 7]));
///
/// let second_small = small.then(Optic::index(1));
/// assert_eq!(
///     second_small.delete(Value::seq([1, 5, 2, 7])).unwrap(),
///     Value::seq([1, 5, 7]),
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    predicates: SmallVec<[Predicate; 2]>,
}

impl Filter {
    /// Creates a filtering optic.
    pub fn new(predicate: impl Into<Predicate>) -> Self {
        let mut predicates = SmallVec::new();
        predicates.push(predicate.into());
        Self { predicates }
    }

    /// The selecting predicates; an element matches when all of them hold.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// The filter selecting the elements that satisfy both `self` and
    /// `inner`.
    #[must_use]
    pub fn merge(mut self, inner: Self) -> Self {
        self.predicates.extend(inner.predicates);
        self
    }

    fn matches(&self, value: &Value) -> bool {
        self.predicates.iter().all(|predicate| predicate.test(value))
    }

    fn matched_positions(&self, items: &[Value]) -> SmallVec<[usize; 16]> {
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.matches(item))
            .map(|(position, _)| position)
            .collect()
    }

    fn select(&self, source: &Value) -> OpticResult<Value> {
        match source {
            Value::Seq(items) => Ok(Value::Seq(Arc::new(
                items
                    .iter()
                    .filter(|item| self.matches(item))
                    .cloned()
                    .collect(),
            ))),
            Value::Map(entries) => Ok(Value::Map(Arc::new(
                entries
                    .iter()
                    .filter(|(_, value)| self.matches(value))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ))),
            other => Err(OpticError::structural("sequence or map", other.kind())),
        }
    }

    fn write_back_items(&self, items: Arc<Vec<Value>>, selected: Value) -> OpticResult<Value> {
        let replacement = match selected {
            Value::Seq(replacement) => replacement,
            other => return Err(OpticError::structural("sequence", other.kind())),
        };
        let matched = self.matched_positions(&items);
        if replacement.len() > matched.len() {
            tracing::debug!(
                expected = matched.len(),
                found = replacement.len(),
                "filter write-back grew the selection"
            );
            return Err(OpticError::ArityMismatch {
                expected: matched.len(),
                found: replacement.len(),
            });
        }

        let mut replacement = Arc::unwrap_or_clone(replacement).into_iter();
        let mut matched = matched.into_iter().peekable();
        let mut rebuilt = Vec::with_capacity(items.len());
        for (position, item) in Arc::unwrap_or_clone(items).into_iter().enumerate() {
            if matched.next_if_eq(&position).is_some() {
                rebuilt.extend(replacement.next());
            } else {
                rebuilt.push(item);
            }
        }
        Ok(Value::Seq(Arc::new(rebuilt)))
    }

    fn write_back_entries(&self, mut entries: Arc<Mapping>, selected: Value) -> OpticResult<Value> {
        let replacement = match selected {
            Value::Map(replacement) => replacement,
            other => return Err(OpticError::structural("map", other.kind())),
        };
        let matched: Vec<_> = entries
            .iter()
            .filter(|(_, value)| self.matches(value))
            .map(|(key, _)| key.clone())
            .collect();
        if let Some(unknown) = replacement.keys().find(|key| !matched.contains(key)) {
            return Err(OpticError::key_not_found(&**unknown));
        }

        let mut replacement = Arc::unwrap_or_clone(replacement);
        let target = Arc::make_mut(&mut entries);
        for key in matched {
            match replacement.remove(&key) {
                Some(value) => target.insert(key, value),
                None => target.remove(&key),
            };
        }
        Ok(Value::Map(entries))
    }

    /// Inserts `value` at `key` of the filtered view, placing it in the
    /// source container.
    ///
    /// A position before the `n`th match lands before that match in the
    /// source; appending lands right after the last match, or at the end
    /// of the source when nothing matches. Map keys are added to the
    /// source map, overwriting an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::IndexOutOfRange`] for a position past the
    /// number of matches, and [`OpticError::StructuralTypeError`] when the
    /// key does not fit the container.
    pub fn insert_at(&self, source: Value, key: &Key, value: Value) -> OpticResult<Value> {
        match source {
            Value::Seq(mut items) => {
                let matched = self.matched_positions(&items);
                let position = match key {
                    Key::Pos(index) if *index < matched.len() => matched[*index],
                    Key::Pos(index) if *index > matched.len() => {
                        return Err(OpticError::IndexOutOfRange {
                            index: *index,
                            len: matched.len(),
                        });
                    }
                    Key::Pos(_) | Key::Last => {
                        matched.last().map_or(items.len(), |last| last + 1)
                    }
                    Key::Name(_) => return Err(OpticError::structural("map", ValueKind::Seq)),
                };
                tracing::trace!(position, "inserting through filter");
                Arc::make_mut(&mut items).insert(position, value);
                Ok(Value::Seq(items))
            }
            Value::Map(mut entries) => match key {
                Key::Name(name) => {
                    Arc::make_mut(&mut entries).insert(name.clone(), value);
                    Ok(Value::Map(entries))
                }
                Key::Pos(_) | Key::Last => {
                    Err(OpticError::structural("sequence", ValueKind::Map))
                }
            },
            other => Err(OpticError::structural("sequence or map", other.kind())),
        }
    }

    /// Deletes the element at `key` of the filtered view from the source
    /// container.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::IndexOutOfRange`] when the position exceeds
    /// the number of matches, [`OpticError::KeyNotFound`] for a map key
    /// that is absent or does not match, and
    /// [`OpticError::StructuralTypeError`] when the key does not fit the
    /// container.
    pub fn delete_at(&self, source: Value, key: &Key) -> OpticResult<Value> {
        match source {
            Value::Seq(mut items) => {
                let matched = self.matched_positions(&items);
                let position = matched[key.position(matched.len(), ValueKind::Seq)?];
                tracing::trace!(position, "deleting through filter");
                Arc::make_mut(&mut items).remove(position);
                Ok(Value::Seq(items))
            }
            Value::Map(mut entries) => match key {
                Key::Name(name) => {
                    if !entries.get(name).is_some_and(|value| self.matches(value)) {
                        return Err(OpticError::key_not_found(&**name));
                    }
                    Arc::make_mut(&mut entries).remove(name);
                    Ok(Value::Map(entries))
                }
                Key::Pos(_) | Key::Last => {
                    Err(OpticError::structural("sequence", ValueKind::Map))
                }
            },
            other => Err(OpticError::structural("sequence or map", other.kind())),
        }
    }
}

impl TraversalAccess for Filter {
    fn apply_all(&self, source: Value, function: &mut Mapper<'_>) -> OpticResult<Value> {
        let selected = function(self.select(&source)?)?;
        match source {
            Value::Seq(items) => self.write_back_items(items, selected),
            Value::Map(entries) => self.write_back_entries(entries, selected),
            other => Err(OpticError::structural("sequence or map", other.kind())),
        }
    }

    fn for_each(
        &self,
        source: &Value,
        visit: &mut dyn FnMut(&Value) -> OpticResult<()>,
    ) -> OpticResult<()> {
        visit(&self.select(source)?)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Filter(")?;
        for (position, predicate) in self.predicates.iter().enumerate() {
            if position > 0 {
                formatter.write_str(" && ")?;
            }
            write!(formatter, "{predicate}")?;
        }
        formatter.write_str(")")
    }
}
