//! The optic value model and its dispatch onto the capability contracts.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use static_assertions::assert_impl_all;

use super::access::{FocusedAccess, Mapper, MapperMut, Style, TraversalAccess};
use super::compose::{Composed, compose};
use super::elements::{Elements, Properties};
use super::field::Field;
use super::filtered::{Filter, If, Predicate};
use super::function::{FunctionLens, FunctionTraversal};
use super::index::Index;
use super::recursive::Recursive;
use crate::error::{OpticError, OpticResult};
use crate::value::{Key, Value};

/// A composable accessor over [`Value`]s.
///
/// An optic is an immutable descriptor: it holds no reference to any value
/// and evaluating it never changes it, so optics can be cloned, shared
/// across threads and composed freely.
///
/// # Example
///
/// ```
/// use optica::optics::Optic;
/// use optica::value::{Record, Value};
///
/// let data = Value::from(
///     Record::builder("Data")
///         .field("a", Value::seq([1, 2, 3]))
///         .build(),
/// );
///
/// let first = Optic::field("a").then(Optic::index(0));
/// assert_eq!(first.get(&data).unwrap(), Value::Int(1));
///
/// let updated = first.set(data, Value::Int(10)).unwrap();
/// assert_eq!(first.get(&updated).unwrap(), Value::Int(10));
/// ```
#[derive(Clone, Debug, Default)]
pub enum Optic {
    /// The whole value.
    #[default]
    Identity,
    /// A named record field.
    Field(Field),
    /// An element of a sequence, tuple or map.
    Index(Index),
    /// Every element of a sequence, tuple or map.
    Elements,
    /// Every field of a record.
    Properties,
    /// The value itself, when a predicate holds.
    If(If),
    /// The sub-collection of elements satisfying a predicate.
    Filter(Filter),
    /// Repeated application of an inner optic.
    Recursive(Recursive),
    /// Two optics applied one after the other.
    Composed(Composed),
    /// An externally supplied single-focus primitive.
    Focused(Arc<dyn FocusedAccess>),
    /// An externally supplied multi-focus primitive.
    Traversal(Arc<dyn TraversalAccess>),
}

assert_impl_all!(Optic: Send, Sync, Clone);

impl Optic {
    /// The neutral element of composition.
    pub const fn identity() -> Self {
        Self::Identity
    }

    /// Focuses the record field `name`.
    pub fn field(name: impl Into<Arc<str>>) -> Self {
        Self::Field(Field::new(name))
    }

    /// Focuses the element at `key`: a position, [`Key::Last`] or a map key.
    pub fn index(key: impl Into<Key>) -> Self {
        Self::Index(Index::new(key))
    }

    /// Focuses the final element of a sequence or tuple.
    pub const fn last() -> Self {
        Self::Index(Index::last())
    }

    /// Focuses every element of a sequence, tuple or map.
    pub const fn elements() -> Self {
        Self::Elements
    }

    /// Focuses every field of a record.
    pub const fn properties() -> Self {
        Self::Properties
    }

    /// Focuses the value itself when `predicate` holds, and nothing otherwise.
    pub fn when(predicate: impl Into<Predicate>) -> Self {
        Self::If(If::new(predicate))
    }

    /// Focuses the sub-collection of elements satisfying `predicate`.
    pub fn filter(predicate: impl Into<Predicate>) -> Self {
        Self::Filter(Filter::new(predicate))
    }

    /// Applies `inner` and keeps descending into every focus satisfying
    /// `descend`.
    pub fn recursive(descend: impl Into<Predicate>, inner: Self) -> Self {
        Self::Recursive(Recursive::new(descend, inner))
    }

    /// Wraps an external single-focus primitive.
    pub fn focused(primitive: impl FocusedAccess + 'static) -> Self {
        Self::Focused(Arc::new(primitive))
    }

    /// Wraps an external multi-focus primitive.
    pub fn traversal(primitive: impl TraversalAccess + 'static) -> Self {
        Self::Traversal(Arc::new(primitive))
    }

    /// A single-focus optic from a getter and a setter.
    ///
    /// ```
    /// use optica::optics::Optic;
    /// use optica::value::Value;
    ///
    /// // Views an integer as its decimal string.
    /// let decimal = Optic::lens(
    ///     |source| Ok(Value::from(source.to_string())),
    ///     |_, text| Ok(Value::Int(text.as_str().unwrap_or("0").parse().unwrap_or(0))),
    /// );
    /// assert_eq!(decimal.get(&Value::Int(42)).unwrap(), Value::from("42"));
    /// assert_eq!(decimal.set(Value::Int(1), Value::from("7")).unwrap(), Value::Int(7));
    /// ```
    pub fn lens<G, S>(getter: G, setter: S) -> Self
    where
        G: Fn(&Value) -> OpticResult<Value> + Send + Sync + 'static,
        S: Fn(Value, Value) -> OpticResult<Value> + Send + Sync + 'static,
    {
        Self::focused(FunctionLens::new(getter, setter))
    }

    /// A multi-focus optic from a function that maps every focus.
    pub fn modify_based<M>(modify: M) -> Self
    where
        M: Fn(Value, &mut Mapper<'_>) -> OpticResult<Value> + Send + Sync + 'static,
    {
        Self::traversal(FunctionTraversal::new(modify))
    }

    /// Composes `self` (outer) with `inner`. See [`compose`].
    #[must_use]
    pub fn then(self, inner: Self) -> Self {
        compose(self, inner)
    }

    /// The capability of this optic, computed from its shape alone.
    pub const fn style(&self) -> Style {
        match self {
            Self::Identity | Self::Field(_) | Self::Index(_) | Self::Focused(_) => Style::Focused,
            Self::Composed(composed) => composed.style(),
            Self::Elements
            | Self::Properties
            | Self::If(_)
            | Self::Filter(_)
            | Self::Recursive(_)
            | Self::Traversal(_) => Style::Traversal,
        }
    }

    /// The primitives of this optic, outermost first.
    pub fn primitives(&self) -> SmallVec<[&Self; 8]> {
        let mut primitives = SmallVec::new();
        self.collect_primitives(&mut primitives);
        primitives
    }

    fn collect_primitives<'a>(&'a self, primitives: &mut SmallVec<[&'a Self; 8]>) {
        match self {
            Self::Composed(composed) => {
                composed.outer().collect_primitives(primitives);
                composed.inner().collect_primitives(primitives);
            }
            primitive => primitives.push(primitive),
        }
    }

    pub(crate) fn require_focused(&self, operation: &'static str) -> OpticResult<()> {
        if self.style().is_focused() {
            Ok(())
        } else {
            Err(OpticError::unsupported(operation, self))
        }
    }

    /// Reads the single focus.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] for traversal-style
    /// optics, and the primitive's error when the focus is absent.
    pub fn read(&self, source: &Value) -> OpticResult<Value> {
        self.require_focused("read")?;
        match self {
            Self::Identity => Ok(source.clone()),
            Self::Field(field) => field.read(source),
            Self::Index(index) => index.read(source),
            Self::Focused(primitive) => primitive.read(source),
            Self::Composed(composed) => {
                let middle = composed.outer().read(source)?;
                composed.inner().read(&middle)
            }
            _ => Err(OpticError::unsupported("read", self)),
        }
    }

    /// Rebuilds `source` with the single focus replaced by `value`.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] for traversal-style
    /// optics, and the primitive's error when the focus is absent.
    pub fn replace(&self, source: Value, value: Value) -> OpticResult<Value> {
        self.require_focused("replace")?;
        match self {
            Self::Identity => Ok(value),
            Self::Field(field) => field.replace(source, value),
            Self::Index(index) => index.replace(source, value),
            Self::Focused(primitive) => primitive.replace(source, value),
            Self::Composed(composed) => {
                let inner = composed.inner();
                let mut value = Some(value);
                composed.outer().update(source, &mut |middle| match value.take() {
                    Some(value) => inner.replace(middle, value),
                    None => Ok(middle),
                })
            }
            _ => Err(OpticError::unsupported("replace", self)),
        }
    }

    /// Rebuilds `source` with the single focus mapped through `function`.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] for traversal-style
    /// optics, otherwise propagates structural errors and errors from
    /// `function`.
    pub fn update(&self, source: Value, function: &mut Mapper<'_>) -> OpticResult<Value> {
        self.require_focused("update")?;
        match self {
            Self::Identity => function(source),
            Self::Field(field) => field.update(source, function),
            Self::Index(index) => index.update(source, function),
            Self::Focused(primitive) => primitive.update(source, function),
            Self::Composed(composed) => {
                let inner = composed.inner();
                composed
                    .outer()
                    .update(source, &mut |middle| inner.update(middle, &mut *function))
            }
            _ => Err(OpticError::unsupported("update", self)),
        }
    }

    /// Rebuilds `source` with every focus mapped through `function`, in
    /// traversal order. Legal for every style.
    ///
    /// # Errors
    ///
    /// Propagates structural errors and errors from `function`.
    pub fn apply_all(&self, source: Value, function: &mut Mapper<'_>) -> OpticResult<Value> {
        match self {
            Self::Identity | Self::Field(_) | Self::Index(_) | Self::Focused(_) => {
                self.update(source, function)
            }
            Self::Elements => Elements.apply_all(source, function),
            Self::Properties => Properties.apply_all(source, function),
            Self::If(when) => when.apply_all(source, function),
            Self::Filter(filter) => filter.apply_all(source, function),
            Self::Recursive(recursive) => recursive.apply_all(source, function),
            Self::Traversal(primitive) => primitive.apply_all(source, function),
            Self::Composed(composed) => {
                let inner = composed.inner();
                composed
                    .outer()
                    .apply_all(source, &mut |middle| inner.apply_all(middle, &mut *function))
            }
        }
    }

    /// Visits every focus of `source` in traversal order.
    ///
    /// # Errors
    ///
    /// Propagates structural errors and errors from `visit`.
    pub fn for_each(
        &self,
        source: &Value,
        visit: &mut dyn FnMut(&Value) -> OpticResult<()>,
    ) -> OpticResult<()> {
        match self {
            Self::Identity => visit(source),
            Self::Field(field) => visit(field.peek(source)?),
            Self::Index(index) => visit(index.peek(source)?),
            Self::Focused(primitive) => visit(&primitive.read(source)?),
            Self::Elements => Elements.for_each(source, visit),
            Self::Properties => Properties.for_each(source, visit),
            Self::If(when) => when.for_each(source, visit),
            Self::Filter(filter) => filter.for_each(source, visit),
            Self::Recursive(recursive) => recursive.for_each(source, visit),
            Self::Traversal(primitive) => primitive.for_each(source, visit),
            Self::Composed(composed) => {
                let inner = composed.inner();
                composed
                    .outer()
                    .for_each(source, &mut |middle| inner.for_each(middle, &mut *visit))
            }
        }
    }

    /// Mutates every focus of `target` in place, in traversal order.
    ///
    /// Storage that is uniquely owned is updated without copying. If an
    /// error occurs, foci visited before it may already be updated.
    ///
    /// # Errors
    ///
    /// Propagates structural errors and errors from `function`.
    pub fn apply_mut(&self, target: &mut Value, function: &mut MapperMut<'_>) -> OpticResult<()> {
        match self {
            Self::Identity => function(target),
            Self::Field(field) => field.focus_mut(target, function),
            Self::Index(index) => index.focus_mut(target, function),
            Self::Focused(primitive) => primitive.focus_mut(target, function),
            Self::Elements => Elements.apply_mut(target, function),
            Self::Properties => Properties.apply_mut(target, function),
            Self::If(when) => when.apply_mut(target, function),
            Self::Filter(filter) => filter.apply_mut(target, function),
            Self::Recursive(recursive) => recursive.apply_mut(target, function),
            Self::Traversal(primitive) => primitive.apply_mut(target, function),
            Self::Composed(composed) => {
                let inner = composed.inner();
                composed
                    .outer()
                    .apply_mut(target, &mut |middle| inner.apply_mut(middle, &mut *function))
            }
        }
    }

    /// Adds a focus that does not exist yet, changing the shape of `source`.
    ///
    /// Through `Filter ∘ Index` the position is resolved against the
    /// filtered view and the value lands in the source container.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] when the final primitive
    /// cannot change shape, or is an extension primitive behind a filter.
    pub fn insert_into(&self, source: Value, value: Value) -> OpticResult<Value> {
        match self {
            Self::Field(field) => field.insert(source, value),
            Self::Index(index) => index.insert(source, value),
            Self::Focused(primitive) => primitive.insert(source, value),
            Self::Traversal(primitive) => primitive.insert(source, value),
            Self::Composed(composed) => match (composed.outer(), composed.inner()) {
                (Self::Filter(filter), Self::Index(index)) => {
                    filter.insert_at(source, index.key(), value)
                }
                (Self::Filter(_), Self::Focused(_) | Self::Traversal(_)) => {
                    Err(OpticError::unsupported("insert", self))
                }
                (outer, inner) => {
                    outer.apply_all(source, &mut |middle| inner.insert_into(middle, value.clone()))
                }
            },
            _ => Err(OpticError::unsupported("insert", self)),
        }
    }

    /// Removes the focus, changing the shape of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] when the final primitive
    /// cannot change shape, or is an extension primitive behind a filter.
    pub fn delete_from(&self, source: Value) -> OpticResult<Value> {
        match self {
            Self::Field(field) => field.delete(source),
            Self::Index(index) => index.delete(source),
            Self::Focused(primitive) => primitive.delete(source),
            Self::Traversal(primitive) => primitive.delete(source),
            Self::Composed(composed) => match (composed.outer(), composed.inner()) {
                (Self::Filter(filter), Self::Index(index)) => filter.delete_at(source, index.key()),
                (Self::Filter(_), Self::Focused(_) | Self::Traversal(_)) => {
                    Err(OpticError::unsupported("delete", self))
                }
                (outer, inner) => outer.apply_all(source, &mut |middle| inner.delete_from(middle)),
            },
            _ => Err(OpticError::unsupported("delete", self)),
        }
    }
}

impl PartialEq for Optic {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Identity, Self::Identity)
            | (Self::Elements, Self::Elements)
            | (Self::Properties, Self::Properties) => true,
            (Self::Field(left), Self::Field(right)) => left == right,
            (Self::Index(left), Self::Index(right)) => left == right,
            (Self::If(left), Self::If(right)) => left == right,
            (Self::Filter(left), Self::Filter(right)) => left == right,
            (Self::Recursive(left), Self::Recursive(right)) => left == right,
            (Self::Composed(left), Self::Composed(right)) => left == right,
            (Self::Focused(left), Self::Focused(right)) => {
                std::ptr::addr_eq(Arc::as_ptr(left), Arc::as_ptr(right))
            }
            (Self::Traversal(left), Self::Traversal(right)) => {
                std::ptr::addr_eq(Arc::as_ptr(left), Arc::as_ptr(right))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Optic {
    /// Renders a path-like description, e.g. `_.atoms |> Elements() |> _.pos.x`.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut in_path = false;
        let mut first = true;
        for primitive in self.primitives() {
            let is_path = matches!(primitive, Self::Field(_) | Self::Index(_));
            if !(is_path && in_path) && !first {
                formatter.write_str(" |> ")?;
            }
            if is_path && !in_path {
                formatter.write_str("_")?;
            }
            match primitive {
                Self::Identity => formatter.write_str("_")?,
                Self::Field(field) => write!(formatter, "{field}")?,
                Self::Index(index) => write!(formatter, "{index}")?,
                Self::Elements => formatter.write_str("Elements()")?,
                Self::Properties => formatter.write_str("Properties()")?,
                Self::If(when) => write!(formatter, "{when}")?,
                Self::Filter(filter) => write!(formatter, "{filter}")?,
                Self::Recursive(recursive) => write!(formatter, "{recursive}")?,
                Self::Focused(primitive) => write!(formatter, "{primitive:?}")?,
                Self::Traversal(primitive) => write!(formatter, "{primitive:?}")?,
                Self::Composed(_) => {}
            }
            in_path = is_path;
            first = false;
        }
        Ok(())
    }
}

impl From<Field> for Optic {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<Index> for Optic {
    fn from(index: Index) -> Self {
        Self::Index(index)
    }
}

impl From<If> for Optic {
    fn from(when: If) -> Self {
        Self::If(when)
    }
}

impl From<Filter> for Optic {
    fn from(filter: Filter) -> Self {
        Self::Filter(filter)
    }
}

impl From<Recursive> for Optic {
    fn from(recursive: Recursive) -> Self {
        Self::Recursive(recursive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;
    use rstest::rstest;

    fn point() -> Value {
        Value::from(Record::builder("Point").field("x", 0).field("y", 1).build())
    }

    #[rstest]
    #[case(Optic::identity(), Style::Focused)]
    #[case(Optic::field("a"), Style::Focused)]
    #[case(Optic::index(0), Style::Focused)]
    #[case(Optic::elements(), Style::Traversal)]
    #[case(Optic::properties(), Style::Traversal)]
    #[case(Optic::field("a").then(Optic::index(1)), Style::Focused)]
    #[case(Optic::field("a").then(Optic::elements()), Style::Traversal)]
    #[case(Optic::elements().then(Optic::field("a")), Style::Traversal)]
    fn style_follows_shape(#[case] optic: Optic, #[case] expected: Style) {
        assert_eq!(optic.style(), expected);
    }

    #[test]
    fn read_is_rejected_on_traversals() {
        let error = Optic::elements().read(&Value::seq([1])).unwrap_err();
        assert_eq!(
            error,
            OpticError::UnsupportedOperation {
                operation: "read",
                optic: "Elements()".to_string(),
            }
        );
    }

    #[test]
    fn field_equality_is_structural() {
        assert_eq!(Optic::field("a"), Optic::field("a"));
        assert_ne!(Optic::field("a"), Optic::field("b"));
        assert_ne!(Optic::field("a"), Optic::index("a"));
    }

    #[test]
    fn external_primitives_compare_by_identity() {
        let lens = Optic::lens(|source| Ok(source.clone()), |_, value| Ok(value));
        let other = Optic::lens(|source| Ok(source.clone()), |_, value| Ok(value));
        assert_eq!(lens, lens.clone());
        assert_ne!(lens, other);
    }

    #[test]
    fn apply_all_on_a_focused_optic_has_one_focus() {
        let mut calls = 0;
        let moved = Optic::field("x")
            .apply_all(point(), &mut |x| {
                calls += 1;
                Ok(Value::Int(x.as_int().unwrap_or_default() + 1))
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(Optic::field("x").read(&moved).unwrap(), Value::Int(1));
    }

    #[test]
    fn apply_mut_updates_in_place() {
        let mut target = Value::seq([point(), point()]);
        Optic::elements()
            .then(Optic::field("y"))
            .apply_mut(&mut target, &mut |y| {
                *y = Value::Int(5);
                Ok(())
            })
            .unwrap();
        let ys: Vec<_> = target
            .as_slice()
            .unwrap()
            .iter()
            .map(|point| point.as_record().unwrap().field("y").cloned())
            .collect();
        assert_eq!(ys, vec![Some(Value::Int(5)), Some(Value::Int(5))]);
    }

    #[rstest]
    #[case(Optic::identity(), "_")]
    #[case(Optic::field("a"), "_.a")]
    #[case(Optic::field("a").then(Optic::index(1)), "_.a[1]")]
    #[case(Optic::field("a").then(Optic::last()), "_.a[end]")]
    #[case(
        Optic::field("atoms").then(Optic::elements()).then(Optic::field("pos")).then(Optic::field("x")),
        "_.atoms |> Elements() |> _.pos.x"
    )]
    #[case(Optic::elements().then(Optic::properties()), "Elements() |> Properties()")]
    fn display_renders_paths(#[case] optic: Optic, #[case] expected: &str) {
        assert_eq!(optic.to_string(), expected);
    }
}
