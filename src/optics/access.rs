//! The two capability contracts every optic implements.
//!
//! - [`FocusedAccess`]: exactly one focus, read and replaced directly.
//! - [`TraversalAccess`]: zero or more foci, visited by mapping a function
//!   over them in a defined order.
//!
//! Every [`FocusedAccess`] is usable as a traversal through the provided
//! [`FocusedAccess::update`] bridge, and [`AsTraversal`] adapts one into a
//! [`TraversalAccess`] value.
//!
//! # Implementing a primitive
//!
//! ```
//! use optica::optics::{FocusedAccess, Optic};
//! use optica::value::Value;
//! use optica::OpticResult;
//!
//! /// Focuses the first element of a tuple.
//! #[derive(Debug)]
//! struct First;
//!
//! impl FocusedAccess for First {
//!     fn read(&self, source: &Value) -> OpticResult<Value> {
//!         Optic::index(0).get(source)
//!     }
//!
//!     fn replace(&self, source: Value, value: Value) -> OpticResult<Value> {
//!         Optic::index(0).set(source, value)
//!     }
//! }
//!
//! let first = Optic::focused(First);
//! let pair = Value::tuple([1, 2]);
//! assert_eq!(first.set(pair, Value::Int(9)).unwrap(), Value::tuple([9, 2]));
//! ```

use std::fmt;

use crate::error::{OpticError, OpticResult};
use crate::value::Value;

/// A fallible function applied to each focus.
pub type Mapper<'a> = dyn FnMut(Value) -> OpticResult<Value> + 'a;

/// A fallible function applied to each focus in place.
pub type MapperMut<'a> = dyn FnMut(&mut Value) -> OpticResult<()> + 'a;

/// The resolved capability of an optic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Style {
    /// Single focus: `get` and `set` are legal.
    Focused,
    /// Zero or more foci: only traversal operations are legal.
    Traversal,
}

impl Style {
    /// The style of `outer` composed with `inner`.
    ///
    /// ```
    /// use optica::optics::Style;
    ///
    /// assert_eq!(Style::Focused.join(Style::Focused), Style::Focused);
    /// assert_eq!(Style::Focused.join(Style::Traversal), Style::Traversal);
    /// assert_eq!(Style::Traversal.join(Style::Focused), Style::Traversal);
    /// ```
    #[must_use]
    pub const fn join(self, inner: Self) -> Self {
        match (self, inner) {
            (Self::Focused, Self::Focused) => Self::Focused,
            _ => Self::Traversal,
        }
    }

    /// Returns `true` for [`Style::Focused`].
    pub const fn is_focused(self) -> bool {
        matches!(self, Self::Focused)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Focused => formatter.write_str("FocusedAccess"),
            Self::Traversal => formatter.write_str("TraversalAccess"),
        }
    }
}

/// Single-focus access: read one value, replace one value.
///
/// # Laws
///
/// 1. **GetPut**: `read(&replace(s, v)) == v`
/// 2. **PutGet**: `replace(s, read(&s)) == s`
/// 3. **PutPut**: `replace(replace(s, v1), v2) == replace(s, v2)`
///
/// The engine does not check these; it only preserves them under
/// composition.
pub trait FocusedAccess: fmt::Debug + Send + Sync {
    /// Reads the focus.
    ///
    /// # Errors
    ///
    /// Fails when the focus does not exist in `source`.
    fn read(&self, source: &Value) -> OpticResult<Value>;

    /// Rebuilds `source` with the focus replaced by `value`.
    ///
    /// # Errors
    ///
    /// Fails when the focus does not exist in `source`.
    fn replace(&self, source: Value, value: Value) -> OpticResult<Value>;

    /// Rebuilds `source` with the focus mapped through `function`.
    ///
    /// This is the bridge to traversal semantics: a focused optic is a
    /// traversal with exactly one focus.
    ///
    /// # Errors
    ///
    /// Propagates errors from `read`, `function` and `replace`.
    fn update(&self, source: Value, function: &mut Mapper<'_>) -> OpticResult<Value> {
        let current = self.read(&source)?;
        let updated = function(current)?;
        self.replace(source, updated)
    }

    /// Mutates the focus of `target` in place.
    ///
    /// The default reads, maps and replaces on a clone, then assigns the
    /// result back, so `target` is untouched on failure.
    ///
    /// # Errors
    ///
    /// Propagates errors from `read`, `function` and `replace`.
    fn focus_mut(&self, target: &mut Value, function: &mut MapperMut<'_>) -> OpticResult<()> {
        let mut current = self.read(target)?;
        function(&mut current)?;
        *target = self.replace(target.clone(), current)?;
        Ok(())
    }

    /// Adds a focus that does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] unless overridden.
    fn insert(&self, source: Value, value: Value) -> OpticResult<Value> {
        let _ = (source, value);
        Err(OpticError::unsupported("insert", format_args!("{self:?}")))
    }

    /// Removes the focus.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] unless overridden.
    fn delete(&self, source: Value) -> OpticResult<Value> {
        let _ = source;
        Err(OpticError::unsupported("delete", format_args!("{self:?}")))
    }
}

/// Multi-focus access: map a function over every focus.
///
/// # Laws
///
/// 1. **Identity**: `apply_all(s, Ok) == s`
/// 2. **Composition**: `apply_all(apply_all(s, f), g) == apply_all(s, g ∘ f)`
///
/// Foci are visited in a fixed order, which [`Optic::get_all`] and
/// [`Optic::set_all`] rely on.
///
/// [`Optic::get_all`]: crate::optics::Optic::get_all
/// [`Optic::set_all`]: crate::optics::Optic::set_all
pub trait TraversalAccess: fmt::Debug + Send + Sync {
    /// Rebuilds `source` with every focus mapped through `function`.
    ///
    /// # Errors
    ///
    /// Propagates the first error, either structural or from `function`.
    fn apply_all(&self, source: Value, function: &mut Mapper<'_>) -> OpticResult<Value>;

    /// Visits every focus of `source` without rebuilding anything the
    /// caller keeps.
    ///
    /// # Errors
    ///
    /// Propagates the first error, either structural or from `visit`.
    fn for_each(
        &self,
        source: &Value,
        visit: &mut dyn FnMut(&Value) -> OpticResult<()>,
    ) -> OpticResult<()> {
        self.apply_all(source.clone(), &mut |focus| {
            visit(&focus)?;
            Ok(focus)
        })
        .map(drop)
    }

    /// Mutates every focus of `target` in place.
    ///
    /// The default rebuilds a clone and assigns it back, so `target` is
    /// untouched on failure.
    ///
    /// # Errors
    ///
    /// Propagates the first error, either structural or from `function`.
    fn apply_mut(&self, target: &mut Value, function: &mut MapperMut<'_>) -> OpticResult<()> {
        *target = self.apply_all(target.clone(), &mut |mut focus| {
            function(&mut focus)?;
            Ok(focus)
        })?;
        Ok(())
    }

    /// Adds foci that do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] unless overridden.
    fn insert(&self, source: Value, value: Value) -> OpticResult<Value> {
        let _ = (source, value);
        Err(OpticError::unsupported("insert", format_args!("{self:?}")))
    }

    /// Removes the foci.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] unless overridden.
    fn delete(&self, source: Value) -> OpticResult<Value> {
        let _ = source;
        Err(OpticError::unsupported("delete", format_args!("{self:?}")))
    }
}

/// Adapts a [`FocusedAccess`] into a [`TraversalAccess`] with one focus.
///
/// ```
/// use optica::optics::{AsTraversal, Field, TraversalAccess};
/// use optica::value::{Record, Value};
///
/// let traversal = AsTraversal::new(Field::new("x"));
/// let point = Value::from(Record::builder("Point").field("x", 1).build());
/// let moved = traversal.apply_all(point, &mut |x| Ok(Value::Int(x.as_int().unwrap() + 1))).unwrap();
/// assert_eq!(moved.as_record().unwrap().field("x"), Some(&Value::Int(2)));
/// ```
#[derive(Clone, Debug)]
pub struct AsTraversal<L> {
    lens: L,
}

impl<L> AsTraversal<L> {
    /// Wraps `lens`.
    pub const fn new(lens: L) -> Self {
        Self { lens }
    }

    /// Returns the wrapped lens.
    pub fn into_inner(self) -> L {
        self.lens
    }
}

impl<L: FocusedAccess> TraversalAccess for AsTraversal<L> {
    fn apply_all(&self, source: Value, function: &mut Mapper<'_>) -> OpticResult<Value> {
        self.lens.update(source, function)
    }

    fn apply_mut(&self, target: &mut Value, function: &mut MapperMut<'_>) -> OpticResult<()> {
        self.lens.focus_mut(target, function)
    }

    fn insert(&self, source: Value, value: Value) -> OpticResult<Value> {
        self.lens.insert(source, value)
    }

    fn delete(&self, source: Value) -> OpticResult<Value> {
        self.lens.delete(source)
    }
}
