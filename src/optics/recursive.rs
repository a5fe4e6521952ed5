//! Bounded recursive descent.

use std::fmt;
use std::sync::Arc;

use super::access::{Mapper, MapperMut, TraversalAccess};
use super::filtered::Predicate;
use super::optic::Optic;
use crate::error::{OpticError, OpticResult};
use crate::value::Value;

/// The default bound on nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Applies an inner optic, then keeps applying it to every focus that
/// satisfies the descent predicate. Foci that fail the predicate are the
/// leaves handed to the mapped function.
///
/// The inner optic is always applied to the top-level value. Descent
/// deeper than [`max_depth`](Self::max_depth) fails with
/// [`OpticError::DepthExceeded`].
///
/// ```
/// use optica::optics::{Optic, Predicate};
/// use optica::value::{Value, ValueKind};
///
/// let leaves = Optic::recursive(Predicate::is_kind(ValueKind::Tuple), Optic::elements());
/// let nested = Value::tuple([
///     Value::Int(1),
///     Value::Int(2),
///     Value::tuple([Value::Int(3), Value::tuple([4, 5]), Value::Int(6)]),
/// ]);
///
/// let scaled = leaves
///     .modify(nested, |x| Value::Int(x.as_int().unwrap() * 100))
///     .unwrap();
/// assert_eq!(
///     leaves.get_all(&scaled).unwrap(),
///     [100, 200, 300, 400, 500, 600].map(Value::Int).to_vec(),
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Recursive {
    descend: Predicate,
    inner: Arc<Optic>,
    max_depth: usize,
}

impl Recursive {
    /// Creates a recursive optic bounded by [`DEFAULT_MAX_DEPTH`].
    pub fn new(descend: impl Into<Predicate>, inner: Optic) -> Self {
        Self {
            descend: descend.into(),
            inner: Arc::new(inner),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the bound on nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The bound on nesting depth.
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The optic applied at every level.
    pub fn inner(&self) -> &Optic {
        &self.inner
    }

    /// The descent predicate.
    pub const fn descend(&self) -> &Predicate {
        &self.descend
    }

    fn enter(&self, depth: usize) -> OpticResult<()> {
        if depth > self.max_depth {
            tracing::debug!(limit = self.max_depth, "recursive descent exceeded its depth limit");
            return Err(OpticError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn apply_at(&self, source: Value, function: &mut Mapper<'_>, depth: usize) -> OpticResult<Value> {
        self.enter(depth)?;
        self.inner.apply_all(source, &mut |focus| {
            if self.descend.test(&focus) {
                self.apply_at(focus, &mut *function, depth + 1)
            } else {
                function(focus)
            }
        })
    }

    fn for_each_at(
        &self,
        source: &Value,
        visit: &mut dyn FnMut(&Value) -> OpticResult<()>,
        depth: usize,
    ) -> OpticResult<()> {
        self.enter(depth)?;
        self.inner.for_each(source, &mut |focus| {
            if self.descend.test(focus) {
                self.for_each_at(focus, &mut *visit, depth + 1)
            } else {
                visit(focus)
            }
        })
    }

    fn apply_mut_at(
        &self,
        target: &mut Value,
        function: &mut MapperMut<'_>,
        depth: usize,
    ) -> OpticResult<()> {
        self.enter(depth)?;
        self.inner.apply_mut(target, &mut |focus| {
            if self.descend.test(focus) {
                self.apply_mut_at(focus, &mut *function, depth + 1)
            } else {
                function(focus)
            }
        })
    }
}

impl TraversalAccess for Recursive {
    fn apply_all(&self, source: Value, function: &mut Mapper<'_>) -> OpticResult<Value> {
        self.apply_at(source, function, 0)
    }

    fn for_each(
        &self,
        source: &Value,
        visit: &mut dyn FnMut(&Value) -> OpticResult<()>,
    ) -> OpticResult<()> {
        self.for_each_at(source, visit, 0)
    }

    fn apply_mut(&self, target: &mut Value, function: &mut MapperMut<'_>) -> OpticResult<()> {
        self.apply_mut_at(target, function, 0)
    }
}

impl PartialEq for Recursive {
    fn eq(&self, other: &Self) -> bool {
        self.descend == other.descend
            && self.inner == other.inner
            && self.max_depth == other.max_depth
    }
}

impl fmt::Display for Recursive {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Recursive({}, {})", self.descend, self.inner)
    }
}
