//! Composition of optics.
//!
//! Composed optics are kept right-nested: `compose(compose(a, b), c)` is
//! stored as `a ∘ (b ∘ c)`. Evaluation always runs outer before inner and
//! left to right across foci, so the nesting is never observable.
//!
//! # Example
//!
//! ```
//! use optica::optics::{Optic, compose, compose_all};
//!
//! let left = compose(compose(Optic::field("a"), Optic::field("b")), Optic::field("c"));
//! let right = compose(Optic::field("a"), compose(Optic::field("b"), Optic::field("c")));
//! assert_eq!(left, right);
//!
//! let chained = compose_all([Optic::field("a"), Optic::field("b"), Optic::field("c")]);
//! assert_eq!(chained, right);
//! assert_eq!(chained.to_string(), "_.a.b.c");
//! ```

use std::sync::Arc;

use super::access::Style;
use super::optic::Optic;

/// An ordered pair `(outer, inner)` of optics.
#[derive(Clone, Debug, PartialEq)]
pub struct Composed {
    outer: Arc<Optic>,
    inner: Arc<Optic>,
    style: Style,
}

impl Composed {
    fn new(outer: Optic, inner: Optic) -> Self {
        let style = outer.style().join(inner.style());
        Self {
            outer: Arc::new(outer),
            inner: Arc::new(inner),
            style,
        }
    }

    /// The optic applied first.
    pub fn outer(&self) -> &Optic {
        &self.outer
    }

    /// The optic applied to the outer optic's foci.
    pub fn inner(&self) -> &Optic {
        &self.inner
    }

    /// The style resolved at composition time.
    pub const fn style(&self) -> Style {
        self.style
    }
}

/// Composes `outer` with `inner`: `inner` is applied to every focus of
/// `outer`.
///
/// Identity is dropped on either side, a composed `outer` is re-associated
/// to the right, and adjacent [`Filter`](super::Filter)s merge into one.
/// Composition never fails.
pub fn compose(outer: Optic, inner: Optic) -> Optic {
    match (outer, inner) {
        (Optic::Identity, optic) | (optic, Optic::Identity) => optic,
        (Optic::Composed(left), inner) => {
            tracing::trace!(style = %left.style(), "re-associating composed optic");
            let Composed { outer, inner: middle, .. } = left;
            let tail = compose(Arc::unwrap_or_clone(middle), inner);
            compose(Arc::unwrap_or_clone(outer), tail)
        }
        (Optic::Filter(outer), Optic::Filter(inner)) => {
            tracing::trace!(%outer, %inner, "merging adjacent filters");
            Optic::Filter(outer.merge(inner))
        }
        (Optic::Filter(outer), Optic::Composed(right))
            if matches!(right.outer(), Optic::Filter(_)) =>
        {
            let Composed { outer: head, inner: tail, .. } = right;
            let merged = compose(Optic::Filter(outer), Arc::unwrap_or_clone(head));
            compose(merged, Arc::unwrap_or_clone(tail))
        }
        (outer, inner) => Optic::Composed(Composed::new(outer, inner)),
    }
}

/// Composes any number of optics, outermost first. An empty sequence
/// yields [`Optic::Identity`].
pub fn compose_all(optics: impl IntoIterator<Item = Optic>) -> Optic {
    let optics: Vec<Optic> = optics.into_iter().collect();
    optics
        .into_iter()
        .rev()
        .fold(Optic::Identity, |inner, outer| compose(outer, inner))
}
