//! Optics over [`Value`](crate::value::Value) trees.
//!
//! An [`Optic`] designates one or more parts (its *foci*) of a value and
//! knows how to read them and how to rebuild the value with them changed.
//! Every optic resolves to one of two capabilities ([`Style`]):
//!
//! - [`FocusedAccess`]: exactly one focus, read and replaced directly.
//! - [`TraversalAccess`]: zero or more foci, visited in a fixed order.
//!
//! # Standard optics
//!
//! | Constructor | Style | Focus |
//! |---|---|---|
//! | [`Optic::identity`] | focused | the whole value |
//! | [`Optic::field`] | focused | a named record field |
//! | [`Optic::index`] / [`Optic::last`] | focused | an element of a sequence, tuple or map |
//! | [`Optic::elements`] | traversal | every element of a container |
//! | [`Optic::properties`] | traversal | every field of a record |
//! | [`Optic::when`] | traversal | the value itself, when a predicate holds |
//! | [`Optic::filter`] | traversal | the sub-collection matching a predicate |
//! | [`Optic::recursive`] | traversal | leaves reached by repeated descent |
//!
//! # Example
//!
//! ```
//! use optica::optics::Optic;
//! use optica::value::{Record, Value};
//!
//! let atom = |x: i64, y: i64| {
//!     let pos = Record::builder("Pos").field("x", x).field("y", y).build();
//!     Value::from(Record::builder("Atom").field("pos", pos).build())
//! };
//! let molecule = Value::from(
//!     Record::builder("Molecule")
//!         .field("name", "water")
//!         .field("atoms", Value::seq([atom(0, 1), atom(0, 0), atom(1, 0)]))
//!         .build(),
//! );
//!
//! let xs = Optic::field("atoms")
//!     .then(Optic::elements())
//!     .then(Optic::field("pos"))
//!     .then(Optic::field("x"));
//!
//! let shifted = xs
//!     .modify(molecule, |x| Value::Int(x.as_int().unwrap() + 1))
//!     .unwrap();
//! assert!(shifted.to_string().contains("water"));
//! assert_eq!(xs.get_all(&shifted).unwrap(), [1, 1, 2].map(Value::Int).to_vec());
//! ```

mod access;
mod compose;
mod elements;
mod field;
mod filtered;
mod function;
mod index;
mod optic;
mod recursive;

pub use access::{AsTraversal, FocusedAccess, Mapper, MapperMut, Style, TraversalAccess};
pub use compose::{Composed, compose, compose_all};
pub use elements::{Elements, Properties};
pub use field::Field;
pub use filtered::{Filter, If, Predicate};
pub use function::{FunctionLens, FunctionTraversal};
pub use index::Index;
pub use optic::Optic;
pub use recursive::{DEFAULT_MAX_DEPTH, Recursive};
