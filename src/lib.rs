//! # optica
//!
//! Composable optics for reading and non-destructively updating nested
//! immutable values.
//!
//! ## Overview
//!
//! An optic is a small, immutable description of *where* something lives
//! inside a value: a record field, an element of a sequence, every element
//! of a container, the elements satisfying a predicate. Optics compose, and
//! the bulk operations evaluate them against a concrete [`Value`]:
//!
//! - **Values**: [`Value`] trees of scalars, sequences, tuples, maps and
//!   records, with cheap clones and structural sharing.
//! - **Optics**: [`Optic`] and the [`FocusedAccess`] / [`TraversalAccess`]
//!   capability pair.
//! - **Composition**: [`compose`], [`compose_all`] and [`Optic::then`].
//! - **Bulk operations**: `get`, `set`, `modify`, `get_all`, `set_all`,
//!   `insert` and `delete`, as methods and as free functions.
//!
//! ## Feature Flags
//!
//! - `derive` (default): `#[derive(Record)]` for host structs
//! - `serde`: `Serialize` / `Deserialize` for [`Value`]
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use optica::prelude::*;
//!
//! let point = Value::from(Record::builder("Point").field("x", 0).field("y", 1).build());
//! let x = Optic::field("x");
//!
//! let moved = x.modify(point, |x| Value::Int(x.as_int().unwrap() + 1)).unwrap();
//! assert_eq!(x.get(&moved).unwrap(), Value::Int(1));
//! ```
//!
//! [`FocusedAccess`]: optics::FocusedAccess
//! [`TraversalAccess`]: optics::TraversalAccess

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use optica::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{OpticError, OpticResult};
    pub use crate::optics::{
        FocusedAccess, Optic, Predicate, Style, TraversalAccess, compose, compose_all,
    };
    pub use crate::value::{FromValue, Key, Record, Value, ValueKind};

    #[cfg(feature = "derive")]
    pub use optica_derive::Record;
}

pub mod error;
pub mod ops;
pub mod optics;
pub mod value;

pub use error::{OpticError, OpticResult};
pub use ops::{delete, get, get_all, insert, modify, set, set_all};
pub use optics::{Optic, compose, compose_all};
pub use value::{FromValue, Record, Value};

#[cfg(feature = "derive")]
pub use optica_derive::Record;
