//! Derive macro for optica records.
//!
//! This crate provides `#[derive(Record)]`, which lets a host struct
//! round-trip through optica's [`Value`] model so that field and index
//! optics can address it.
//!
//! [`Value`]: https://docs.rs/optica/latest/optica/value/enum.Value.html
//!
//! # Example
//!
//! ```rust,ignore
//! use optica::{FromValue, Optic, Record, Value};
//!
//! #[derive(Clone, Debug, PartialEq, Record)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! let value = Value::from(Point { x: 0, y: 1 });
//! let moved = Optic::field("x").set(value, Value::Int(5)).unwrap();
//! assert_eq!(Point::from_value(moved).unwrap(), Point { x: 5, y: 1 });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod record;

use proc_macro::TokenStream;

/// Derive macro converting a struct to and from an optica `Value`.
///
/// # Generated Code
///
/// For a struct with named fields, generates:
///
/// ```rust,ignore
/// impl From<StructName> for optica::value::Value { ... }   // a record named "StructName"
/// impl optica::value::FromValue for StructName { ... }
/// ```
///
/// Record fields keep the declaration order of the struct. Tuple structs
/// convert to and from `Value::Tuple`.
///
/// # Requirements
///
/// - Every field type implements `Into<Value>` and `FromValue`
/// - Generic parameters receive both bounds automatically
/// - Enums, unions and unit structs are rejected
///
/// # Example
///
/// ```rust,ignore
/// use optica::{FromValue, Record, Value};
///
/// #[derive(Debug, PartialEq, Record)]
/// struct Pair<T>(T, T);
///
/// let value = Value::from(Pair(1_i64, 2));
/// assert_eq!(value, Value::tuple([1, 2]));
/// assert_eq!(Pair::<i64>::from_value(value).unwrap(), Pair(1, 2));
/// ```
#[proc_macro_derive(Record)]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record_impl(input)
}
