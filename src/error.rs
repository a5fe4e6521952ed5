//! Errors produced while evaluating optics.
//!
//! Every evaluation either produces a new value or fails with an
//! [`OpticError`]. Because evaluation never mutates its input, a failure
//! leaves nothing to roll back: the caller still owns the original value.

use crate::value::ValueKind;

/// Result alias used throughout the crate.
pub type OpticResult<T> = Result<T, OpticError>;

/// The ways an optic evaluation can fail.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OpticError {
    /// A named field is absent from the record.
    #[error("missing field `{field}` on record `{record}`")]
    MissingField {
        /// The requested field.
        field: String,
        /// The type name of the record that lacks it.
        record: String,
    },

    /// A key is absent from the mapping.
    #[error("key `{key}` not found")]
    KeyNotFound {
        /// The requested key.
        key: String,
    },

    /// A position lies beyond the bounds of the sequence.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// The length of the container.
        len: usize,
    },

    /// `set_all` received a different number of values than there are foci.
    #[error("arity mismatch: expected {expected} values, found {found}")]
    ArityMismatch {
        /// Number of foci.
        expected: usize,
        /// Number of supplied values.
        found: usize,
    },

    /// The optic cannot perform the requested operation.
    #[error("unsupported operation `{operation}` on optic `{optic}`")]
    UnsupportedOperation {
        /// Name of the attempted operation.
        operation: &'static str,
        /// Rendering of the optic.
        optic: String,
    },

    /// The focused value has a different shape than the optic expects.
    #[error("structural type error: expected {expected}, found {found}")]
    StructuralTypeError {
        /// What the optic can handle.
        expected: &'static str,
        /// The kind of value it was given.
        found: ValueKind,
    },

    /// Recursive descent went deeper than its configured bound.
    #[error("recursive descent exceeded depth limit {limit}")]
    DepthExceeded {
        /// The configured bound.
        limit: usize,
    },

    /// A value could not be converted into a host type.
    #[error("cannot convert {found} into {target}")]
    Conversion {
        /// The requested host type.
        target: &'static str,
        /// The kind of value that was found.
        found: ValueKind,
    },

    /// An error raised by an extension optic or a fallible mapping function.
    #[error("{0}")]
    Custom(String),
}

impl OpticError {
    /// Creates a [`OpticError::MissingField`].
    pub fn missing_field(field: impl Into<String>, record: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            record: record.into(),
        }
    }

    /// Creates a [`OpticError::KeyNotFound`].
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Creates a [`OpticError::UnsupportedOperation`] describing `optic`.
    pub fn unsupported(operation: &'static str, optic: impl std::fmt::Display) -> Self {
        Self::UnsupportedOperation {
            operation,
            optic: optic.to_string(),
        }
    }

    /// Creates a [`OpticError::StructuralTypeError`].
    pub const fn structural(expected: &'static str, found: ValueKind) -> Self {
        Self::StructuralTypeError { expected, found }
    }

    /// Creates a [`OpticError::Custom`].
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}
