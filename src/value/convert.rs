//! Conversions between host types and [`Value`].

use std::collections::BTreeMap;
use std::sync::Arc;

use super::Value;
use crate::error::{OpticError, OpticResult};

/// Conversion from a [`Value`] back into a host type.
///
/// The inverse direction is plain [`From`]/[`Into`]. Together they let a
/// host type round-trip through the engine:
///
/// ```
/// use optica::value::{FromValue, Value};
///
/// let value = Value::from(vec![1_i64, 2, 3]);
/// let back: Vec<i64> = Vec::from_value(value).unwrap();
/// assert_eq!(back, vec![1, 2, 3]);
/// ```
pub trait FromValue: Sized {
    /// Converts the value.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::Conversion`] when the value has the wrong shape.
    fn from_value(value: Value) -> OpticResult<Self>;
}

fn mismatch<T>(target: &'static str, value: &Value) -> OpticResult<T> {
    Err(OpticError::Conversion {
        target,
        found: value.kind(),
    })
}

impl FromValue for Value {
    fn from_value(value: Value) -> OpticResult<Self> {
        Ok(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> OpticResult<Self> {
        value.as_bool().map_or_else(|| mismatch("bool", &value), Ok)
    }
}

macro_rules! integer_conversions {
    ($($integer:ty),* $(,)?) => {
        $(
            impl From<$integer> for Value {
                fn from(value: $integer) -> Self {
                    Self::Int(i64::from(value))
                }
            }

            impl FromValue for $integer {
                fn from_value(value: Value) -> OpticResult<Self> {
                    value
                        .as_int()
                        .and_then(|int| <$integer>::try_from(int).ok())
                        .map_or_else(|| mismatch(stringify!($integer), &value), Ok)
                }
            }
        )*
    };
}

integer_conversions!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> OpticResult<Self> {
        value.as_float().map_or_else(|| mismatch("f64", &value), Ok)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Self::Str(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> OpticResult<Self> {
        match value {
            Value::Str(text) => Ok(text.to_string()),
            other => mismatch("String", &other),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> OpticResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::seq(items)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> OpticResult<Self> {
        match value {
            Value::Seq(items) => Arc::unwrap_or_clone(items)
                .into_iter()
                .map(T::from_value)
                .collect(),
            other => mismatch("Vec", &other),
        }
    }
}

impl<K: Into<Arc<str>>, T: Into<Value>> From<BTreeMap<K, T>> for Value {
    fn from(entries: BTreeMap<K, T>) -> Self {
        Self::map(entries)
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> OpticResult<Self> {
        match value {
            Value::Map(entries) => Arc::unwrap_or_clone(entries)
                .into_iter()
                .map(|(key, item)| Ok((key.to_string(), T::from_value(item)?)))
                .collect(),
            other => mismatch("BTreeMap", &other),
        }
    }
}

macro_rules! tuple_conversions {
    ($(($($name:ident),+) => $len:expr;)*) => {
        $(
            impl<$($name: Into<Value>),+> From<($($name,)+)> for Value {
                #[allow(non_snake_case)]
                fn from(($($name,)+): ($($name,)+)) -> Self {
                    Self::Tuple(Arc::new(vec![$($name.into()),+]))
                }
            }

            impl<$($name: FromValue),+> FromValue for ($($name,)+) {
                fn from_value(value: Value) -> OpticResult<Self> {
                    match value {
                        Value::Tuple(items) if items.len() == $len => {
                            let mut items = Arc::unwrap_or_clone(items).into_iter();
                            Ok(($($name::from_value(items.next().unwrap_or_default())?,)+))
                        }
                        other => mismatch("tuple", &other),
                    }
                }
            }
        )*
    };
}

tuple_conversions! {
    (A, B) => 2;
    (A, B, C) => 3;
    (A, B, C, D) => 4;
}
