//! Bound parameter values.
//!
//! The renderer treats values as opaque: it moves them from the statement tree
//! into the parameter map and never looks inside.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A value bound to a generated parameter key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// SQL NULL
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned values, used for row counts such as limit and offset
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Date(NaiveDate),
    LocalDateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
    Array(Vec<ParamValue>),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
}

impl ParamValue {
    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Build an array value from any iterator of convertible items.
    pub fn array<T: Into<ParamValue>>(values: impl IntoIterator<Item = T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    f32 => Float,
    f64 => Float,
    String => Text,
    Vec<u8> => Bytes,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveDateTime => LocalDateTime,
    DateTime<Utc> => Timestamp,
    serde_json::Value => Json,
}

#[cfg(feature = "rust_decimal")]
impl_from! {
    rust_decimal::Decimal => Decimal,
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// `None` becomes `Null`, which INSERT and UPDATE bind as written. Conditions
/// reject a bound `Null` at validation; use `is_null()` or a `*_when_present`
/// condition instead.
impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_expected_variant() {
        assert_eq!(ParamValue::from(10u64), ParamValue::UInt(10));
        assert_eq!(ParamValue::from(-3i32), ParamValue::Int(-3));
        assert_eq!(ParamValue::from("x"), ParamValue::Text("x".into()));
        assert_eq!(ParamValue::from(None::<i64>), ParamValue::Null);
        assert_eq!(
            ParamValue::array([1i64, 2]),
            ParamValue::Array(vec![ParamValue::Int(1), ParamValue::Int(2)])
        );
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_value(vec![
            ParamValue::Int(1),
            ParamValue::Text("a".into()),
            ParamValue::Null,
        ])
        .unwrap();
        assert_eq!(json, serde_json::json!([1, "a", null]));
    }
}
