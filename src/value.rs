//! Borrowed, dynamically typed views of a single field.
//!
//! Controls never hold on to a record. Each render reads exactly one field
//! through [`Controls::field`](crate::Controls::field), which hands back a
//! [`FieldValue`] borrowing from the record for the duration of the render.

use core::fmt;
use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
};

use crate::error::{BindError, Result};

/// The value of one field as seen by a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// The record has no such field, or the field is an empty `Option`.
    Absent,
    /// The field is present but explicitly null.
    Null,
    /// A boolean field.
    Bool(bool),
    /// A numeric field. Integers are widened to `f64`.
    Number(f64),
    /// A textual field.
    Text(&'a str),
    /// A sequence with the given number of elements.
    List(usize),
    /// A nested record with the given number of entries.
    Record(usize),
}

/// Type tag of a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// See [`FieldValue::Absent`].
    Absent,
    /// See [`FieldValue::Null`].
    Null,
    /// See [`FieldValue::Bool`].
    Boolean,
    /// See [`FieldValue::Number`].
    Number,
    /// See [`FieldValue::Text`].
    String,
    /// See [`FieldValue::List`].
    List,
    /// See [`FieldValue::Record`].
    Record,
}

impl ValueKind {
    /// Lower-case name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absent => "absent value",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::List => "list",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> FieldValue<'a> {
    /// Returns the type tag of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Absent => ValueKind::Absent,
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Number(_) => ValueKind::Number,
            Self::Text(_) => ValueKind::String,
            Self::List(_) => ValueKind::List,
            Self::Record(_) => ValueKind::Record,
        }
    }

    /// Whether this value counts as "nothing selected" for a dropdown.
    ///
    /// Absent, null, `false`, zero, `NaN` and the empty string are falsy.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match *self {
            Self::Absent | Self::Null => true,
            Self::Bool(value) => !value,
            Self::Number(value) => value == 0.0 || value.is_nan(),
            Self::Text(value) => value.is_empty(),
            Self::List(_) | Self::Record(_) => false,
        }
    }

    /// Reads this value as a boolean bound to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::TypeMismatch`] for anything but [`FieldValue::Bool`].
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match *self {
            Self::Bool(value) => Ok(value),
            other => Err(BindError::mismatch(key, ValueKind::Boolean, other.kind())),
        }
    }

    /// Reads this value as a number bound to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::TypeMismatch`] for anything but [`FieldValue::Number`].
    pub fn as_number(&self, key: &str) -> Result<f64> {
        match *self {
            Self::Number(value) => Ok(value),
            other => Err(BindError::mismatch(key, ValueKind::Number, other.kind())),
        }
    }

    /// Coerces this value into the string a dropdown selects.
    ///
    /// Falsy values become the empty string, text is used verbatim and numbers
    /// are written in their shortest decimal form.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::TypeConversion`] for `true`, lists and records.
    pub fn to_selection(&self, key: &str) -> Result<Cow<'a, str>> {
        if self.is_falsy() {
            return Ok(Cow::Borrowed(""));
        }
        match *self {
            Self::Text(value) => Ok(Cow::Borrowed(value)),
            Self::Number(value) => Ok(Cow::Owned(format_number(value))),
            other => Err(BindError::TypeConversion {
                key: key.to_owned(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("<absent>"),
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => f.write_str(&format_number(*value)),
            Self::Text(value) => write!(f, "{value:?}"),
            Self::List(len) => write!(f, "<list of {len}>"),
            Self::Record(len) => write!(f, "<record of {len}>"),
        }
    }
}

/// Formats a number the way labels and selections show it.
///
/// Integral values print without a fractional part and `-0` prints as `0`.
/// Magnitudes of `1e21` and above or below `1e-6` use exponent notation with
/// an explicit sign (`1e+21`, `1.5e-7`); infinities print as `Infinity`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_owned();
    }
    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        };
    }
    value.to_string()
}

/// Conversion from a Rust field type into the value a control reads.
///
/// Implemented for the primitive types a controls record usually carries, and
/// used by `#[derive(Controls)]` to read struct fields.
pub trait AsFieldValue {
    /// Borrows `self` as a [`FieldValue`].
    fn as_field_value(&self) -> FieldValue<'_>;
}

impl AsFieldValue for bool {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

macro_rules! numbers {
    ($($ty:ty),*) => {
        $(
            impl AsFieldValue for $ty {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless, clippy::unnecessary_cast)]
                fn as_field_value(&self) -> FieldValue<'_> {
                    FieldValue::Number(*self as f64)
                }
            }
        )*
    };
}

numbers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl AsFieldValue for str {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

impl AsFieldValue for Cow<'_, str> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for &T {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        self.as_ref()
            .map_or(FieldValue::Absent, AsFieldValue::as_field_value)
    }
}

impl<T> AsFieldValue for [T] {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::List(self.len())
    }
}

impl<T> AsFieldValue for Vec<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::List(self.len())
    }
}

impl<K, V, S> AsFieldValue for HashMap<K, V, S> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Record(self.len())
    }
}

impl<K, V> AsFieldValue for BTreeMap<K, V> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Record(self.len())
    }
}

impl AsFieldValue for FieldValue<'_> {
    fn as_field_value(&self) -> FieldValue<'_> {
        *self
    }
}

impl AsFieldValue for serde_json::Value {
    fn as_field_value(&self) -> FieldValue<'_> {
        use serde_json::Value;
        match self {
            Value::Null => FieldValue::Null,
            Value::Bool(value) => FieldValue::Bool(*value),
            Value::Number(number) => number
                .as_f64()
                .map_or(FieldValue::Number(f64::NAN), FieldValue::Number),
            Value::String(value) => FieldValue::Text(value),
            Value::Array(items) => FieldValue::List(items.len()),
            Value::Object(entries) => FieldValue::Record(entries.len()),
        }
    }
}

/// A statically typed value a dropdown can display.
///
/// Used by typed bindings, where the record's field type is known at compile
/// time. Follows the same coercion as [`FieldValue::to_selection`] for the
/// types it covers, so it never fails.
pub trait SelectValue {
    /// The selection string for this value.
    fn to_selection(&self) -> Cow<'_, str>;
}

impl SelectValue for str {
    fn to_selection(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl SelectValue for String {
    fn to_selection(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl SelectValue for Cow<'_, str> {
    fn to_selection(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl<T: SelectValue + ?Sized> SelectValue for &T {
    fn to_selection(&self) -> Cow<'_, str> {
        (**self).to_selection()
    }
}

impl<T: SelectValue> SelectValue for Option<T> {
    fn to_selection(&self) -> Cow<'_, str> {
        self.as_ref()
            .map_or(Cow::Borrowed(""), SelectValue::to_selection)
    }
}

macro_rules! selectable_numbers {
    ($($ty:ty),*) => {
        $(
            impl SelectValue for $ty {
                fn to_selection(&self) -> Cow<'_, str> {
                    let value = self.as_field_value();
                    if value.is_falsy() {
                        Cow::Borrowed("")
                    } else {
                        Cow::Owned(value.to_string())
                    }
                }
            }
        )*
    };
}

selectable_numbers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// A statically typed value a slider can display.
///
/// Covers every primitive number. Wide integers are widened to `f64` and may
/// lose precision, as they do when read through [`AsFieldValue`].
pub trait NumberValue {
    /// The value as a slider position.
    fn to_number(&self) -> f64;
}

impl<T: NumberValue + ?Sized> NumberValue for &T {
    fn to_number(&self) -> f64 {
        (**self).to_number()
    }
}

macro_rules! slidable_numbers {
    ($($ty:ty),*) => {
        $(
            impl NumberValue for $ty {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless, clippy::unnecessary_cast)]
                fn to_number(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

slidable_numbers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values() {
        for value in [
            FieldValue::Absent,
            FieldValue::Null,
            FieldValue::Bool(false),
            FieldValue::Number(0.0),
            FieldValue::Number(f64::NAN),
            FieldValue::Text(""),
        ] {
            assert!(value.is_falsy(), "{value:?} should be falsy");
        }
        assert!(!FieldValue::Bool(true).is_falsy());
        assert!(!FieldValue::Record(0).is_falsy());
        assert!(!FieldValue::List(0).is_falsy());
    }

    #[test]
    fn selection_coercion() {
        assert_eq!(FieldValue::Text("b").to_selection("k").unwrap(), "b");
        assert_eq!(FieldValue::Number(5.0).to_selection("k").unwrap(), "5");
        assert_eq!(FieldValue::Number(2.5).to_selection("k").unwrap(), "2.5");
        assert_eq!(FieldValue::Absent.to_selection("k").unwrap(), "");
        assert_eq!(FieldValue::Bool(false).to_selection("k").unwrap(), "");
    }

    #[test]
    fn selection_rejects_records_and_true() {
        let err = FieldValue::Record(0).to_selection("mode").unwrap_err();
        assert!(matches!(err, BindError::TypeConversion { ref key, .. } if key == "mode"));
        assert!(FieldValue::Bool(true).to_selection("mode").is_err());
        assert!(FieldValue::List(2).to_selection("mode").is_err());
    }

    #[test]
    fn strict_reads_report_found_kind() {
        let err = FieldValue::Text("yes").as_bool("enabled").unwrap_err();
        assert_eq!(
            err,
            BindError::TypeMismatch {
                key: "enabled".into(),
                expected: ValueKind::Boolean,
                found: ValueKind::String,
            }
        );
        assert_eq!(FieldValue::Number(7.0).as_number("n").unwrap(), 7.0);
        assert!(FieldValue::Bool(true).as_number("n").is_err());
    }

    #[test]
    fn rust_types_map_to_kinds() {
        assert_eq!(3u8.as_field_value(), FieldValue::Number(3.0));
        assert_eq!(None::<bool>.as_field_value(), FieldValue::Absent);
        assert_eq!(Some("x").as_field_value(), FieldValue::Text("x"));
        assert_eq!(vec![1, 2].as_field_value(), FieldValue::List(2));
        assert_eq!(json!({"a": 1}).as_field_value(), FieldValue::Record(1));
        assert_eq!(json!(null).as_field_value(), FieldValue::Null);
    }

    #[test]
    fn typed_selection_matches_dynamic_coercion() {
        assert_eq!(SelectValue::to_selection("b"), "b");
        assert_eq!(5u32.to_selection(), "5");
        assert_eq!(0i32.to_selection(), "");
        assert_eq!(None::<String>.to_selection(), "");
        assert_eq!(Some("saw".to_owned()).to_selection(), "saw");
    }

    #[test]
    fn numbers_format_without_trailing_zero() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.25), "0.25");
    }

    #[test]
    fn extreme_numbers_use_exponent_notation() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-1.5e300), "-1.5e+300");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(2.5e-8), "2.5e-8");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000_001), "0.000001");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn every_primitive_number_slides() {
        assert_eq!(u64::MAX.to_number(), 2f64.powi(64));
        assert_eq!((-3i128).to_number(), -3.0);
        assert_eq!(7usize.to_number(), 7.0);
        assert_eq!((&2.5f32).to_number(), 2.5);
    }
}
