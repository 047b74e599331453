// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Scalar cell values and property conversions.
//!
//! Every column a [`RowReader`](crate::RowReader) yields is a [`Value`].
//! Generated setters convert values into property types through
//! [`FromValue`]; generated getters go the other way through [`IntoValue`].
//!
//! # Widening Rules
//!
//! | Property type | Accepted values |
//! |---------------|-----------------|
//! | `i16`, `i32`, `i64` | any integer, range-checked |
//! | `bool` | `Bool`, integer `0` / `1` |
//! | `f64` | `F32`, `F64`, any integer |
//! | `f32` | `F32`, `I16` |
//! | `Decimal` | `Decimal`, any integer |
//! | `String` | `Text` |
//! | `Uuid` | `Uuid`, parseable `Text` |
//! | `DateTime<Utc>` | `DateTime`, `Date` (midnight) |
//! | `NaiveDate` | `Date`, `DateTime` (date part) |
//! | `Vec<u8>` | `Bytes` |
//! | `Option<T>` | `Null` as `None`, otherwise as `T` |

use std::{
    fmt,
    hash::{Hash, Hasher}
};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ConversionError;

/// Kind of a [`Value`], used in metadata and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    /// SQL `NULL`.
    Null,
    /// Boolean.
    Bool,
    /// 16-bit integer.
    I16,
    /// 32-bit integer.
    I32,
    /// 64-bit integer.
    I64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// Fixed-point decimal.
    Decimal,
    /// UTF-8 text.
    Text,
    /// UUID.
    Uuid,
    /// Calendar date.
    Date,
    /// UTC timestamp.
    DateTime,
    /// Binary blob.
    Bytes
}

impl ValueKind {
    /// Lowercase name used in messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Bytes => "bytes"
        }
    }

    /// Check if this is an integer kind.
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::I16 | Self::I32 | Self::I64)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scalar cell.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// SQL `NULL`.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// 16-bit integer.
    I16(i16),
    /// 32-bit integer.
    I32(i32),
    /// 64-bit integer.
    I64(i64),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// Fixed-point decimal.
    Decimal(Decimal),
    /// UTF-8 text.
    Text(String),
    /// UUID.
    Uuid(Uuid),
    /// Calendar date.
    Date(NaiveDate),
    /// UTC timestamp.
    DateTime(DateTime<Utc>),
    /// Binary blob.
    Bytes(Vec<u8>)
}

impl Value {
    /// Kind of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::I16(_) => ValueKind::I16,
            Self::I32(_) => ValueKind::I32,
            Self::I64(_) => ValueKind::I64,
            Self::F32(_) => ValueKind::F32,
            Self::F64(_) => ValueKind::F64,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::Text(_) => ValueKind::Text,
            Self::Uuid(_) => ValueKind::Uuid,
            Self::Date(_) => ValueKind::Date,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Bytes(_) => ValueKind::Bytes
        }
    }

    /// Check if this value is `NULL`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer payload widened to `i64`, if this is an integer.
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I16(v) => Some(*v as i64),
            Self::I32(v) => Some(*v as i64),
            Self::I64(v) => Some(*v),
            _ => None
        }
    }
}

// Floats hash and compare by bit pattern so values can key identity maps.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Uuid(a), Self::Uuid(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            _ => false
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(v) => v.hash(state),
            Self::I16(v) => v.hash(state),
            Self::I32(v) => v.hash(state),
            Self::I64(v) => v.hash(state),
            Self::F32(v) => v.to_bits().hash(state),
            Self::F64(v) => v.to_bits().hash(state),
            Self::Decimal(v) => v.hash(state),
            Self::Text(v) => v.hash(state),
            Self::Uuid(v) => v.hash(state),
            Self::Date(v) => v.hash(state),
            Self::DateTime(v) => v.hash(state),
            Self::Bytes(v) => v.hash(state)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Bytes(v) => write!(f, "<{} bytes>", v.len())
        }
    }
}

/// Conversion from a property type into a [`Value`].
///
/// Implemented for every supported scalar type and `Option` of it.
/// Generated getters call [`IntoValue::to_value`] on the field.
pub trait IntoValue {
    /// Kind produced for non-null values.
    const KIND: ValueKind;

    /// Copy the property into a cell value.
    fn to_value(&self) -> Value;
}

/// Conversion from a [`Value`] into a property type.
///
/// Generated setters call [`FromValue::from_value`] with the raw cell.
pub trait FromValue: Sized {
    /// Convert the cell, applying the widening rules.
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

fn mismatch(expected: ValueKind, found: &Value) -> ConversionError {
    if found.is_null() {
        ConversionError::UnexpectedNull {
            expected
        }
    } else {
        ConversionError::Mismatch {
            expected,
            found: found.kind()
        }
    }
}

macro_rules! integer_value {
    ($ty:ty, $variant:ident) => {
        impl IntoValue for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn to_value(&self) -> Value {
                Value::$variant(*self)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ConversionError> {
                match value.as_i64() {
                    Some(wide) => <$ty>::try_from(wide).map_err(|_| ConversionError::OutOfRange {
                        expected: ValueKind::$variant,
                        value:    wide.to_string()
                    }),
                    None => Err(mismatch(ValueKind::$variant, &value))
                }
            }
        }
    };
}

integer_value!(i16, I16);
integer_value!(i32, I32);
integer_value!(i64, I64);

impl IntoValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(v) => Ok(v),
            ref other => match other.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                Some(wide) => Err(ConversionError::OutOfRange {
                    expected: ValueKind::Bool,
                    value:    wide.to_string()
                }),
                None => Err(mismatch(ValueKind::Bool, other))
            }
        }
    }
}

impl IntoValue for f64 {
    const KIND: ValueKind = ValueKind::F64;

    fn to_value(&self) -> Value {
        Value::F64(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::F64(v) => Ok(v),
            Value::F32(v) => Ok(f64::from(v)),
            Value::I16(v) => Ok(f64::from(v)),
            Value::I32(v) => Ok(f64::from(v)),
            Value::I64(v) => Ok(v as f64),
            other => Err(mismatch(ValueKind::F64, &other))
        }
    }
}

impl IntoValue for f32 {
    const KIND: ValueKind = ValueKind::F32;

    fn to_value(&self) -> Value {
        Value::F32(*self)
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::F32(v) => Ok(v),
            Value::I16(v) => Ok(f32::from(v)),
            other => Err(mismatch(ValueKind::F32, &other))
        }
    }
}

impl IntoValue for Decimal {
    const KIND: ValueKind = ValueKind::Decimal;

    fn to_value(&self) -> Value {
        Value::Decimal(*self)
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Decimal(v) => Ok(v),
            ref other => match other.as_i64() {
                Some(wide) => Ok(Decimal::from(wide)),
                None => Err(mismatch(ValueKind::Decimal, other))
            }
        }
    }
}

impl IntoValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(mismatch(ValueKind::Text, &other))
        }
    }
}

impl IntoValue for Uuid {
    const KIND: ValueKind = ValueKind::Uuid;

    fn to_value(&self) -> Value {
        Value::Uuid(*self)
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Uuid(v) => Ok(v),
            Value::Text(text) => Uuid::parse_str(&text).map_err(|_| ConversionError::Parse {
                expected: ValueKind::Uuid,
                value:    text
            }),
            other => Err(mismatch(ValueKind::Uuid, &other))
        }
    }
}

impl IntoValue for DateTime<Utc> {
    const KIND: ValueKind = ValueKind::DateTime;

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::DateTime(v) => Ok(v),
            Value::Date(date) => Ok(date.and_time(chrono::NaiveTime::MIN).and_utc()),
            other => Err(mismatch(ValueKind::DateTime, &other))
        }
    }
}

impl IntoValue for NaiveDate {
    const KIND: ValueKind = ValueKind::Date;

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Date(v) => Ok(v),
            Value::DateTime(v) => Ok(v.date_naive()),
            other => Err(mismatch(ValueKind::Date, &other))
        }
    }
}

impl IntoValue for Vec<u8> {
    const KIND: ValueKind = ValueKind::Bytes;

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bytes(v) => Ok(v),
            other => Err(mismatch(ValueKind::Bytes, &other))
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, IntoValue::to_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

value_from!(
    bool => Bool,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    String => Text,
    Uuid => Uuid,
    NaiveDate => Date,
    DateTime<Utc> => DateTime,
    Vec<u8> => Bytes
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
