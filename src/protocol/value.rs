//! Typed field values

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{FieldDef, ScalarType};

/// Value held by one message field
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// `uint8_t`
    U8(u8),
    /// `int8_t`
    I8(i8),
    /// `uint16_t`
    U16(u16),
    /// `int16_t`
    I16(i16),
    /// `uint32_t`
    U32(u32),
    /// `int32_t`
    I32(i32),
    /// `uint64_t`
    U64(u64),
    /// `int64_t`
    I64(i64),
    /// `float`
    F32(f32),
    /// `double`
    F64(f64),
    /// Single `char`
    Char(u8),
    /// Fixed-length array of scalars of one type
    Array(Vec<Value>),
    /// Null-padded character buffer
    Text(String),
}

impl Value {
    /// Zero value of a scalar type
    #[must_use]
    pub const fn zero(ty: ScalarType) -> Self {
        match ty {
            ScalarType::U8 => Self::U8(0),
            ScalarType::I8 => Self::I8(0),
            ScalarType::U16 => Self::U16(0),
            ScalarType::I16 => Self::I16(0),
            ScalarType::U32 => Self::U32(0),
            ScalarType::I32 => Self::I32(0),
            ScalarType::U64 => Self::U64(0),
            ScalarType::I64 => Self::I64(0),
            ScalarType::F32 => Self::F32(0.0),
            ScalarType::F64 => Self::F64(0.0),
            ScalarType::Char => Self::Char(0),
        }
    }

    /// Default value for a field: zero, array of zeros or empty text
    #[must_use]
    pub fn default_for(field: &FieldDef) -> Self {
        if field.is_text() {
            Self::Text(String::new())
        } else if field.is_array() {
            Self::Array(vec![Self::zero(field.scalar_type()); field.array_len()])
        } else {
            Self::zero(field.scalar_type())
        }
    }

    /// Scalar type of this value, `None` for arrays and text
    #[must_use]
    pub const fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Self::U8(_) => Some(ScalarType::U8),
            Self::I8(_) => Some(ScalarType::I8),
            Self::U16(_) => Some(ScalarType::U16),
            Self::I16(_) => Some(ScalarType::I16),
            Self::U32(_) => Some(ScalarType::U32),
            Self::I32(_) => Some(ScalarType::I32),
            Self::U64(_) => Some(ScalarType::U64),
            Self::I64(_) => Some(ScalarType::I64),
            Self::F32(_) => Some(ScalarType::F32),
            Self::F64(_) => Some(ScalarType::F64),
            Self::Char(_) => Some(ScalarType::Char),
            Self::Array(_) | Self::Text(_) => None,
        }
    }

    /// Check whether the value has the shape `field` declares
    #[must_use]
    pub fn fits(&self, field: &FieldDef) -> bool {
        match self {
            Self::Text(_) => field.is_text(),
            Self::Array(items) => {
                field.is_array()
                    && !field.is_text()
                    && items.len() == field.array_len()
                    && items
                        .iter()
                        .all(|item| item.scalar_type() == Some(field.scalar_type()))
            }
            scalar => !field.is_array() && scalar.scalar_type() == Some(field.scalar_type()),
        }
    }

    /// Text content, if this is a character buffer
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Array elements, if this is an array
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Widen an integer value to `i128`
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Self::U8(v) | Self::Char(v) => Some(i128::from(v)),
            Self::I8(v) => Some(i128::from(v)),
            Self::U16(v) => Some(i128::from(v)),
            Self::I16(v) => Some(i128::from(v)),
            Self::U32(v) => Some(i128::from(v)),
            Self::I32(v) => Some(i128::from(v)),
            Self::U64(v) => Some(i128::from(v)),
            Self::I64(v) => Some(i128::from(v)),
            _ => None,
        }
    }

    /// Widen a numeric value to `f64`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::F32(v) => Some(f64::from(v)),
            Self::F64(v) => Some(v),
            _ => self.as_i128().map(|v| v as f64),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{}", char::from(*v)),
            Self::Text(text) => write!(f, "{text}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

macro_rules! impl_from_scalar {
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

impl_from_scalar! {
    u8 => U8, i8 => I8, u16 => U16, i16 => I16, u32 => U32,
    i32 => I32, u64 => U64, i64 => I64, f32 => F32, f64 => F64,
}

/// ASCII characters become [`Value::Char`]. Anything wider cannot fit a
/// one-byte `char` field and becomes [`Value::Text`].
impl From<char> for Value {
    fn from(c: char) -> Self {
        if c.is_ascii() {
            Self::Char(c as u8)
        } else {
            Self::Text(c.to_string())
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}
