//! Field value enum preserving declared width and endianness

use super::arch::Endian;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field value read from or written to target memory.
///
/// The variant fixes the exact width; conversions between widths are never
/// implicit (a `u32` field cannot be set from a `u16` value).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

/// Declared type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

macro_rules! decode {
    ($bytes:expr, $endian:expr, $ty:ty, $variant:ident, $n:expr) => {{
        let arr: [u8; $n] = $bytes.get(..$n)?.try_into().ok()?;
        Some(FieldValue::$variant(match $endian {
            Endian::Little => <$ty>::from_le_bytes(arr),
            Endian::Big => <$ty>::from_be_bytes(arr),
        }))
    }};
}

macro_rules! encode {
    ($value:expr, $endian:expr) => {
        match $endian {
            Endian::Little => $value.to_le_bytes().to_vec(),
            Endian::Big => $value.to_be_bytes().to_vec(),
        }
    };
}

impl FieldValue {
    /// Returns the declared kind of this value
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::I8(_) => FieldKind::I8,
            FieldValue::I16(_) => FieldKind::I16,
            FieldValue::I32(_) => FieldKind::I32,
            FieldValue::I64(_) => FieldKind::I64,
            FieldValue::U8(_) => FieldKind::U8,
            FieldValue::U16(_) => FieldKind::U16,
            FieldValue::U32(_) => FieldKind::U32,
            FieldValue::U64(_) => FieldKind::U64,
            FieldValue::F32(_) => FieldKind::F32,
            FieldValue::F64(_) => FieldKind::F64,
        }
    }

    /// Returns the size in bytes of the value
    pub fn size(&self) -> usize {
        self.kind().size()
    }

    /// Encodes the value with the given byte order
    pub fn to_bytes(&self, endian: Endian) -> Vec<u8> {
        match self {
            FieldValue::I8(v) => encode!(v, endian),
            FieldValue::I16(v) => encode!(v, endian),
            FieldValue::I32(v) => encode!(v, endian),
            FieldValue::I64(v) => encode!(v, endian),
            FieldValue::U8(v) => encode!(v, endian),
            FieldValue::U16(v) => encode!(v, endian),
            FieldValue::U32(v) => encode!(v, endian),
            FieldValue::U64(v) => encode!(v, endian),
            FieldValue::F32(v) => encode!(v, endian),
            FieldValue::F64(v) => encode!(v, endian),
        }
    }

    /// Decodes a value of the given kind from a byte slice.
    ///
    /// Returns `None` when the slice is shorter than the kind's width.
    pub fn from_bytes(bytes: &[u8], kind: FieldKind, endian: Endian) -> Option<Self> {
        match kind {
            FieldKind::I8 => decode!(bytes, endian, i8, I8, 1),
            FieldKind::I16 => decode!(bytes, endian, i16, I16, 2),
            FieldKind::I32 => decode!(bytes, endian, i32, I32, 4),
            FieldKind::I64 => decode!(bytes, endian, i64, I64, 8),
            FieldKind::U8 => decode!(bytes, endian, u8, U8, 1),
            FieldKind::U16 => decode!(bytes, endian, u16, U16, 2),
            FieldKind::U32 => decode!(bytes, endian, u32, U32, 4),
            FieldKind::U64 => decode!(bytes, endian, u64, U64, 8),
            FieldKind::F32 => decode!(bytes, endian, f32, F32, 4),
            FieldKind::F64 => decode!(bytes, endian, f64, F64, 8),
        }
    }

    /// Interprets the value as a pointer, for unsigned pointer-width kinds only
    pub fn as_pointer(&self) -> Option<u64> {
        match self {
            FieldValue::U32(v) => Some(u64::from(*v)),
            FieldValue::U64(v) => Some(*v),
            _ => None,
        }
    }
}

impl FieldKind {
    /// Returns the size in bytes for this kind
    pub const fn size(self) -> usize {
        match self {
            FieldKind::I8 | FieldKind::U8 => 1,
            FieldKind::I16 | FieldKind::U16 => 2,
            FieldKind::I32 | FieldKind::U32 | FieldKind::F32 => 4,
            FieldKind::I64 | FieldKind::U64 | FieldKind::F64 => 8,
        }
    }

    /// Zero value of this kind, used before the first refresh pass
    pub const fn zero(self) -> FieldValue {
        match self {
            FieldKind::I8 => FieldValue::I8(0),
            FieldKind::I16 => FieldValue::I16(0),
            FieldKind::I32 => FieldValue::I32(0),
            FieldKind::I64 => FieldValue::I64(0),
            FieldKind::U8 => FieldValue::U8(0),
            FieldKind::U16 => FieldValue::U16(0),
            FieldKind::U32 => FieldValue::U32(0),
            FieldKind::U64 => FieldValue::U64(0),
            FieldKind::F32 => FieldValue::F32(0.0),
            FieldKind::F64 => FieldValue::F64(0.0),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::I8(v) => write!(f, "{}", v),
            FieldValue::I16(v) => write!(f, "{}", v),
            FieldValue::I32(v) => write!(f, "{}", v),
            FieldValue::I64(v) => write!(f, "{}", v),
            FieldValue::U8(v) => write!(f, "{}", v),
            FieldValue::U16(v) => write!(f, "{}", v),
            FieldValue::U32(v) => write!(f, "{}", v),
            FieldValue::U64(v) => write!(f, "{}", v),
            FieldValue::F32(v) => write!(f, "{}", v),
            FieldValue::F64(v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::I8 => "i8",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::U8 => "u8",
            FieldKind::U16 => "u16",
            FieldKind::U32 => "u32",
            FieldKind::U64 => "u64",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
        };
        write!(f, "{}", name)
    }
}
