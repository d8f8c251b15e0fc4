//! Target pointer width and byte order

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pointer width of a target process or of pointers stored in game memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    /// Size of one pointer in bytes
    pub const fn size(self) -> usize {
        match self {
            PointerWidth::Bits32 => 4,
            PointerWidth::Bits64 => 8,
        }
    }

    /// True for 64-bit targets
    pub const fn is_wide(self) -> bool {
        matches!(self, PointerWidth::Bits64)
    }
}

impl Default for PointerWidth {
    fn default() -> Self {
        PointerWidth::Bits32
    }
}

impl fmt::Display for PointerWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerWidth::Bits32 => write!(f, "32-bit"),
            PointerWidth::Bits64 => write!(f, "64-bit"),
        }
    }
}

/// Byte order declared by a target platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    Little,
    Big,
}

impl Default for Endian {
    fn default() -> Self {
        Endian::Little
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Little => write!(f, "little-endian"),
            Endian::Big => write!(f, "big-endian"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_width() {
        assert_eq!(PointerWidth::Bits32.size(), 4);
        assert_eq!(PointerWidth::Bits64.size(), 8);
        assert!(!PointerWidth::Bits32.is_wide());
        assert!(PointerWidth::Bits64.is_wide());
        assert_eq!(PointerWidth::default(), PointerWidth::Bits32);
    }

    #[test]
    fn test_display() {
        assert_eq!(PointerWidth::Bits32.to_string(), "32-bit");
        assert_eq!(Endian::Big.to_string(), "big-endian");
    }
}
