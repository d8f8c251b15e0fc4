//! Region descriptor for one slice of the target's logical address space

use serde::{Deserialize, Serialize};

/// Immutable description of one contiguous region of the target, created
/// once per target profile.
///
/// `game_offset` is the logical base other offsets are expressed relative
/// to; `process_offset` is meaningless until resolved against the live
/// process at attach time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRegion {
    /// Identifies the region within its context
    pub name: String,
    /// Logical (virtual) base the region is addressed at
    pub game_offset: u64,
    /// Optional bound-check size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// Host module to locate; `None` means the main executable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    /// Raw or pointer offset into the process or module
    pub process_offset: i64,
    /// One-level indirection toggle: the resolved offset holds a pointer
    /// to the real base
    #[serde(default)]
    pub is_pointer: bool,
    /// Tolerated at attach time: resolution failure skips the region
    /// instead of aborting the attach
    #[serde(default)]
    pub optional: bool,
}

impl MemoryRegion {
    /// Creates a region with no length bound, no module, direct offset
    pub fn new(name: impl Into<String>, game_offset: u64, process_offset: i64) -> Self {
        MemoryRegion {
            name: name.into(),
            game_offset,
            length: None,
            module_name: None,
            process_offset,
            is_pointer: false,
            optional: false,
        }
    }

    /// Sets the bound-check length
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// Resolves the offset relative to a named module instead of the
    /// main executable
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module_name = Some(module.into());
        self
    }

    /// Marks the offset as a pointer to the real base
    pub fn pointer(mut self) -> Self {
        self.is_pointer = true;
        self
    }

    /// Marks the region as tolerated when resolution fails
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// True when the virtual address falls inside this region
    pub fn contains(&self, vaddr: u64) -> bool {
        if vaddr < self.game_offset {
            return false;
        }
        match self.length {
            Some(length) => vaddr - self.game_offset < length,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let region = MemoryRegion::new("ROM", 0x0800_0000, 0x0188_20EC)
            .with_length(0x100_0000)
            .pointer()
            .optional();

        assert_eq!(region.name, "ROM");
        assert_eq!(region.game_offset, 0x0800_0000);
        assert_eq!(region.length, Some(0x100_0000));
        assert_eq!(region.module_name, None);
        assert_eq!(region.process_offset, 0x0188_20EC);
        assert!(region.is_pointer);
        assert!(region.optional);
    }

    #[test]
    fn test_contains_with_length() {
        let region = MemoryRegion::new("EWRAM", 0x0200_0000, 0).with_length(0x4_0000);
        assert!(region.contains(0x0200_0000));
        assert!(region.contains(0x0203_FFFF));
        assert!(!region.contains(0x0204_0000));
        assert!(!region.contains(0x01FF_FFFF));
    }

    #[test]
    fn test_contains_unbounded() {
        let region = MemoryRegion::new("Main", 0x1000, 0);
        assert!(region.contains(0x1000));
        assert!(region.contains(u64::MAX));
        assert!(!region.contains(0xFFF));
    }

    #[test]
    fn test_module_region() {
        let region = MemoryRegion::new("EWRAM", 0x0200_0000, 0x4_2000).in_module("mgba_libretro.dll");
        assert_eq!(region.module_name.as_deref(), Some("mgba_libretro.dll"));
    }
}
