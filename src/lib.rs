//! Live process-memory instrumentation for games and emulators
//!
//! Attaches to a running target (a native game, DOSBox, or a GBA emulator),
//! resolves the target's memory regions through module bases and pointer
//! indirection, and keeps a typed record of game state refreshed against
//! live memory at ~60 Hz while foreground callers read and mutate it through
//! a single guarded container.
//!
//! The engine core is OS-independent: everything is written against the
//! [`memory::MemorySource`] trait. The Win32 implementation lives behind
//! `cfg(windows)`; [`memory::mock`] provides an in-memory double.

pub mod core;
pub mod memory;
pub mod profile;
pub mod record;
pub mod session;

#[cfg(windows)]
pub mod process;
#[cfg(windows)]
pub mod windows;

// Re-export the main types
pub use crate::core::types::{
    Address, AttachError, Endian, FieldKind, FieldValue, MemoryRegion, PointerWidth, ProbeError,
    ProbeResult,
};
pub use memory::{MemoryContext, MemorySource, RemoteMemoryStream, ResolvedRegion};
pub use profile::{GameProfile, GameTable, TargetKind, TargetProfile};
pub use record::{
    ActionSpec, FieldSpec, MemoryDataContainer, OffsetTable, StatRecord, TypedRecord,
};
pub use session::{attach, DetachReason, LoopState, RefreshLoop, Session, FRAME_INTERVAL};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_reexports_accessible() {
        let addr = Address::new(0x1000);
        assert_eq!(addr.as_u64(), 0x1000);

        let value = FieldValue::U32(42);
        assert_eq!(value.kind(), FieldKind::U32);
        assert_eq!(value.size(), 4);

        assert_eq!(crate::core::VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_region_reexport() {
        let region = MemoryRegion::new("Main", 0, 0x1D3C370).pointer();
        assert!(region.is_pointer);
        assert!(region.contains(0x10));
    }

    #[test]
    fn test_catalog_reexport() {
        assert!(profile::find_target("dosbox.exe").is_some());
    }
}
