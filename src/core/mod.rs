//! Core module containing the fundamental types for memprobe
//!
//! Provides the foundational building blocks used throughout the engine:
//! addresses in the target's address space, region descriptors, field
//! values, and the error taxonomy.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, AttachError, Endian, FieldKind, FieldValue, MemoryRegion, PointerWidth, ProbeError,
    ProbeResult,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
