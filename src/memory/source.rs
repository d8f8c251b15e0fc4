//! Raw access to a foreign address space

use crate::core::types::{Address, PointerWidth, ProbeResult};
use std::fmt;

/// OS-level read/write primitives for another process's memory.
///
/// The engine is written entirely against this trait: region resolution,
/// streams, and records never touch an OS handle directly. The Win32
/// implementation lives in [`crate::process`]; [`crate::memory::mock`]
/// provides an in-memory double for tests.
///
/// Implementations classify a dead target themselves: any operation against
/// an exited process fails fast with `ProbeError::ProcessExited` rather than
/// blocking or returning a generic read failure.
pub trait MemorySource: Send + Sync + fmt::Debug {
    /// Pointer width of the target process (not of the host)
    fn pointer_width(&self) -> PointerWidth;

    /// Whether the target process is still running
    fn is_alive(&self) -> bool;

    /// Reads `buf.len()` bytes at an absolute target address, returning the
    /// number of bytes actually read
    fn read(&self, address: Address, buf: &mut [u8]) -> ProbeResult<usize>;

    /// Writes `data` at an absolute target address, returning the number of
    /// bytes actually written
    fn write(&self, address: Address, data: &[u8]) -> ProbeResult<usize>;

    /// Load base of a named module inside the target
    fn module_base(&self, name: &str) -> ProbeResult<Address>;

    /// Load base of the target's main executable
    fn main_module_base(&self) -> ProbeResult<Address>;
}
