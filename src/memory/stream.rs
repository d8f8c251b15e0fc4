//! Seekable stream over one resolved slice of a foreign address space

use crate::core::types::{Address, ProbeError, ProbeResult};
use crate::memory::source::MemorySource;
use std::fmt;
use std::sync::Arc;

/// A readable/writable stream positioned inside the target's memory.
///
/// All offsets are relative to the resolved `base`, so callers address
/// memory using the target's own logical layout rather than host physical
/// addresses. The optional `length` bound-checks every access.
pub struct RemoteMemoryStream {
    source: Arc<dyn MemorySource>,
    base: Address,
    length: Option<u64>,
    position: u64,
}

impl RemoteMemoryStream {
    pub fn new(source: Arc<dyn MemorySource>, base: Address, length: Option<u64>) -> Self {
        RemoteMemoryStream {
            source,
            base,
            length,
            position: 0,
        }
    }

    /// Resolved base address in the target process
    pub fn base(&self) -> Address {
        self.base
    }

    /// Declared bound-check length, if any
    pub fn length(&self) -> Option<u64> {
        self.length
    }

    /// Pointer width of the target: true for 64-bit
    pub fn is_wide(&self) -> bool {
        self.source.pointer_width().is_wide()
    }

    /// Current stream position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Moves the stream position
    pub fn seek(&mut self, position: u64) -> ProbeResult<()> {
        if let Some(length) = self.length {
            if position > length {
                return Err(ProbeError::out_of_range(
                    self.base,
                    format!("seek to {position:#x} past region length {length:#x}"),
                ));
            }
        }
        self.position = position;
        Ok(())
    }

    /// Maps a relative offset to an absolute target address, bound-checked
    fn translate(&self, offset: u64, len: usize) -> ProbeResult<Address> {
        let end = offset.checked_add(len as u64).ok_or_else(|| {
            ProbeError::out_of_range(self.base, "offset plus length wraps the address space")
        })?;
        if let Some(length) = self.length {
            if end > length {
                return Err(ProbeError::out_of_range(
                    self.base,
                    format!("access of {len} bytes at {offset:#x} past region length {length:#x}"),
                ));
            }
        }
        // Both ends of the access must be representable
        self.base.checked_add(end)?;
        self.base.checked_add(offset)
    }

    /// Reads exactly `buf.len()` bytes at the given relative offset
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> ProbeResult<()> {
        let address = self.translate(offset, buf.len())?;
        let read = self.source.read(address, buf)?;
        if read != buf.len() {
            return Err(ProbeError::read_failed(
                address,
                format!("short read: {read} of {} bytes", buf.len()),
            ));
        }
        Ok(())
    }

    /// Writes all of `data` at the given relative offset
    pub fn write_at(&self, offset: u64, data: &[u8]) -> ProbeResult<()> {
        let address = self.translate(offset, data.len())?;
        let written = self.source.write(address, data)?;
        if written != data.len() {
            return Err(ProbeError::write_failed(
                address,
                format!("short write: {written} of {} bytes", data.len()),
            ));
        }
        Ok(())
    }

    /// Reads at the current position and advances it
    pub fn read(&mut self, buf: &mut [u8]) -> ProbeResult<()> {
        self.read_at(self.position, buf)?;
        self.position += buf.len() as u64;
        Ok(())
    }

    /// Writes at the current position and advances it
    pub fn write(&mut self, data: &[u8]) -> ProbeResult<()> {
        self.write_at(self.position, data)?;
        self.position += data.len() as u64;
        Ok(())
    }
}

impl fmt::Debug for RemoteMemoryStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteMemoryStream")
            .field("base", &self.base)
            .field("length", &self.length)
            .field("position", &self.position)
            .finish()
    }
}
