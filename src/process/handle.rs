//! Safe process handle wrapper with RAII semantics

use crate::core::types::{PointerWidth, ProbeError, ProbeResult};
use crate::windows::bindings::kernel32;
use crate::windows::types::Handle;
use std::fmt;
use winapi::um::winnt::HANDLE;

/// Access rights for process handles
#[derive(Debug, Clone, Copy)]
pub struct ProcessAccess {
    value: u32,
}

impl ProcessAccess {
    /// Query information access
    pub const QUERY_INFORMATION: Self = Self { value: 0x0400 };
    /// Read memory access
    pub const VM_READ: Self = Self { value: 0x0010 };
    /// Write memory access
    pub const VM_WRITE: Self = Self { value: 0x0020 };
    /// Execute operations
    pub const VM_OPERATION: Self = Self { value: 0x0008 };

    /// Combine access rights
    pub fn combine(rights: &[Self]) -> Self {
        let mut value = 0;
        for right in rights {
            value |= right.value;
        }
        Self { value }
    }

    /// Get raw value
    pub fn value(&self) -> u32 {
        self.value
    }
}

/// Safe wrapper around a Windows process handle.
///
/// Read/write failures against a handle whose process has exited are
/// reported as `ProcessExited`, never as a generic API error; callers rely
/// on that classification to tell "connection lost" from a real fault.
pub struct ProcessHandle {
    handle: Handle,
    pid: u32,
    access: ProcessAccess,
}

impl ProcessHandle {
    /// Open a process with specified access rights
    pub fn open(pid: u32, access: ProcessAccess) -> ProbeResult<Self> {
        let raw_handle = kernel32::open_process(pid, access.value())?;
        Ok(ProcessHandle {
            handle: Handle::new(raw_handle),
            pid,
            access,
        })
    }

    /// Open a process for reading and writing memory
    pub fn open_for_read_write(pid: u32) -> ProbeResult<Self> {
        Self::open(
            pid,
            ProcessAccess::combine(&[
                ProcessAccess::QUERY_INFORMATION,
                ProcessAccess::VM_READ,
                ProcessAccess::VM_WRITE,
                ProcessAccess::VM_OPERATION,
            ]),
        )
    }

    /// Get the process ID
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Get the raw handle
    ///
    /// # Safety
    /// The returned handle is only valid as long as this ProcessHandle exists
    pub unsafe fn raw(&self) -> HANDLE {
        self.handle.raw()
    }

    /// Get the access rights
    pub fn access(&self) -> ProcessAccess {
        self.access
    }

    /// Check if handle is valid
    pub fn is_valid(&self) -> bool {
        !self.handle.is_null()
    }

    /// Whether the process behind the handle is still running
    pub fn is_alive(&self) -> bool {
        self.is_valid() && unsafe { kernel32::is_process_alive(self.handle.raw()) }
    }

    /// Pointer width of the process behind the handle
    pub fn pointer_width(&self) -> ProbeResult<PointerWidth> {
        if !self.is_valid() {
            return Err(ProbeError::InvalidHandle(
                "Process handle is null".to_string(),
            ));
        }
        let wow64 = unsafe { kernel32::is_wow64_process(self.handle.raw())? };
        if wow64 {
            Ok(PointerWidth::Bits32)
        } else if cfg!(target_pointer_width = "64") {
            Ok(PointerWidth::Bits64)
        } else {
            Ok(PointerWidth::Bits32)
        }
    }

    /// Read memory from the process
    pub fn read_memory(&self, address: u64, buffer: &mut [u8]) -> ProbeResult<usize> {
        if !self.is_valid() {
            return Err(ProbeError::InvalidHandle(
                "Process handle is null".to_string(),
            ));
        }
        let result = unsafe { kernel32::read_process_memory(self.handle.raw(), address, buffer) };
        self.classify(result)
    }

    /// Write memory to the process
    pub fn write_memory(&self, address: u64, data: &[u8]) -> ProbeResult<usize> {
        if !self.is_valid() {
            return Err(ProbeError::InvalidHandle(
                "Process handle is null".to_string(),
            ));
        }
        let result = unsafe { kernel32::write_process_memory(self.handle.raw(), address, data) };
        self.classify(result)
    }

    fn classify(&self, result: ProbeResult<usize>) -> ProbeResult<usize> {
        match result {
            Err(_) if !self.is_alive() => Err(ProbeError::ProcessExited),
            other => other,
        }
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("valid", &self.is_valid())
            .field("access", &format!("0x{:X}", self.access.value()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_access_combine() {
        let combined = ProcessAccess::combine(&[ProcessAccess::VM_READ, ProcessAccess::VM_WRITE]);
        assert_eq!(combined.value(), 0x0030);

        let all = ProcessAccess::combine(&[
            ProcessAccess::QUERY_INFORMATION,
            ProcessAccess::VM_READ,
            ProcessAccess::VM_WRITE,
            ProcessAccess::VM_OPERATION,
        ]);
        assert_eq!(all.value(), 0x0438);
    }

    #[test]
    fn test_open_invalid_process() {
        let result = ProcessHandle::open_for_read_write(0);
        assert!(result.is_err());
    }

    #[test]
    fn test_current_process() {
        let pid = std::process::id();
        let handle = ProcessHandle::open(
            pid,
            ProcessAccess::combine(&[ProcessAccess::QUERY_INFORMATION, ProcessAccess::VM_READ]),
        )
        .expect("Failed to open current process");

        assert_eq!(handle.pid(), pid);
        assert!(handle.is_valid());
        assert!(handle.is_alive());

        let value: u64 = 0xFEED_FACE_CAFE_BEEF;
        let mut buffer = [0u8; 8];
        let read = handle
            .read_memory(&value as *const u64 as usize as u64, &mut buffer)
            .unwrap();
        assert_eq!(read, 8);
        assert_eq!(u64::from_le_bytes(buffer), value);
    }
}
