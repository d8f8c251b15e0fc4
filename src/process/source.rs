//! Win32 implementation of the engine's memory source contract

use crate::core::types::{Address, PointerWidth, ProbeResult};
use crate::memory::MemorySource;
use crate::process::{ModuleEnumerator, ProcessHandle};

/// A live Windows process exposed as a [`MemorySource`].
///
/// The attach collaborator opens the PID and hands the source to
/// [`crate::session::attach`]; the pointer width is probed once at open
/// time. Dropping the source (with the owning session) closes the handle.
#[derive(Debug)]
pub struct WindowsMemorySource {
    handle: ProcessHandle,
    width: PointerWidth,
}

impl WindowsMemorySource {
    /// Opens the process for read/write and probes its pointer width
    pub fn open(pid: u32) -> ProbeResult<Self> {
        let handle = ProcessHandle::open_for_read_write(pid)?;
        let width = handle.pointer_width()?;
        Ok(WindowsMemorySource { handle, width })
    }

    pub fn pid(&self) -> u32 {
        self.handle.pid()
    }
}

impl MemorySource for WindowsMemorySource {
    fn pointer_width(&self) -> PointerWidth {
        self.width
    }

    fn is_alive(&self) -> bool {
        self.handle.is_alive()
    }

    fn read(&self, address: Address, buf: &mut [u8]) -> ProbeResult<usize> {
        self.handle.read_memory(address.as_u64(), buf)
    }

    fn write(&self, address: Address, data: &[u8]) -> ProbeResult<usize> {
        self.handle.write_memory(address.as_u64(), data)
    }

    fn module_base(&self, name: &str) -> ProbeResult<Address> {
        ModuleEnumerator::new(&self.handle)
            .find_by_name(name)
            .map(|m| m.base_address)
    }

    fn main_module_base(&self) -> ProbeResult<Address> {
        ModuleEnumerator::new(&self.handle)
            .main_module()
            .map(|m| m.base_address)
    }
}
