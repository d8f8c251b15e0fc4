//! Windows module information wrapper

use crate::core::types::Address;
use winapi::um::psapi::MODULEINFO;

/// Load information for one module of the target process
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    pub name: String,
    pub base_address: Address,
    pub size: usize,
}

impl ModuleInfo {
    /// Create new module info
    pub fn new(name: String, info: MODULEINFO) -> Self {
        ModuleInfo {
            name,
            base_address: Address::new(info.lpBaseOfDll as usize as u64),
            size: info.SizeOfImage as usize,
        }
    }

    /// Check if an address is within this module
    pub fn contains_address(&self, addr: Address) -> bool {
        let addr = addr.as_u64();
        let base = self.base_address.as_u64();
        addr >= base && addr < base + self.size as u64
    }
}
