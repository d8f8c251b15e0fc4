//! Module enumeration inside the attached process

use crate::core::types::{ProbeError, ProbeResult};
use crate::process::ProcessHandle;
use crate::windows::bindings::psapi;
use crate::windows::types::ModuleInfo;
use crate::windows::utils::string_conv::wide_to_string;
use winapi::shared::minwindef::{DWORD, HMODULE, MAX_PATH};
use winapi::um::psapi::GetModuleBaseNameW;

/// Enumerates modules loaded in a process
pub struct ModuleEnumerator<'a> {
    handle: &'a ProcessHandle,
}

impl<'a> ModuleEnumerator<'a> {
    /// Create a new module enumerator for a process
    pub fn new(handle: &'a ProcessHandle) -> Self {
        ModuleEnumerator { handle }
    }

    /// Enumerate all modules in the process
    pub fn enumerate(&self) -> ProbeResult<Vec<ModuleInfo>> {
        let modules = unsafe { psapi::enum_process_modules(self.handle.raw())? };

        let mut module_infos = Vec::with_capacity(modules.len());
        for &module in &modules {
            if let Ok(info) = self.get_module_info(module) {
                module_infos.push(info);
            }
        }

        Ok(module_infos)
    }

    /// Get information about a specific module
    fn get_module_info(&self, module: HMODULE) -> ProbeResult<ModuleInfo> {
        unsafe {
            let mut base_name: [u16; MAX_PATH] = [0; MAX_PATH];
            let name_len = GetModuleBaseNameW(
                self.handle.raw(),
                module,
                base_name.as_mut_ptr(),
                MAX_PATH as DWORD,
            );

            if name_len == 0 {
                return Err(ProbeError::WindowsApi(
                    "Failed to get module base name".to_string(),
                ));
            }

            let name = wide_to_string(&base_name[..name_len as usize]);
            let info = psapi::get_module_information(self.handle.raw(), module)?;

            Ok(ModuleInfo::new(name, info))
        }
    }

    /// Find a module by name (case-insensitive)
    pub fn find_by_name(&self, name: &str) -> ProbeResult<ModuleInfo> {
        let name_lower = name.to_lowercase();
        self.enumerate()?
            .into_iter()
            .find(|m| m.name.to_lowercase() == name_lower)
            .ok_or_else(|| ProbeError::ModuleNotFound(name.to_string()))
    }

    /// Get the main module (executable) of the process; always enumerated
    /// first by the OS
    pub fn main_module(&self) -> ProbeResult<ModuleInfo> {
        self.enumerate()?
            .into_iter()
            .next()
            .ok_or_else(|| ProbeError::ModuleNotFound("<main executable>".to_string()))
    }
}
