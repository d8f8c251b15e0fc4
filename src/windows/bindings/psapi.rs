//! PSAPI.dll bindings for module enumeration

use crate::core::types::{ProbeError, ProbeResult};
use winapi::shared::minwindef::{FALSE, HMODULE};
use winapi::um::psapi::{EnumProcessModules, GetModuleInformation, MODULEINFO};
use winapi::um::winnt::HANDLE;

/// Safe wrapper for EnumProcessModules
///
/// # Safety
/// The handle must be a valid process handle
pub unsafe fn enum_process_modules(handle: HANDLE) -> ProbeResult<Vec<HMODULE>> {
    let mut modules = vec![std::ptr::null_mut(); 1024];
    let mut bytes_needed = 0u32;

    let result = EnumProcessModules(
        handle,
        modules.as_mut_ptr(),
        (modules.len() * std::mem::size_of::<HMODULE>()) as u32,
        &mut bytes_needed,
    );

    if result == FALSE {
        return Err(ProbeError::WindowsApi(
            "Failed to enumerate process modules".to_string(),
        ));
    }

    let count = bytes_needed as usize / std::mem::size_of::<HMODULE>();
    modules.truncate(count);

    Ok(modules)
}

/// Safe wrapper for GetModuleInformation
///
/// # Safety
/// The handle must be a valid process handle and the module must belong to it
pub unsafe fn get_module_information(handle: HANDLE, module: HMODULE) -> ProbeResult<MODULEINFO> {
    let mut info = MODULEINFO {
        lpBaseOfDll: std::ptr::null_mut(),
        SizeOfImage: 0,
        EntryPoint: std::ptr::null_mut(),
    };

    let result = GetModuleInformation(
        handle,
        module,
        &mut info,
        std::mem::size_of::<MODULEINFO>() as u32,
    );

    if result == FALSE {
        return Err(ProbeError::WindowsApi(
            "Failed to get module information".to_string(),
        ));
    }

    Ok(info)
}
