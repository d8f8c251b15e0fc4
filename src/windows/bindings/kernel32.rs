//! Kernel32.dll bindings for process and memory operations

use crate::core::types::{ProbeError, ProbeResult};
use winapi::shared::minwindef::{DWORD, FALSE, LPVOID};
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::handleapi::CloseHandle;
use winapi::um::memoryapi::{ReadProcessMemory, WriteProcessMemory};
use winapi::um::processthreadsapi::{GetExitCodeProcess, OpenProcess};
use winapi::um::winnt::HANDLE;
use winapi::um::wow64apiset::IsWow64Process;

const ERROR_ACCESS_DENIED: DWORD = 5;
// GetExitCodeProcess reports STATUS_PENDING while the process runs
const STILL_ACTIVE: DWORD = 259;

/// Safe wrapper for OpenProcess
pub fn open_process(pid: u32, desired_access: u32) -> ProbeResult<HANDLE> {
    unsafe {
        let handle = OpenProcess(desired_access, FALSE, pid);
        if handle.is_null() {
            if GetLastError() == ERROR_ACCESS_DENIED {
                Err(ProbeError::access_denied(
                    pid,
                    "OpenProcess rejected the requested rights",
                ))
            } else {
                Err(ProbeError::InvalidHandle(format!(
                    "OpenProcess failed for PID {pid}"
                )))
            }
        } else {
            Ok(handle)
        }
    }
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle
pub unsafe fn close_handle(handle: HANDLE) -> ProbeResult<()> {
    if handle.is_null() {
        return Ok(());
    }

    if CloseHandle(handle) == FALSE {
        Err(ProbeError::WindowsApi(
            "Failed to close handle".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Safe wrapper for ReadProcessMemory
///
/// # Safety
/// The handle must be a valid process handle with appropriate access rights
pub unsafe fn read_process_memory(
    handle: HANDLE,
    address: u64,
    buffer: &mut [u8],
) -> ProbeResult<usize> {
    let mut bytes_read = 0;

    let result = ReadProcessMemory(
        handle,
        address as usize as LPVOID,
        buffer.as_mut_ptr() as LPVOID,
        buffer.len(),
        &mut bytes_read,
    );

    if result == FALSE {
        Err(ProbeError::read_failed(
            format!("0x{:X}", address),
            "ReadProcessMemory failed",
        ))
    } else {
        Ok(bytes_read)
    }
}

/// Safe wrapper for WriteProcessMemory
///
/// # Safety
/// The handle must be a valid process handle with appropriate access rights
pub unsafe fn write_process_memory(
    handle: HANDLE,
    address: u64,
    data: &[u8],
) -> ProbeResult<usize> {
    let mut bytes_written = 0;

    let result = WriteProcessMemory(
        handle,
        address as usize as LPVOID,
        data.as_ptr() as LPVOID,
        data.len(),
        &mut bytes_written,
    );

    if result == FALSE {
        Err(ProbeError::write_failed(
            format!("0x{:X}", address),
            "WriteProcessMemory failed",
        ))
    } else {
        Ok(bytes_written)
    }
}

/// Whether the process behind the handle is still running
///
/// # Safety
/// The handle must be a valid process handle
pub unsafe fn is_process_alive(handle: HANDLE) -> bool {
    let mut code: DWORD = 0;
    if GetExitCodeProcess(handle, &mut code) == FALSE {
        return false;
    }
    code == STILL_ACTIVE
}

/// Whether the process runs under WOW64 (32-bit process on a 64-bit host)
///
/// # Safety
/// The handle must be a valid process handle
pub unsafe fn is_wow64_process(handle: HANDLE) -> ProbeResult<bool> {
    let mut wow64 = FALSE;
    if IsWow64Process(handle, &mut wow64) == FALSE {
        return Err(ProbeError::WindowsApi(
            "IsWow64Process failed".to_string(),
        ));
    }
    Ok(wow64 != FALSE)
}
