//! Raw Win32 API wrappers

pub mod kernel32;
pub mod psapi;
