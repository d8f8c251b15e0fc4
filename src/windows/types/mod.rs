//! Safe wrappers around raw Win32 types

mod handle;
mod module_info;

pub use handle::Handle;
pub use module_info::ModuleInfo;
