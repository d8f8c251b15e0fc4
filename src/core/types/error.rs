//! Error taxonomy for live-memory instrumentation

use std::fmt;
use thiserror::Error;

/// Main error type for operations against a live target process
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Module not found in target process: {0}")]
    ModuleNotFound(String),

    #[error("Access denied to process {pid}: {reason}")]
    AccessDenied { pid: u32, reason: String },

    #[error("Target process has exited")]
    ProcessExited,

    #[error("Offset out of range at {address}: {reason}")]
    OutOfRange { address: String, reason: String },

    #[error("Address {0} is not covered by any region")]
    Unmapped(String),

    #[error("Region {region}: resolved pointer {address} lies outside every mapped range")]
    StaleRegion { region: String, address: String },

    #[error("Pointer chain broken at level {level}: {reason}")]
    PointerChainBroken { level: usize, reason: String },

    #[error("No region named {0} in this context")]
    RegionNotFound(String),

    #[error("No field named {0} in this record")]
    FieldNotFound(String),

    #[error("No action named {0} in this record")]
    ActionNotFound(String),

    #[error("Field {field} expects {expected}, got {actual}")]
    KindMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to read memory at {address}: {reason}")]
    ReadFailed { address: String, reason: String },

    #[error("Failed to write memory at {address}: {reason}")]
    WriteFailed { address: String, reason: String },

    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApiError(#[from] windows::core::Error),

    #[error("Windows API: {0}")]
    WindowsApi(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

impl ProbeError {
    /// Creates a new Windows API error with the last error code
    #[cfg(windows)]
    pub fn last_os_error() -> Self {
        ProbeError::WindowsApiError(windows::core::Error::from_win32())
    }

    /// Creates an access denied error for a process
    pub fn access_denied(pid: u32, reason: impl Into<String>) -> Self {
        ProbeError::AccessDenied {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates a read failed error
    pub fn read_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        ProbeError::ReadFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a write failed error
    pub fn write_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        ProbeError::WriteFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an out of range error
    pub fn out_of_range(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        ProbeError::OutOfRange {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a pointer chain broken error
    pub fn pointer_chain_broken(level: usize, reason: impl Into<String>) -> Self {
        ProbeError::PointerChainBroken {
            level,
            reason: reason.into(),
        }
    }

    /// Creates a stale region error
    pub fn stale_region(region: impl Into<String>, address: impl fmt::Display) -> Self {
        ProbeError::StaleRegion {
            region: region.into(),
            address: address.to_string(),
        }
    }

    /// Creates a kind mismatch error
    pub fn kind_mismatch(
        field: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        ProbeError::KindMismatch {
            field: field.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// True when the error means the target is gone, which is the one
    /// expected termination condition rather than a fault.
    pub fn is_process_exited(&self) -> bool {
        matches!(self, ProbeError::ProcessExited)
    }
}

/// Attach-time failure, surfaced once and synchronously to the attach caller
#[derive(Error, Debug)]
pub enum AttachError {
    #[error("Required region {region} failed to resolve: {source}")]
    Region {
        region: String,
        #[source]
        source: ProbeError,
    },

    #[error("Target architecture mismatch: profile expects {expected}, process is {actual}")]
    Architecture { expected: String, actual: String },

    #[error("Game profile {profile} has no offsets for target kind {kind}")]
    UnsupportedTarget { profile: String, kind: String },

    #[error("No region of target profile {0} could be resolved")]
    NoRegions(String),

    #[error("Profile rejected: {0}")]
    InvalidProfile(String),

    #[error("Initial record read failed: {0}")]
    InitialRead(#[source] ProbeError),
}
