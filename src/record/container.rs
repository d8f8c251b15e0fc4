//! Mutex-guarded holder of exactly one live record

use super::TypedRecord;
use crate::core::types::{FieldValue, ProbeResult};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Shared access point for one [`TypedRecord`].
///
/// The refresh loop's `update()` and every foreground `access_read` /
/// `access_write` go through the same guard, so at most one of them executes
/// at any instant and no caller ever observes a partially-updated record.
/// All entry points are synchronous and bounded; the guard is never held
/// across a suspension point.
pub struct MemoryDataContainer {
    record: Mutex<Box<dyn TypedRecord>>,
}

impl MemoryDataContainer {
    pub fn new(record: Box<dyn TypedRecord>) -> Self {
        MemoryDataContainer {
            record: Mutex::new(record),
        }
    }

    // A panicked accessor leaves values stale, not torn: every field slot is
    // written whole, so recovering the poisoned guard is safe.
    fn guard(&self) -> MutexGuard<'_, Box<dyn TypedRecord>> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs a read-only projection against the current record
    pub fn access_read<T>(&self, f: impl FnOnce(&dyn TypedRecord) -> T) -> T {
        let guard = self.guard();
        f(&**guard)
    }

    /// Runs a mutation against the current record
    pub fn access_write<T>(&self, f: impl FnOnce(&mut dyn TypedRecord) -> T) -> T {
        let mut guard = self.guard();
        f(&mut **guard)
    }

    /// Refreshes every field from live memory; invoked by the refresh loop
    pub fn update(&self) -> ProbeResult<()> {
        self.guard().refresh()
    }

    /// Declared field names of the bound record
    pub fn field_names(&self) -> Vec<String> {
        self.access_read(|r| r.field_names().into_iter().map(String::from).collect())
    }

    /// Last-observed value of a named field
    pub fn value(&self, field: &str) -> ProbeResult<FieldValue> {
        self.access_read(|r| r.value(field))
    }

    /// Guarded write-through mutation of a named field
    pub fn set_value(&self, field: &str, value: FieldValue) -> ProbeResult<()> {
        self.access_write(|r| r.set_value(field, value))
    }

    /// Declared action names of the bound record
    pub fn action_names(&self) -> Vec<String> {
        self.access_read(|r| r.action_names().into_iter().map(String::from).collect())
    }

    /// Performs a named action under the guard
    pub fn invoke(&self, action: &str) -> ProbeResult<()> {
        self.access_write(|r| r.invoke(action))
    }
}

impl fmt::Debug for MemoryDataContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDataContainer").finish_non_exhaustive()
    }
}
