//! Typed records serialized against a live memory context

mod container;
mod stat;

pub use container::MemoryDataContainer;
pub use stat::StatRecord;

use crate::core::types::{Endian, FieldKind, FieldValue, PointerWidth, ProbeResult};
use serde::{Deserialize, Serialize};

/// Named-offset dictionary a record needs to locate its fields.
///
/// Supplied per game and per target kind by the profile catalog; offsets are
/// empirically discovered, so the table is data, never code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetTable {
    /// Byte order declared by the target platform
    #[serde(default)]
    pub endian: Endian,
    /// Width of pointers stored *inside* game memory (for chased fields);
    /// distinct from the host process's pointer width
    #[serde(default)]
    pub pointer_width: PointerWidth,
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

/// Location and type of one record field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// Virtual (game) address of the field, or of the chain head
    pub address: u64,
    /// Pointer-chase links: each entry dereferences the current address and
    /// adds the link offset
    #[serde(default)]
    pub chain: Vec<u64>,
    pub kind: FieldKind,
}

/// A zero-argument mutation: set `field` to `value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub name: String,
    pub field: String,
    pub value: FieldValue,
}

/// Capability of serializing a structured record against live target memory.
///
/// Implemented per game kind; the offset dictionary is passed in as data so
/// a new target needs configuration plus one small implementation, not a new
/// type hierarchy.
pub trait TypedRecord: Send {
    /// One full read pass over every declared field.
    ///
    /// Idempotent: with no intervening external change, repeated calls yield
    /// identical values.
    fn refresh(&mut self) -> ProbeResult<()>;

    /// Declared field names, in declaration order
    fn field_names(&self) -> Vec<&str>;

    /// Last-observed value of a field
    fn value(&self, field: &str) -> ProbeResult<FieldValue>;

    /// Write-through field mutation: writes live memory, then updates the
    /// held value, so a read immediately after returns what was written.
    /// The value's kind must match the declaration exactly.
    fn set_value(&mut self, field: &str, value: FieldValue) -> ProbeResult<()>;

    /// Declared action names, in declaration order
    fn action_names(&self) -> Vec<&str>;

    /// Performs a named action (internally a write-through mutation)
    fn invoke(&mut self, action: &str) -> ProbeResult<()>;
}
