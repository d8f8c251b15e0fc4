//! Aggregation of resolved regions into one addressable space

use crate::core::types::{
    Address, Endian, FieldKind, FieldValue, MemoryRegion, PointerWidth, ProbeError, ProbeResult,
};
use crate::memory::source::MemorySource;
use crate::memory::stream::RemoteMemoryStream;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// One region after attach-time resolution, owned exclusively by its
/// [`MemoryContext`] and destroyed with it at detach.
#[derive(Debug)]
pub struct ResolvedRegion {
    region: MemoryRegion,
    base: Address,
    stream: RemoteMemoryStream,
}

impl ResolvedRegion {
    pub(crate) fn new(region: MemoryRegion, base: Address, stream: RemoteMemoryStream) -> Self {
        ResolvedRegion {
            region,
            base,
            stream,
        }
    }

    pub fn region(&self) -> &MemoryRegion {
        &self.region
    }

    /// Resolved base address in the target process
    pub fn base(&self) -> Address {
        self.base
    }

    pub fn stream(&self) -> &RemoteMemoryStream {
        &self.stream
    }
}

/// A set of named, resolved streams addressed by the target's own logical
/// layout.
///
/// Structured data locates a byte by virtual address (or by region name plus
/// offset); the context translates that into an absolute read/write against
/// the correct stream. All underlying OS handles are owned here for the
/// lifetime of one attach session and released by `Drop` on every exit path,
/// including panics during serialization.
pub struct MemoryContext {
    source: Arc<dyn MemorySource>,
    regions: Vec<ResolvedRegion>,
}

impl MemoryContext {
    /// Builds a context, enforcing the unique-region-name invariant
    pub fn new(source: Arc<dyn MemorySource>, regions: Vec<ResolvedRegion>) -> ProbeResult<Self> {
        let mut seen = HashSet::new();
        for resolved in &regions {
            if !seen.insert(resolved.region.name.clone()) {
                return Err(ProbeError::InvalidAddress(format!(
                    "duplicate region name {} in context",
                    resolved.region.name
                )));
            }
        }
        Ok(MemoryContext { source, regions })
    }

    pub fn source(&self) -> &Arc<dyn MemorySource> {
        &self.source
    }

    pub fn regions(&self) -> &[ResolvedRegion] {
        &self.regions
    }

    /// Stream backing a named region
    pub fn stream(&self, name: &str) -> ProbeResult<&RemoteMemoryStream> {
        self.regions
            .iter()
            .find(|r| r.region.name == name)
            .map(|r| &r.stream)
            .ok_or_else(|| ProbeError::RegionNotFound(name.to_string()))
    }

    /// Maps a virtual address to its backing region and in-region offset.
    ///
    /// A read addressed at one region's virtual base is never satisfied by
    /// another region's stream.
    pub fn locate(&self, vaddr: u64) -> ProbeResult<(&ResolvedRegion, u64)> {
        self.regions
            .iter()
            .find(|r| r.region.contains(vaddr))
            .map(|r| (r, vaddr - r.region.game_offset))
            .ok_or_else(|| ProbeError::Unmapped(format!("0x{vaddr:08X}")))
    }

    /// Reads bytes at a virtual address
    pub fn read_at(&self, vaddr: u64, buf: &mut [u8]) -> ProbeResult<()> {
        let (region, offset) = self.locate(vaddr)?;
        region.stream.read_at(offset, buf)
    }

    /// Writes bytes at a virtual address
    pub fn write_at(&self, vaddr: u64, data: &[u8]) -> ProbeResult<()> {
        let (region, offset) = self.locate(vaddr)?;
        region.stream.write_at(offset, data)
    }

    /// Reads one typed value at a virtual address
    pub fn read_value(&self, vaddr: u64, kind: FieldKind, endian: Endian) -> ProbeResult<FieldValue> {
        let mut buf = [0u8; 8];
        let n = kind.size();
        self.read_at(vaddr, &mut buf[..n])?;
        FieldValue::from_bytes(&buf[..n], kind, endian)
            .ok_or_else(|| ProbeError::read_failed(format!("0x{vaddr:08X}"), "undecodable value"))
    }

    /// Writes one typed value at a virtual address
    pub fn write_value(&self, vaddr: u64, value: FieldValue, endian: Endian) -> ProbeResult<()> {
        self.write_at(vaddr, &value.to_bytes(endian))
    }

    /// Reads an in-game pointer (declared width and byte order) at a
    /// virtual address
    pub fn read_game_pointer(
        &self,
        vaddr: u64,
        width: PointerWidth,
        endian: Endian,
    ) -> ProbeResult<u64> {
        let kind = match width {
            PointerWidth::Bits32 => FieldKind::U32,
            PointerWidth::Bits64 => FieldKind::U64,
        };
        let value = self.read_value(vaddr, kind, endian)?;
        // as_pointer cannot fail for the kinds selected above
        Ok(value.as_pointer().unwrap_or(0))
    }
}

impl fmt::Debug for MemoryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryContext")
            .field("regions", &self.regions)
            .finish()
    }
}
