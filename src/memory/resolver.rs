//! Region resolution at attach time

use crate::core::types::{Address, MemoryRegion, PointerWidth, ProbeError, ProbeResult};
use crate::memory::context::ResolvedRegion;
use crate::memory::source::MemorySource;
use crate::memory::stream::RemoteMemoryStream;
use std::sync::Arc;
use tracing::debug;

/// Resolves one region against the live process and wires a stream to the
/// resulting base.
///
/// A named module is looked up in the target; an unnamed region resolves
/// against the main executable's load base (looked up, never assumed; the
/// base moves under ASLR). When the region is flagged as a pointer, one
/// pointer-width value is read at the candidate address and used as the
/// final base.
///
/// Failure is fatal for this region only; the caller decides whether a
/// missing region aborts the whole attach.
pub fn resolve_region(
    source: &Arc<dyn MemorySource>,
    region: &MemoryRegion,
) -> ProbeResult<ResolvedRegion> {
    let module_base = match region.module_name.as_deref() {
        Some(name) => source.module_base(name)?,
        None => source.main_module_base()?,
    };

    let candidate = module_base.checked_offset(region.process_offset)?;

    let base = if region.is_pointer {
        let target = read_host_pointer(source.as_ref(), candidate)?;
        if target.is_null() {
            return Err(ProbeError::pointer_chain_broken(
                0,
                format!("null pointer at {candidate}"),
            ));
        }
        target
    } else {
        candidate
    };

    debug!(region = %region.name, %base, "resolved region");

    let stream = RemoteMemoryStream::new(source.clone(), base, region.length);
    Ok(ResolvedRegion::new(region.clone(), base, stream))
}

/// Reads one pointer-width value at a host address. Host pointers are
/// little-endian regardless of what the hosted game declares.
fn read_host_pointer(source: &dyn MemorySource, address: Address) -> ProbeResult<Address> {
    let width = source.pointer_width();
    let mut buf = [0u8; 8];
    let n = width.size();
    let read = source.read(address, &mut buf[..n])?;
    if read != n {
        return Err(ProbeError::read_failed(
            address,
            format!("short pointer read: {read} of {n} bytes"),
        ));
    }
    let value = match width {
        PointerWidth::Bits32 => u64::from(u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])),
        PointerWidth::Bits64 => u64::from_le_bytes(buf),
    };
    Ok(Address::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::mock::MockMemoryBuilder;

    fn as_source(mock: crate::memory::mock::MockMemory) -> Arc<dyn MemorySource> {
        Arc::new(mock)
    }

    #[test]
    fn test_direct_region_resolves_to_module_plus_offset() {
        let source = as_source(MockMemoryBuilder::new().main_module(0x0040_0000).build());
        let region = MemoryRegion::new("Main", 0, 0x1000);

        let resolved = resolve_region(&source, &region).unwrap();
        assert_eq!(resolved.base(), Address::new(0x0040_1000));
    }

    #[test]
    fn test_pointer_region_32bit() {
        let source = as_source(
            MockMemoryBuilder::new()
                .width(PointerWidth::Bits32)
                .main_module(0x0040_0000)
                .u32(0x0040_0000 + 0x1D3C370, 0x00AB_1000)
                .build(),
        );
        let region = MemoryRegion::new("Main", 0, 0x1D3C370).pointer();

        let resolved = resolve_region(&source, &region).unwrap();
        assert_eq!(resolved.base(), Address::new(0x00AB_1000));
    }

    #[test]
    fn test_pointer_region_64bit() {
        let source = as_source(
            MockMemoryBuilder::new()
                .width(PointerWidth::Bits64)
                .main_module(0x7FF6_0000_0000)
                .u64(0x7FF6_0000_0000 + 0x4820, 0x0000_0219_AB00_0000)
                .build(),
        );
        let region = MemoryRegion::new("EWRAM", 0x0200_0000, 0x4820).pointer();

        let resolved = resolve_region(&source, &region).unwrap();
        assert_eq!(resolved.base(), Address::new(0x0000_0219_AB00_0000));
    }

    #[test]
    fn test_named_module_resolution() {
        let source = as_source(
            MockMemoryBuilder::new()
                .main_module(0x0040_0000)
                .module("mgba_libretro.dll", 0x1000_0000)
                .u32(0x1000_0000 + 0x40, 0x0BEE_F000)
                .build(),
        );
        let region = MemoryRegion::new("EWRAM", 0x0200_0000, 0x40)
            .in_module("mgba_libretro.dll")
            .pointer();

        let resolved = resolve_region(&source, &region).unwrap();
        assert_eq!(resolved.base(), Address::new(0x0BEE_F000));
    }

    #[test]
    fn test_missing_module_fails() {
        let source = as_source(MockMemoryBuilder::new().build());
        let region = MemoryRegion::new("EWRAM", 0, 0).in_module("gone.dll");
        assert!(matches!(
            resolve_region(&source, &region),
            Err(ProbeError::ModuleNotFound(_))
        ));
    }

    #[test]
    fn test_null_pointer_fails() {
        let source = as_source(MockMemoryBuilder::new().main_module(0x0040_0000).build());
        let region = MemoryRegion::new("Main", 0, 0x1000).pointer();
        assert!(matches!(
            resolve_region(&source, &region),
            Err(ProbeError::PointerChainBroken { level: 0, .. })
        ));
    }

    #[test]
    fn test_negative_offset() {
        let source = as_source(MockMemoryBuilder::new().main_module(0x0040_0000).build());
        let region = MemoryRegion::new("Header", 0, -0x200);
        let resolved = resolve_region(&source, &region).unwrap();
        assert_eq!(resolved.base(), Address::new(0x003F_FE00));
    }
}
