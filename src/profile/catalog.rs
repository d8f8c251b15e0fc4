//! Builtin catalog of known emulator builds and games
//!
//! Every entry describes one concrete build; two point releases of the same
//! emulator are two unrelated entries. Offsets were taken from the live
//! process of the named build and hold for that build only.

use super::{GameProfile, GameTable, TargetKind, TargetProfile};
use crate::core::types::{Endian, FieldKind, FieldValue, MemoryRegion, PointerWidth};
use crate::record::{ActionSpec, FieldSpec, OffsetTable};
use lazy_static::lazy_static;

lazy_static! {
    /// Known emulator/host builds, one entry per concrete build
    pub static ref BUILTIN_TARGETS: Vec<TargetProfile> = vec![
        dosbox_074_2(),
        dosbox_074_3(),
        dosbox_staging_0_81_2(),
        vbam_2_1_4(),
        mgba_0_10_3(),
        retroarch_1_19_mgba(),
        nocash_gba_3_05(),
    ];

    /// Known games with per-host offset dictionaries
    pub static ref BUILTIN_GAMES: Vec<GameProfile> = vec![aurora_quest()];
}

/// First builtin target whose keywords match the process name
pub fn find_target(process_name: &str) -> Option<&'static TargetProfile> {
    BUILTIN_TARGETS.iter().find(|t| t.matches(process_name))
}

/// First builtin game whose keywords match the title
pub fn find_game(title: &str) -> Option<&'static GameProfile> {
    BUILTIN_GAMES.iter().find(|g| g.matches(title))
}

fn dosbox_074_2() -> TargetProfile {
    TargetProfile {
        name: "DOSBox 0.74-2 (32-bit)".to_string(),
        kind: TargetKind::DosBox,
        keywords: vec!["dosbox".to_string()],
        pointer_width: PointerWidth::Bits32,
        regions: vec![
            // MemBase pointer inside the DOSBox image; the emulated
            // machine's conventional memory starts there
            MemoryRegion::new("Main", 0x00, 0x01D3_A1B0).pointer(),
        ],
    }
}

fn dosbox_074_3() -> TargetProfile {
    TargetProfile {
        name: "DOSBox 0.74-3 (32-bit)".to_string(),
        kind: TargetKind::DosBox,
        keywords: vec!["dosbox".to_string()],
        pointer_width: PointerWidth::Bits32,
        regions: vec![MemoryRegion::new("Main", 0x00, 0x01D3_C370).pointer()],
    }
}

fn dosbox_staging_0_81_2() -> TargetProfile {
    TargetProfile {
        name: "DOSBox Staging 0.81.2 (64-bit)".to_string(),
        kind: TargetKind::DosBox,
        keywords: vec!["dosbox-staging".to_string(), "dosbox_staging".to_string()],
        pointer_width: PointerWidth::Bits64,
        regions: vec![MemoryRegion::new("Main", 0x00, 0x0043_9EB8).pointer()],
    }
}

fn vbam_2_1_4() -> TargetProfile {
    TargetProfile {
        name: "VisualBoyAdvance-M 2.1.4 (32-bit)".to_string(),
        kind: TargetKind::GbaEmulator,
        keywords: vec!["visualboyadvance".to_string(), "vbam".to_string()],
        pointer_width: PointerWidth::Bits32,
        regions: vec![
            MemoryRegion::new("EWRAM", 0x0200_0000, 0x0184_8FE8)
                .with_length(0x4_0000)
                .pointer(),
            MemoryRegion::new("IWRAM", 0x0300_0000, 0x0184_8FEC)
                .with_length(0x8000)
                .pointer(),
            // ROM mirror; useful for title detection, absent in some builds
            MemoryRegion::new("ROM", 0x0800_0000, 0x0188_20EC)
                .with_length(0x100_0000)
                .pointer()
                .optional(),
        ],
    }
}

fn mgba_0_10_3() -> TargetProfile {
    TargetProfile {
        name: "mGBA 0.10.3 (64-bit)".to_string(),
        kind: TargetKind::GbaEmulator,
        keywords: vec!["mgba".to_string()],
        pointer_width: PointerWidth::Bits64,
        regions: vec![
            MemoryRegion::new("EWRAM", 0x0200_0000, 0x0101_8A08)
                .with_length(0x4_0000)
                .pointer(),
            MemoryRegion::new("IWRAM", 0x0300_0000, 0x0101_8A10)
                .with_length(0x8000)
                .pointer(),
            MemoryRegion::new("ROM", 0x0800_0000, 0x0101_8A30)
                .with_length(0x100_0000)
                .pointer()
                .optional(),
        ],
    }
}

fn retroarch_1_19_mgba() -> TargetProfile {
    TargetProfile {
        name: "RetroArch 1.19 (mGBA core, 64-bit)".to_string(),
        kind: TargetKind::GbaEmulator,
        keywords: vec!["retroarch".to_string()],
        pointer_width: PointerWidth::Bits64,
        regions: vec![
            // The core, not the frontend, owns the emulated memory
            MemoryRegion::new("EWRAM", 0x0200_0000, 0x002A_8E38)
                .with_length(0x4_0000)
                .in_module("mgba_libretro.dll")
                .pointer(),
            MemoryRegion::new("IWRAM", 0x0300_0000, 0x002A_8E40)
                .with_length(0x8000)
                .in_module("mgba_libretro.dll")
                .pointer(),
        ],
    }
}

fn nocash_gba_3_05() -> TargetProfile {
    TargetProfile {
        name: "no$gba 3.05 (32-bit)".to_string(),
        kind: TargetKind::GbaEmulator,
        keywords: vec!["no$gba".to_string(), "nogba".to_string()],
        pointer_width: PointerWidth::Bits32,
        regions: vec![
            MemoryRegion::new("EWRAM", 0x0200_0000, 0x0093_894C)
                .with_length(0x4_0000)
                .pointer(),
            MemoryRegion::new("IWRAM", 0x0300_0000, 0x0093_8950)
                .with_length(0x8000)
                .pointer(),
        ],
    }
}

/// Aurora Quest ships as a DOS original and a GBA port; the same fields
/// live at unrelated addresses on each host.
fn aurora_quest() -> GameProfile {
    let gba = OffsetTable {
        endian: Endian::Little,
        pointer_width: PointerWidth::Bits32,
        fields: vec![
            FieldSpec {
                name: "gold".to_string(),
                address: 0x0202_5BA4,
                chain: vec![],
                kind: FieldKind::U32,
            },
            FieldSpec {
                name: "health".to_string(),
                address: 0x0202_5BA8,
                chain: vec![],
                kind: FieldKind::I16,
            },
            FieldSpec {
                name: "max_health".to_string(),
                address: 0x0202_5BAA,
                chain: vec![],
                kind: FieldKind::I16,
            },
            FieldSpec {
                name: "level".to_string(),
                address: 0x0202_5BAC,
                chain: vec![],
                kind: FieldKind::U8,
            },
            FieldSpec {
                name: "experience".to_string(),
                address: 0x0202_5BB0,
                chain: vec![],
                kind: FieldKind::U32,
            },
            // Party roster is heap-allocated; IWRAM holds the pointer
            FieldSpec {
                name: "leader_strength".to_string(),
                address: 0x0300_2BE0,
                chain: vec![0x14],
                kind: FieldKind::U8,
            },
        ],
        actions: vec![
            ActionSpec {
                name: "max_gold".to_string(),
                field: "gold".to_string(),
                value: FieldValue::U32(999_999),
            },
            ActionSpec {
                name: "restore_health".to_string(),
                field: "health".to_string(),
                value: FieldValue::I16(999),
            },
        ],
    };

    let dos = OffsetTable {
        endian: Endian::Little,
        pointer_width: PointerWidth::Bits32,
        fields: vec![
            FieldSpec {
                name: "gold".to_string(),
                address: 0x001A_2B44,
                chain: vec![],
                kind: FieldKind::U32,
            },
            FieldSpec {
                name: "health".to_string(),
                address: 0x001A_2B48,
                chain: vec![],
                kind: FieldKind::I16,
            },
            FieldSpec {
                name: "max_health".to_string(),
                address: 0x001A_2B4A,
                chain: vec![],
                kind: FieldKind::I16,
            },
            FieldSpec {
                name: "level".to_string(),
                address: 0x001A_2B4C,
                chain: vec![],
                kind: FieldKind::U8,
            },
            FieldSpec {
                name: "experience".to_string(),
                address: 0x001A_2B50,
                chain: vec![],
                kind: FieldKind::U32,
            },
        ],
        actions: vec![ActionSpec {
            name: "max_gold".to_string(),
            field: "gold".to_string(),
            value: FieldValue::U32(999_999),
        }],
    };

    GameProfile {
        name: "Aurora Quest".to_string(),
        keywords: vec!["aurora".to_string()],
        tables: vec![
            GameTable {
                kind: TargetKind::GbaEmulator,
                offsets: gba,
            },
            GameTable {
                kind: TargetKind::DosBox,
                offsets: dos,
            },
        ],
    }
}
