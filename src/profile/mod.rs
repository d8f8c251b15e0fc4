//! Static target and game profile configuration
//!
//! Profiles are pure data: process-name keywords for auto-matching, region
//! sets per emulator build, and per-game offset dictionaries. Emulator
//! internals change across versions, so the catalog keeps one entry per
//! concrete build instead of attempting version detection; offsets are
//! empirically discovered, not derived.

mod catalog;
mod loader;

pub use catalog::{find_game, find_target, BUILTIN_GAMES, BUILTIN_TARGETS};
pub use loader::{load_profiles, ProfileError, ProfileFile};

use crate::core::types::{MemoryRegion, PointerWidth};
use crate::record::OffsetTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag distinguishing what hosts the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// The game itself runs natively
    Native,
    /// The game runs inside DOSBox
    DosBox,
    /// The game runs inside a GBA emulator
    GbaEmulator,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Native => write!(f, "native"),
            TargetKind::DosBox => write!(f, "dos_box"),
            TargetKind::GbaEmulator => write!(f, "gba_emulator"),
        }
    }
}

/// One concrete target build: name, kind, match keywords, expected pointer
/// width, and the region set to resolve at attach time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProfile {
    pub name: String,
    pub kind: TargetKind,
    /// Process-name substrings used for auto-matching (case-insensitive)
    pub keywords: Vec<String>,
    #[serde(default)]
    pub pointer_width: PointerWidth,
    pub regions: Vec<MemoryRegion>,
}

impl TargetProfile {
    /// True when the process name matches any keyword
    pub fn matches(&self, process_name: &str) -> bool {
        let lower = process_name.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
    }
}

/// Offset dictionary for one host kind of a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameTable {
    pub kind: TargetKind,
    pub offsets: OffsetTable,
}

/// One known game: name, match keywords, and an offset dictionary per
/// target kind it is playable on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameProfile {
    pub name: String,
    pub keywords: Vec<String>,
    pub tables: Vec<GameTable>,
}

impl GameProfile {
    /// Offset dictionary for the given target kind, if this game runs there
    pub fn offsets(&self, kind: TargetKind) -> Option<&OffsetTable> {
        self.tables.iter().find(|t| t.kind == kind).map(|t| &t.offsets)
    }

    /// True when the title matches any keyword
    pub fn matches(&self, title: &str) -> bool {
        let lower = title.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let profile = TargetProfile {
            name: "DOSBox 0.74-3 (32-bit)".to_string(),
            kind: TargetKind::DosBox,
            keywords: vec!["dosbox".to_string()],
            pointer_width: PointerWidth::Bits32,
            regions: vec![],
        };
        assert!(profile.matches("DOSBox.exe"));
        assert!(profile.matches("C:\\Games\\DOSBOX.EXE"));
        assert!(!profile.matches("notepad.exe"));
    }

    #[test]
    fn test_offsets_by_kind() {
        let game = GameProfile {
            name: "Test".to_string(),
            keywords: vec![],
            tables: vec![],
        };
        assert!(game.offsets(TargetKind::DosBox).is_none());
    }
}
