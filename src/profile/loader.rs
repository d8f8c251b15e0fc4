//! Loading extra profiles from disk
//!
//! Targets the engine does not ship offsets for can be described in a TOML
//! or JSON file and merged with the builtin catalog by the embedding
//! application.

use super::{GameProfile, TargetProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Profile loading/validation failure
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported profile format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid profile: {0}")]
    Invalid(String),
}

/// On-disk profile bundle: any mix of targets and games
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileFile {
    #[serde(default)]
    pub targets: Vec<TargetProfile>,
    #[serde(default)]
    pub games: Vec<GameProfile>,
}

/// Reads and validates a profile file, dispatching on the extension
pub fn load_profiles(path: &Path) -> Result<ProfileFile, ProfileError> {
    let text = fs::read_to_string(path)?;
    let file: ProfileFile = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&text)?,
        Some("json") => serde_json::from_str(&text)?,
        other => {
            return Err(ProfileError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            ))
        }
    };
    validate(&file)?;
    info!(
        path = %path.display(),
        targets = file.targets.len(),
        games = file.games.len(),
        "loaded profile file"
    );
    Ok(file)
}

fn validate(file: &ProfileFile) -> Result<(), ProfileError> {
    for target in &file.targets {
        if target.name.is_empty() {
            return Err(ProfileError::Invalid("target with empty name".to_string()));
        }
        if target.regions.is_empty() {
            return Err(ProfileError::Invalid(format!(
                "target {} declares no regions",
                target.name
            )));
        }
        let mut regions = HashSet::new();
        for region in &target.regions {
            if region.name.is_empty() {
                return Err(ProfileError::Invalid(format!(
                    "target {} has a region with an empty name",
                    target.name
                )));
            }
            if !regions.insert(&region.name) {
                return Err(ProfileError::Invalid(format!(
                    "target {} declares region {} twice",
                    target.name, region.name
                )));
            }
        }
    }

    for game in &file.games {
        if game.name.is_empty() {
            return Err(ProfileError::Invalid("game with empty name".to_string()));
        }
        let mut kinds = HashSet::new();
        for table in &game.tables {
            let kind = table.kind;
            if !kinds.insert(kind) {
                return Err(ProfileError::Invalid(format!(
                    "game {} declares two tables for kind {kind}",
                    game.name
                )));
            }
            let mut fields = HashSet::new();
            for field in &table.offsets.fields {
                if !fields.insert(&field.name) {
                    return Err(ProfileError::Invalid(format!(
                        "game {} ({kind}) declares field {} twice",
                        game.name, field.name
                    )));
                }
            }
            for action in &table.offsets.actions {
                let field = table
                    .offsets
                    .fields
                    .iter()
                    .find(|f| f.name == action.field)
                    .ok_or_else(|| {
                        ProfileError::Invalid(format!(
                            "game {} ({kind}): action {} targets unknown field {}",
                            game.name, action.name, action.field
                        ))
                    })?;
                if action.value.kind() != field.kind {
                    return Err(ProfileError::Invalid(format!(
                        "game {} ({kind}): action {} value kind {} does not match field kind {}",
                        game.name,
                        action.name,
                        action.value.kind(),
                        field.kind
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::catalog::BUILTIN_TARGETS;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let original = ProfileFile {
            targets: vec![BUILTIN_TARGETS[0].clone()],
            games: vec![],
        };
        let path = write_file(&dir, "extra.toml", &toml::to_string(&original).unwrap());

        let loaded = load_profiles(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let original = ProfileFile {
            targets: vec![BUILTIN_TARGETS[0].clone()],
            games: crate::profile::catalog::BUILTIN_GAMES.clone(),
        };
        let path = write_file(
            &dir,
            "extra.json",
            &serde_json::to_string_pretty(&original).unwrap(),
        );

        let loaded = load_profiles(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "extra.yaml", "targets: []");
        assert!(matches!(
            load_profiles(&path),
            Err(ProfileError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "broken.toml", "targets = not toml");
        assert!(matches!(load_profiles(&path), Err(ProfileError::Toml(_))));
    }

    #[test]
    fn test_duplicate_region_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut target = BUILTIN_TARGETS[0].clone();
        target.regions.push(target.regions[0].clone());
        let file = ProfileFile {
            targets: vec![target],
            games: vec![],
        };
        let path = write_file(&dir, "dup.toml", &toml::to_string(&file).unwrap());
        assert!(matches!(load_profiles(&path), Err(ProfileError::Invalid(_))));
    }

    #[test]
    fn test_empty_region_set_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut target = BUILTIN_TARGETS[0].clone();
        target.regions.clear();
        let file = ProfileFile {
            targets: vec![target],
            games: vec![],
        };
        let path = write_file(&dir, "empty.toml", &toml::to_string(&file).unwrap());
        assert!(matches!(load_profiles(&path), Err(ProfileError::Invalid(_))));
    }
}
