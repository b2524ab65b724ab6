//! Game version detection
//!
//! The game keeps version-specific mod files in `mods/<a.b.c.d>/` and
//! `res_mods/<a.b.c.d>/`. The current version is the numerically highest
//! `a.b.c.d` directory inside `<game>/mods`.
//!
//! # Design
//!
//! - Versions compare numerically per component (`1.10.0.0 > 1.9.0.0`)
//! - The folder spelling is preserved, so the name written back to disk is
//!   exactly the name that was found
//! - Plain files with version-shaped names are ignored

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{InstallerError, Result};

/// A four-part game version such as `1.27.0.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameVersion {
    parts: [u64; 4],
    raw: String,
}

impl GameVersion {
    /// Numeric components, most significant first.
    pub fn parts(&self) -> [u64; 4] {
        self.parts
    }

    /// The version exactly as spelled on disk.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for GameVersion {
    type Err = InstallerError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = [0u64; 4];
        let mut count = 0;

        for segment in s.split('.') {
            if count == 4 || segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(InstallerError::InvalidVersion(s.to_string()));
            }
            parts[count] = segment
                .parse()
                .map_err(|_| InstallerError::InvalidVersion(s.to_string()))?;
            count += 1;
        }

        if count != 4 {
            return Err(InstallerError::InvalidVersion(s.to_string()));
        }

        Ok(Self {
            parts,
            raw: s.to_string(),
        })
    }
}

impl TryFrom<String> for GameVersion {
    type Error = InstallerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<GameVersion> for String {
    fn from(version: GameVersion) -> Self {
        version.raw
    }
}

impl Ord for GameVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts
            .cmp(&other.parts)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for GameVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Detect the current game version from `<game_dir>/mods`.
///
/// # Errors
///
/// - `ModsFolderMissing` when `<game_dir>/mods` does not exist
/// - `NoVersionFolder` when it holds no `a.b.c.d` directory
/// - `Io` when the folder cannot be listed
pub fn detect(game_dir: &Path) -> Result<GameVersion> {
    let mods_path = game_dir.join("mods");
    if !mods_path.is_dir() {
        return Err(InstallerError::ModsFolderMissing(mods_path));
    }

    let mut latest: Option<GameVersion> = None;
    for entry in fs::read_dir(&mods_path)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        let Ok(version) = name.parse::<GameVersion>() else {
            tracing::debug!("Ignoring non-version folder: {}", name);
            continue;
        };
        if latest.as_ref().is_none_or(|current| version > *current) {
            latest = Some(version);
        }
    }

    match latest {
        Some(version) => {
            tracing::info!("Version detected: {}", version);
            Ok(version)
        }
        None => {
            tracing::warn!("No valid game version found in {:?}", mods_path);
            Err(InstallerError::NoVersionFolder(mods_path))
        }
    }
}
