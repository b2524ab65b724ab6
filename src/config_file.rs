//! Remembered paths, saved between runs as JSON.
//!
//! The file is small and forgiving: unknown keys are kept and written back
//! on save, missing keys take their defaults, and a broken file is logged
//! and replaced by the defaults instead of stopping the program.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name, relative to the working directory
pub const CONFIG_FILE_NAME: &str = "installer_config.json";

/// Game installation used when nothing has been configured yet
pub const DEFAULT_GAME_PATH: &str = "G:\\Games\\World_of_Tanks_EU";

/// Folder of a third-party modpack; custom mods go below it when present
pub const MODPACK_DIR: &str = "Aslain_Modpack";
const MODPACK_CUSTOM_DIR: &str = "Custom_mods";
const CUSTOM_MODS_DIR: &str = "Custom_Mods";

/// Paths the installer remembers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    #[serde(rename = "wot_path")]
    pub game_path: PathBuf,
    /// `None` until the user has picked or been given a folder
    pub zip_folder: Option<PathBuf>,
    /// Keys this version does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            game_path: PathBuf::from(DEFAULT_GAME_PATH),
            zip_folder: None,
            extra: Map::new(),
        }
    }
}

impl InstallerConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Load the file if it exists, falling back to defaults on any problem.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No configuration at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load_from_file(path) {
            Ok(config) => {
                tracing::info!("Loaded configuration from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load configuration: {:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save, logging instead of failing.
    pub fn save_or_warn<P: AsRef<Path>>(&self, path: P) {
        if let Err(e) = self.save_to_file(&path) {
            tracing::warn!("Failed to save configuration: {:#}", e);
        }
    }

    /// Remembered archive folder, or the current directory.
    pub fn zip_folder_or_cwd(&self) -> PathBuf {
        self.zip_folder
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Pick the folder mod archives are expected in for a game installation.
///
/// - `<game>/Aslain_Modpack/Custom_mods` when the modpack is installed
/// - `<game>/Custom_Mods` otherwise
///
/// The folder is created if missing. When the game path does not exist or
/// the folder cannot be created, `fallback` is returned.
pub fn smart_zip_folder(game_path: &Path, fallback: &Path) -> PathBuf {
    if !game_path.is_dir() {
        return fallback.to_path_buf();
    }

    let modpack = game_path.join(MODPACK_DIR);
    let folder = if modpack.is_dir() {
        modpack.join(MODPACK_CUSTOM_DIR)
    } else {
        game_path.join(CUSTOM_MODS_DIR)
    };

    if !folder.exists() {
        match fs::create_dir_all(&folder) {
            Ok(()) => tracing::info!("Created custom mods folder: {:?}", folder),
            Err(e) => {
                tracing::warn!("Failed to create {:?}: {}", folder, e);
                return fallback.to_path_buf();
            }
        }
    }

    folder
}
