//! Error handling module for the mod installer
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Library operations return these types; the binary wraps them in anyhow.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the mod installer
#[derive(Error, Debug)]
pub enum InstallerError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container errors (corrupt archive, unsupported compression)
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The game installation directory does not exist
    #[error("Game path does not exist: {}", .0.display())]
    GamePathMissing(PathBuf),

    /// `<game>/mods` does not exist, so no version can be detected
    #[error("Mods folder not found: {}", .0.display())]
    ModsFolderMissing(PathBuf),

    /// `<game>/mods` holds no `a.b.c.d` folder
    #[error("No valid game version found in {}", .0.display())]
    NoVersionFolder(PathBuf),

    /// A string could not be parsed as a four-part game version
    #[error("Invalid game version: {0}")]
    InvalidVersion(String),

    /// The folder holding mod archives does not exist
    #[error("Archive folder does not exist: {}", .0.display())]
    ArchiveFolderMissing(PathBuf),

    /// An explicitly requested archive does not exist
    #[error("Archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),
}

/// Result type alias for installer operations
pub type Result<T> = std::result::Result<T, InstallerError>;

impl InstallerError {
    /// True for errors that mean "no usable game version".
    pub fn is_version_error(&self) -> bool {
        matches!(
            self,
            Self::ModsFolderMissing(_) | Self::NoVersionFolder(_) | Self::InvalidVersion(_)
        )
    }
}
