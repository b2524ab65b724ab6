//! World of Tanks mod installer library
//!
//! Extracts mod archives into a game installation, moving version-specific
//! files into the folder of the installed game version.

pub mod app;
pub mod archive;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config_file;
pub mod error;
pub mod input;
pub mod installer;
pub mod rewrite;
pub mod theme;
pub mod ui;
pub mod version;

// Re-export main types for convenience
pub use archive::{ArchivePreview, ArchiveReport, FileOutcome, PlannedFile};
pub use config_file::{smart_zip_folder, InstallerConfig};
pub use error::{InstallerError, Result};
pub use installer::{spawn_install, BatchSummary, InstallEvent, Installer};
pub use rewrite::{rewrite, Rewrite, RewriteRule};
pub use version::{detect, GameVersion};
