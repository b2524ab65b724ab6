//! Installer module
//!
//! Runs a batch of mod archives through [`crate::archive::install`] and
//! reports progress as [`InstallEvent`]s. A failure inside one archive is
//! caught and counted; the batch always continues with the next archive.
//!
//! The interactive form runs the batch on a single background thread via
//! [`spawn_install`] and polls the returned channel from its event loop.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::archive::{self, ArchivePreview, ArchiveReport, FileOutcome};
use crate::version::GameVersion;

/// Progress messages emitted while a batch is installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent {
    /// Batch accepted, `total` archives queued
    BatchStarted { total: usize },
    /// Archive `index` (0-based) is being extracted
    ArchiveStarted { name: String, index: usize },
    /// A member was written to `target` (relative to the game directory)
    FileWritten {
        source: String,
        target: String,
        changed: bool,
    },
    /// A member was not written because its path is unsafe
    FileSkipped { source: String, reason: String },
    /// Archive extracted without error
    ArchiveFinished(ArchiveReport),
    /// Archive aborted; already written files stay in place
    ArchiveFailed { name: String, error: String },
    /// All archives processed
    BatchFinished(BatchSummary),
}

impl InstallEvent {
    /// Human-readable log line for this event.
    pub fn log_line(&self) -> String {
        match self {
            Self::BatchStarted { total } => {
                format!("=== Installation started ({total} archive(s)) ===")
            }
            Self::ArchiveStarted { name, .. } => format!("Installing: {name}"),
            Self::FileWritten {
                source,
                target,
                changed: true,
            } => format!("  {source} → {target}"),
            Self::FileWritten { target, .. } => format!("  → {target}"),
            Self::FileSkipped { source, reason } => format!("  ⚠ skipped {source}: {reason}"),
            Self::ArchiveFinished(report) => format!("✓ {} installed successfully", report.name),
            Self::ArchiveFailed { name, error } => format!("✗ Error in {name}: {error}"),
            Self::BatchFinished(summary) => format!(
                "=== Installation finished: {} succeeded, {} failed ===",
                summary.succeeded, summary.failed
            ),
        }
    }
}

/// Outcome of a whole batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub reports: Vec<ArchiveReport>,
}

impl BatchSummary {
    /// True if no archive failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Installs archives into one game directory for one game version
#[derive(Debug, Clone)]
pub struct Installer {
    game_dir: PathBuf,
    version: GameVersion,
}

impl Installer {
    /// Create a new installer instance
    pub fn new(game_dir: impl Into<PathBuf>, version: GameVersion) -> Self {
        Self {
            game_dir: game_dir.into(),
            version,
        }
    }

    pub fn game_dir(&self) -> &Path {
        &self.game_dir
    }

    pub fn version(&self) -> &GameVersion {
        &self.version
    }

    /// Target folders that version-specific files end up in.
    pub fn version_folders(&self) -> [PathBuf; 2] {
        [
            self.game_dir.join("mods").join(self.version.as_str()),
            self.game_dir.join("res_mods").join(self.version.as_str()),
        ]
    }

    /// Preview every archive; unreadable archives carry their error.
    pub fn preview_all(&self, archives: &[PathBuf]) -> Vec<ArchivePreview> {
        archives
            .iter()
            .map(|path| archive::preview(path, &self.version))
            .collect()
    }

    /// Install archives in order, reporting progress to `observer`.
    pub fn install_all(
        &self,
        archives: &[PathBuf],
        mut observer: impl FnMut(InstallEvent),
    ) -> BatchSummary {
        tracing::info!(
            "Installing {} archive(s) into {:?} for version {}",
            archives.len(),
            self.game_dir,
            self.version
        );
        observer(InstallEvent::BatchStarted {
            total: archives.len(),
        });

        let mut summary = BatchSummary::default();
        for (index, path) in archives.iter().enumerate() {
            let name = archive::archive_name(path);
            observer(InstallEvent::ArchiveStarted {
                name: name.clone(),
                index,
            });

            let result = archive::install(path, &self.game_dir, &self.version, |outcome| {
                observer(match outcome {
                    FileOutcome::Written {
                        source,
                        target,
                        changed,
                    } => InstallEvent::FileWritten {
                        source,
                        target,
                        changed,
                    },
                    FileOutcome::Skipped { source, reason } => {
                        InstallEvent::FileSkipped { source, reason }
                    }
                })
            });

            match result {
                Ok(report) => {
                    tracing::info!("✓ {} installed ({} files)", name, report.files_written);
                    summary.succeeded += 1;
                    summary.reports.push(report.clone());
                    observer(InstallEvent::ArchiveFinished(report));
                }
                Err(e) => {
                    tracing::error!("✗ {}: {}", name, e);
                    summary.failed += 1;
                    observer(InstallEvent::ArchiveFailed {
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Installation finished: {} succeeded, {} failed",
            summary.succeeded,
            summary.failed
        );
        observer(InstallEvent::BatchFinished(summary.clone()));
        summary
    }
}

/// Run [`Installer::install_all`] on a background thread.
///
/// Events arrive on the returned receiver; the last one is always
/// `BatchFinished`. Sending stops silently if the receiver is dropped.
pub fn spawn_install(installer: Installer, archives: Vec<PathBuf>) -> Receiver<InstallEvent> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        installer.install_all(&archives, |event| {
            // Receiver dropped means the UI is gone; keep extracting anyway
            let _ = tx.send(event);
        });
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_success() {
        let mut summary = BatchSummary::default();
        assert!(summary.is_success());
        summary.failed = 1;
        assert!(!summary.is_success());
    }

    #[test]
    fn test_event_log_lines() {
        let renamed = InstallEvent::FileWritten {
            source: "mods/version/a.wotmod".into(),
            target: "mods/1.0.0.0/a.wotmod".into(),
            changed: true,
        };
        assert_eq!(renamed.log_line(), "  mods/version/a.wotmod → mods/1.0.0.0/a.wotmod");

        let copied = InstallEvent::FileWritten {
            source: "res/x.bnk".into(),
            target: "res/x.bnk".into(),
            changed: false,
        };
        assert_eq!(copied.log_line(), "  → res/x.bnk");

        let failed = InstallEvent::ArchiveFailed {
            name: "bad.zip".into(),
            error: "Archive error: invalid Zip archive".into(),
        };
        assert!(failed.log_line().starts_with("✗ Error in bad.zip"));
    }

    #[test]
    fn test_version_folders() {
        let installer = Installer::new("/games/wot", "1.27.0.1".parse().unwrap());
        let [mods, res_mods] = installer.version_folders();
        assert_eq!(mods, PathBuf::from("/games/wot/mods/1.27.0.1"));
        assert_eq!(res_mods, PathBuf::from("/games/wot/res_mods/1.27.0.1"));
    }

    #[test]
    fn test_missing_archive_counts_as_failure() {
        let installer = Installer::new("/nonexistent/game", "1.0.0.0".parse().unwrap());
        let mut events = Vec::new();
        let summary = installer.install_all(&[PathBuf::from("/nonexistent/mod.zip")], |e| {
            events.push(e)
        });
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 0);
        assert!(matches!(events.first(), Some(InstallEvent::BatchStarted { total: 1 })));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, InstallEvent::ArchiveFailed { name, .. } if name == "mod.zip"))
        );
        assert!(matches!(events.last(), Some(InstallEvent::BatchFinished(_))));
    }
}
