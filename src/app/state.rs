//! Application state definitions
//!
//! Everything the interactive form shows lives in [`AppState`]. The event
//! loop in `app/mod.rs` maps keys to the methods here, so the behavior can
//! be tested without a terminal.

use std::collections::VecDeque;
use std::path::PathBuf;

use strum::Display;

use crate::archive;
use crate::commands::{preview_lines, stamp};
use crate::config_file::{smart_zip_folder, InstallerConfig};
use crate::error::InstallerError;
use crate::input::{InputDialog, PathField};
use crate::installer::{BatchSummary, InstallEvent, Installer};
use crate::theme::UiConstants;
use crate::version::{self, GameVersion};

/// Application operating modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum AppMode {
    /// Archive list with the header and log
    #[strum(serialize = "Archive selection")]
    Browse,
    /// Text entry for the game path or archive folder
    #[strum(serialize = "Edit path")]
    EditPath,
    /// Scrollable preview of the selected archives
    #[strum(serialize = "Preview")]
    Preview,
    /// Yes/no dialog before writing into the game folder
    #[strum(serialize = "Confirm installation")]
    ConfirmInstall,
    /// Background install running
    #[strum(serialize = "Installing")]
    Installing,
    /// Result popup after a batch
    #[strum(serialize = "Summary")]
    Summary,
}

/// One archive in the selection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub path: PathBuf,
    pub selected: bool,
}

/// Progress of the running batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallProgress {
    pub total: usize,
    pub done: usize,
    pub current: Option<String>,
}

impl InstallProgress {
    /// Fraction of archives processed, `0.0..=1.0`
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.done as f64 / self.total as f64).min(1.0)
        }
    }
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current application mode
    pub mode: AppMode,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Where the remembered paths are saved
    pub config_path: PathBuf,
    /// Unknown config keys, written back unchanged
    config_extra: serde_json::Map<String, serde_json::Value>,
    pub game_path: PathBuf,
    pub zip_folder: PathBuf,
    /// Detected game version
    pub version: Option<GameVersion>,
    /// Why detection failed, shown instead of a version
    pub version_error: Option<String>,
    pub archives: Vec<ArchiveEntry>,
    /// Highlighted row in the archive list
    pub cursor: usize,
    /// Timestamped log lines, oldest first
    pub log: VecDeque<String>,
    /// Lines scrolled up from the bottom of the log
    pub log_scroll: usize,
    /// Status message for user feedback
    pub status_message: String,
    pub input: Option<InputDialog>,
    pub preview: Vec<String>,
    pub preview_scroll: usize,
    /// Focused confirm button, `true` is "Install"
    pub confirm_install: bool,
    pub progress: InstallProgress,
    pub summary: Option<BatchSummary>,
}

impl AppState {
    /// Build the state from remembered paths.
    pub fn new(config_path: impl Into<PathBuf>, config: &InstallerConfig) -> Self {
        let zip_folder = config
            .zip_folder
            .clone()
            .unwrap_or_else(|| smart_zip_folder(&config.game_path, &config.zip_folder_or_cwd()));
        Self {
            mode: AppMode::Browse,
            help_visible: false,
            config_path: config_path.into(),
            config_extra: config.extra.clone(),
            game_path: config.game_path.clone(),
            zip_folder,
            version: None,
            version_error: None,
            archives: Vec::new(),
            cursor: 0,
            log: VecDeque::new(),
            log_scroll: 0,
            status_message: "Select archives and press I to install".to_string(),
            input: None,
            preview: Vec::new(),
            preview_scroll: 0,
            confirm_install: false,
            progress: InstallProgress::default(),
            summary: None,
        }
    }

    /// Detect the version and list archives for the initial paths.
    pub fn initialize(&mut self) {
        self.push_log("WoT mod installer started");
        self.detect_version();
        self.refresh_archives();
    }

    /// Paths in their saved form
    pub fn config(&self) -> InstallerConfig {
        InstallerConfig {
            game_path: self.game_path.clone(),
            zip_folder: Some(self.zip_folder.clone()),
            extra: self.config_extra.clone(),
        }
    }

    fn save_config(&self) {
        self.config().save_or_warn(&self.config_path);
    }

    /// Append a timestamped line, dropping the oldest beyond capacity.
    pub fn push_log(&mut self, message: &str) {
        if self.log.len() >= UiConstants::LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(stamp(message));
    }

    pub fn scroll_log(&mut self, delta: isize) {
        let max = self.log.len().saturating_sub(1);
        self.log_scroll = self.log_scroll.saturating_add_signed(delta).min(max);
    }

    // =========================================================================
    // Version and archives
    // =========================================================================

    pub fn detect_version(&mut self) {
        let result = if self.game_path.is_dir() {
            version::detect(&self.game_path)
        } else {
            Err(InstallerError::GamePathMissing(self.game_path.clone()))
        };

        match result {
            Ok(version) => {
                self.push_log(&format!("Version detected: {version}"));
                self.status_message = format!("Game version {version}");
                self.version = Some(version);
                self.version_error = None;
            }
            Err(e) => {
                self.push_log(&format!("Error: {e}"));
                self.status_message = if e.is_version_error() {
                    "No game version detected".to_string()
                } else {
                    "Check the game path (G)".to_string()
                };
                self.version = None;
                self.version_error = Some(e.to_string());
            }
        }
    }

    /// Reload the archive list, keeping selections of archives still present.
    pub fn refresh_archives(&mut self) {
        let previous: Vec<String> = self
            .archives
            .iter()
            .filter(|a| a.selected)
            .map(|a| a.name.clone())
            .collect();

        match archive::list_archives(&self.zip_folder) {
            Ok(paths) => {
                self.archives = paths
                    .into_iter()
                    .map(|path| {
                        let name = archive::archive_name(&path);
                        ArchiveEntry {
                            selected: previous.contains(&name),
                            name,
                            path,
                        }
                    })
                    .collect();
                self.push_log(&format!("{} archive(s) found", self.archives.len()));
            }
            Err(e) => {
                self.archives.clear();
                self.push_log(&format!("Error: {e}"));
            }
        }
        self.cursor = self.cursor.min(self.archives.len().saturating_sub(1));
    }

    /// Change the game folder, derive its archive folder and save.
    pub fn set_game_path(&mut self, path: impl Into<PathBuf>) {
        self.game_path = path.into();
        self.zip_folder = smart_zip_folder(&self.game_path, &self.zip_folder);
        self.push_log(&format!("Game path: {}", self.game_path.display()));
        self.detect_version();
        self.refresh_archives();
        self.save_config();
    }

    pub fn set_zip_folder(&mut self, path: impl Into<PathBuf>) {
        self.zip_folder = path.into();
        self.push_log(&format!("Archive folder: {}", self.zip_folder.display()));
        self.refresh_archives();
        self.save_config();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn move_cursor(&mut self, delta: isize) {
        if self.archives.is_empty() {
            return;
        }
        let last = self.archives.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.archives.len().saturating_sub(1);
    }

    pub fn toggle_current(&mut self) {
        if let Some(entry) = self.archives.get_mut(self.cursor) {
            entry.selected = !entry.selected;
        }
    }

    pub fn select_all(&mut self) {
        self.archives.iter_mut().for_each(|a| a.selected = true);
    }

    pub fn select_none(&mut self) {
        self.archives.iter_mut().for_each(|a| a.selected = false);
    }

    pub fn selected_archives(&self) -> Vec<PathBuf> {
        self.archives
            .iter()
            .filter(|a| a.selected)
            .map(|a| a.path.clone())
            .collect()
    }

    /// Installer for the current selection, or `None` after setting a status.
    fn ready_installer(&mut self) -> Option<(Installer, Vec<PathBuf>)> {
        if self.mode == AppMode::Installing {
            self.status_message = "An installation is already running".to_string();
            return None;
        }
        let Some(version) = self.version.clone() else {
            self.status_message = "No valid game version detected".to_string();
            return None;
        };
        let selected = self.selected_archives();
        if selected.is_empty() {
            self.status_message = "Please select at least one archive".to_string();
            return None;
        }
        Some((Installer::new(&self.game_path, version), selected))
    }

    // =========================================================================
    // Dialogs
    // =========================================================================

    pub fn open_path_editor(&mut self, field: PathField) {
        let current = match field {
            PathField::GamePath => self.game_path.display().to_string(),
            PathField::ZipFolder => self.zip_folder.display().to_string(),
        };
        self.input = Some(InputDialog::new(field, current));
        self.mode = AppMode::EditPath;
    }

    /// Apply or discard the path dialog and return to the list.
    pub fn close_path_editor(&mut self, value: Option<String>) {
        let field = self.input.take().map(|d| d.field);
        self.mode = AppMode::Browse;
        let (Some(field), Some(value)) = (field, value) else {
            return;
        };
        if value.is_empty() {
            self.status_message = "Path unchanged".to_string();
            return;
        }
        match field {
            PathField::GamePath => self.set_game_path(value),
            PathField::ZipFolder => self.set_zip_folder(value),
        }
    }

    pub fn open_preview(&mut self) {
        let Some((installer, archives)) = self.ready_installer() else {
            return;
        };
        let mut lines = Vec::new();
        for preview in installer.preview_all(&archives) {
            lines.push("=".repeat(50));
            lines.extend(preview_lines(&preview));
            lines.push(String::new());
        }
        self.preview = lines;
        self.preview_scroll = 0;
        self.mode = AppMode::Preview;
    }

    pub fn scroll_preview(&mut self, delta: isize) {
        let max = self.preview.len().saturating_sub(1);
        self.preview_scroll = self.preview_scroll.saturating_add_signed(delta).min(max);
    }

    pub fn preview_end(&mut self) {
        self.preview_scroll = self.preview.len().saturating_sub(1);
    }

    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Browse;
    }

    /// Ask before installing; guard failures leave the mode unchanged.
    pub fn request_install(&mut self) {
        if self.ready_installer().is_some() {
            self.confirm_install = true;
            self.mode = AppMode::ConfirmInstall;
        }
    }

    /// Lines for the confirm dialog
    pub fn confirm_message(&self) -> Vec<String> {
        let count = self.archives.iter().filter(|a| a.selected).count();
        let version = self
            .version
            .as_ref()
            .map(GameVersion::as_str)
            .unwrap_or("?");
        vec![
            format!("Install {count} mod(s) for version {version}?"),
            format!("Into: {}", self.game_path.display()),
        ]
    }

    /// Leave the confirm dialog; returns the work to start if confirmed.
    pub fn answer_confirm(&mut self, install: bool) -> Option<(Installer, Vec<PathBuf>)> {
        self.mode = AppMode::Browse;
        if !install {
            self.status_message = "Installation cancelled".to_string();
            return None;
        }
        let work = self.ready_installer()?;
        self.mode = AppMode::Installing;
        self.progress = InstallProgress {
            total: work.1.len(),
            done: 0,
            current: None,
        };
        self.summary = None;
        self.log_scroll = 0;
        self.status_message = "Installing...".to_string();
        Some(work)
    }

    // =========================================================================
    // Installation
    // =========================================================================

    /// Record one progress event; returns `true` once the batch is done.
    pub fn apply_event(&mut self, event: InstallEvent) -> bool {
        self.push_log(&event.log_line());
        match event {
            InstallEvent::BatchStarted { total } => {
                self.progress.total = total;
                false
            }
            InstallEvent::ArchiveStarted { name, index } => {
                self.progress.done = index;
                self.status_message = format!("Installing {name}");
                self.progress.current = Some(name);
                false
            }
            InstallEvent::ArchiveFinished(_) | InstallEvent::ArchiveFailed { .. } => {
                self.progress.done += 1;
                false
            }
            InstallEvent::FileWritten { .. } | InstallEvent::FileSkipped { .. } => false,
            InstallEvent::BatchFinished(summary) => {
                self.progress.done = self.progress.total;
                self.progress.current = None;
                self.status_message = format!(
                    "Installation finished: {} succeeded, {} failed",
                    summary.succeeded, summary.failed
                );
                self.summary = Some(summary);
                self.mode = AppMode::Summary;
                true
            }
        }
    }

    /// The worker went away without reporting the end of the batch.
    pub fn install_aborted(&mut self) {
        self.push_log("✗ Installation worker stopped unexpectedly");
        self.status_message = "Installation aborted".to_string();
        self.progress.current = None;
        self.mode = AppMode::Browse;
    }

    pub fn can_quit(&mut self) -> bool {
        if self.mode == AppMode::Installing {
            self.status_message = "Please wait until the installation has finished".to_string();
            return false;
        }
        true
    }

    /// Version text for the header
    pub fn version_label(&self) -> String {
        match (&self.version, &self.version_error) {
            (Some(version), _) => version.to_string(),
            (None, Some(error)) => error.clone(),
            (None, None) => "Not detected".to_string(),
        }
    }

    /// Target folders shown in the header, if a version is known
    pub fn target_folders(&self) -> Option<[PathBuf; 2]> {
        let version = self.version.clone()?;
        Some(Installer::new(&self.game_path, version).version_folders())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn state_with(names: &[&str]) -> AppState {
        let mut state = AppState::new("unused.json", &InstallerConfig::default());
        state.archives = names
            .iter()
            .map(|n| ArchiveEntry {
                name: n.to_string(),
                path: PathBuf::from(n),
                selected: false,
            })
            .collect();
        state
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut state = state_with(&["a.zip", "b.zip", "c.zip"]);
        state.move_cursor(-1);
        assert_eq!(state.cursor, 0);
        state.move_cursor(10);
        assert_eq!(state.cursor, 2);
        state.cursor_home();
        assert_eq!(state.cursor, 0);
        state.cursor_end();
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn test_selection_helpers() {
        let mut state = state_with(&["a.zip", "b.zip"]);
        state.toggle_current();
        assert_eq!(state.selected_archives(), vec![PathBuf::from("a.zip")]);
        state.select_all();
        assert_eq!(state.selected_archives().len(), 2);
        state.select_none();
        assert!(state.selected_archives().is_empty());
    }

    #[test]
    fn test_install_guards() {
        let mut state = state_with(&["a.zip"]);
        state.request_install();
        assert_eq!(state.mode, AppMode::Browse);
        assert_eq!(state.status_message, "No valid game version detected");

        state.version = Some("1.0.0.0".parse().unwrap());
        state.request_install();
        assert_eq!(state.mode, AppMode::Browse);
        assert_eq!(state.status_message, "Please select at least one archive");

        state.select_all();
        state.request_install();
        assert_eq!(state.mode, AppMode::ConfirmInstall);
        assert!(state.answer_confirm(false).is_none());
        assert_eq!(state.mode, AppMode::Browse);
    }

    #[test]
    fn test_log_is_capped_and_stamped() {
        let mut state = state_with(&[]);
        for i in 0..UiConstants::LOG_CAPACITY + 5 {
            state.push_log(&format!("line {i}"));
        }
        assert_eq!(state.log.len(), UiConstants::LOG_CAPACITY);
        assert!(state.log.front().unwrap().ends_with("] line 5"));
    }

    #[test]
    fn test_quit_refused_while_installing() {
        let mut state = state_with(&[]);
        assert!(state.can_quit());
        state.mode = AppMode::Installing;
        assert!(!state.can_quit());
    }

    #[test]
    fn test_apply_events_tracks_progress() {
        let mut state = state_with(&[]);
        state.mode = AppMode::Installing;
        assert!(!state.apply_event(InstallEvent::BatchStarted { total: 2 }));
        state.apply_event(InstallEvent::ArchiveStarted {
            name: "a.zip".into(),
            index: 0,
        });
        assert_eq!(state.progress.current.as_deref(), Some("a.zip"));
        state.apply_event(InstallEvent::ArchiveFailed {
            name: "a.zip".into(),
            error: "bad".into(),
        });
        assert_eq!(state.progress.done, 1);
        assert!((state.progress.ratio() - 0.5).abs() < f64::EPSILON);

        let summary = BatchSummary {
            succeeded: 1,
            failed: 1,
            reports: vec![],
        };
        assert!(state.apply_event(InstallEvent::BatchFinished(summary)));
        assert_eq!(state.mode, AppMode::Summary);
        assert_eq!(state.summary.as_ref().map(|s| s.failed), Some(1));
    }

    #[test]
    fn test_refresh_keeps_selection_by_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.zip"), b"").unwrap();
        fs::write(dir.path().join("b.zip"), b"").unwrap();
        let mut state = state_with(&[]);
        state.zip_folder = dir.path().to_path_buf();
        state.refresh_archives();
        assert_eq!(state.archives.len(), 2);
        state.cursor = 1;
        state.toggle_current();

        fs::remove_file(dir.path().join("a.zip")).unwrap();
        state.refresh_archives();
        assert_eq!(state.archives.len(), 1);
        assert!(state.archives[0].selected);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_set_game_path_detects_and_saves() {
        let game = TempDir::new().unwrap();
        fs::create_dir_all(game.path().join("mods").join("1.27.0.1")).unwrap();
        let config_dir = TempDir::new().unwrap();
        let config_path = config_dir.path().join("installer_config.json");

        let mut state = AppState::new(&config_path, &InstallerConfig::default());
        state.set_game_path(game.path());

        assert_eq!(state.version_label(), "1.27.0.1");
        assert_eq!(state.zip_folder, game.path().join("Custom_Mods"));
        let saved = InstallerConfig::load_from_file(&config_path).unwrap();
        assert_eq!(saved.game_path, game.path());
        assert_eq!(saved.zip_folder, Some(game.path().join("Custom_Mods")));
    }

    #[test]
    fn test_saving_paths_keeps_unknown_keys() {
        let game = TempDir::new().unwrap();
        let config_dir = TempDir::new().unwrap();
        let config_path = config_dir.path().join("installer_config.json");
        fs::write(&config_path, r#"{"wot_path": "/old", "language": "de"}"#).unwrap();

        let config = InstallerConfig::load_from_file(&config_path).unwrap();
        let mut state = AppState::new(&config_path, &config);
        state.set_game_path(game.path());

        let saved = InstallerConfig::load_from_file(&config_path).unwrap();
        assert_eq!(saved.game_path, game.path());
        assert_eq!(saved.extra["language"], "de");
    }

    #[test]
    fn test_missing_game_path_reports_error() {
        let mut state = state_with(&[]);
        state.game_path = PathBuf::from("/definitely/not/a/game");
        state.detect_version();
        assert!(state.version.is_none());
        assert!(state.version_label().starts_with("Game path does not exist"));
    }
}
