//! Mod archive discovery, preview and extraction
//!
//! Archives are plain ZIP files whose member paths mirror the game folder.
//! Each file member is rewritten with [`crate::rewrite::rewrite`] and written
//! below the game directory. Directory members are skipped; parent folders
//! are created on demand.
//!
//! # Path safety
//!
//! A rewritten member path is only ever written inside the game directory.
//! Both `/` and `\` act as separators, empty and `.` components are dropped,
//! and any path that is absolute, climbs with `..` or has a `:` in any
//! component (drive prefix, stream name) is skipped and reported instead of
//! written.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{InstallerError, Result};
use crate::rewrite::{RewriteRule, rewrite};
use crate::version::GameVersion;

/// Extension (case-insensitive) of installable archives.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// One archive member and where it will land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Member name inside the archive
    pub source: String,
    /// Rewritten path, relative to the game directory
    pub target: String,
    pub rule: RewriteRule,
}

impl PlannedFile {
    /// True when the target differs from the member name.
    pub fn changed(&self) -> bool {
        self.source != self.target
    }
}

/// Dry-run view of a single archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePreview {
    pub name: String,
    pub files: Vec<PlannedFile>,
    /// Set when the archive could not be read; `files` is then empty
    pub error: Option<String>,
}

/// What happened to one archive member during installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Written {
        source: String,
        target: String,
        changed: bool,
    },
    Skipped {
        source: String,
        reason: String,
    },
}

/// Per-archive installation result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    pub name: String,
    pub files_written: usize,
    pub files_skipped: usize,
}

/// Display name of an archive (its file name).
pub fn archive_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// True if the path has the archive extension.
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

/// True for ZIP directory entries (`/` or `\` terminated).
pub fn is_directory_member(name: &str) -> bool {
    name.ends_with('/') || name.ends_with('\\')
}

/// List the archives directly inside `folder`, sorted by file name.
pub fn list_archives(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(InstallerError::ArchiveFolderMissing(folder.to_path_buf()));
    }

    let mut archives = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && is_archive(&path) {
            archives.push(path);
        }
    }
    archives.sort_by_key(|path| archive_name(path));

    tracing::debug!("{} archives found in {:?}", archives.len(), folder);
    Ok(archives)
}

/// Resolve explicitly named archives relative to `folder`.
///
/// Every name must exist; the first missing one is reported.
pub fn resolve_archives(folder: &Path, names: &[String]) -> Result<Vec<PathBuf>> {
    names
        .iter()
        .map(|name| {
            let path = folder.join(name);
            if path.is_file() {
                Ok(path)
            } else {
                Err(InstallerError::ArchiveNotFound(path))
            }
        })
        .collect()
}

/// Map a rewritten member path to a location below `game_dir`.
///
/// Returns the reason as `Err` when the path would escape the game directory.
pub fn resolve_target(game_dir: &Path, member_path: &str) -> std::result::Result<PathBuf, String> {
    if member_path.starts_with('/') || member_path.starts_with('\\') {
        return Err(format!("absolute path: {member_path}"));
    }

    let mut target = game_dir.to_path_buf();
    let mut components = 0;
    for component in member_path.split(['/', '\\']) {
        match component {
            "" | "." => continue,
            ".." => return Err(format!("parent directory reference: {member_path}")),
            // Drive prefixes and alternate data streams, wherever they appear
            c if c.contains(':') => {
                return Err(format!("drive prefix or stream name: {member_path}"));
            }
            c => {
                target.push(c);
                components += 1;
            }
        }
    }

    if components == 0 {
        return Err(format!("empty path: {member_path:?}"));
    }
    Ok(target)
}

fn open_archive(archive: &Path) -> Result<zip::ZipArchive<fs::File>> {
    let file = fs::File::open(archive)?;
    Ok(zip::ZipArchive::new(file)?)
}

/// List what installing `archive` would write, without touching the disk.
pub fn plan(archive: &Path, version: &GameVersion) -> Result<Vec<PlannedFile>> {
    let mut zip = open_archive(archive)?;
    let mut files = Vec::new();

    for i in 0..zip.len() {
        let entry = zip.by_index_raw(i)?;
        let source = entry.name().to_string();
        if is_directory_member(&source) {
            continue;
        }
        let rewritten = rewrite(&source, version);
        files.push(PlannedFile {
            source,
            target: rewritten.path,
            rule: rewritten.rule,
        });
    }

    Ok(files)
}

/// Preview one archive, folding a read failure into the result.
pub fn preview(archive: &Path, version: &GameVersion) -> ArchivePreview {
    let name = archive_name(archive);
    match plan(archive, version) {
        Ok(files) => ArchivePreview {
            name,
            files,
            error: None,
        },
        Err(e) => {
            tracing::warn!("Preview failed for {}: {}", name, e);
            ArchivePreview {
                name,
                files: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// Extract one archive into `game_dir`, rewriting member paths.
///
/// Existing files are overwritten. `on_file` is called for every file member
/// after it has been written or skipped.
pub fn install(
    archive: &Path,
    game_dir: &Path,
    version: &GameVersion,
    mut on_file: impl FnMut(FileOutcome),
) -> Result<ArchiveReport> {
    let mut report = ArchiveReport {
        name: archive_name(archive),
        ..Default::default()
    };
    let mut zip = open_archive(archive)?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let source = entry.name().to_string();
        if is_directory_member(&source) {
            continue;
        }

        let rewritten = rewrite(&source, version);
        let target = match resolve_target(game_dir, &rewritten.path) {
            Ok(target) => target,
            Err(reason) => {
                tracing::warn!("Skipping unsafe member in {}: {}", report.name, reason);
                report.files_skipped += 1;
                on_file(FileOutcome::Skipped { source, reason });
                continue;
            }
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&target)?;
        io::copy(&mut entry, &mut out)?;

        report.files_written += 1;
        tracing::debug!("{} -> {:?}", source, target);
        on_file(FileOutcome::Written {
            changed: rewritten.changed(),
            source,
            target: rewritten.path,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_archive_case_insensitive() {
        assert!(is_archive(Path::new("mod.zip")));
        assert!(is_archive(Path::new("MOD.ZIP")));
        assert!(!is_archive(Path::new("mod.7z")));
        assert!(!is_archive(Path::new("zip")));
    }

    #[test]
    fn test_directory_members() {
        assert!(is_directory_member("mods/version/"));
        assert!(is_directory_member("mods\\version\\"));
        assert!(!is_directory_member("mods/version/x.wotmod"));
    }

    #[test]
    fn test_resolve_target_mixed_separators() {
        let game = Path::new("/games/wot");
        let target = resolve_target(game, "res_mods\\1.0.0.0/gui\\x.xml").unwrap();
        assert_eq!(target, PathBuf::from("/games/wot/res_mods/1.0.0.0/gui/x.xml"));
    }

    #[test]
    fn test_resolve_target_drops_empty_and_dot() {
        let game = Path::new("/games/wot");
        let target = resolve_target(game, "mods//./configs/x.json").unwrap();
        assert_eq!(target, PathBuf::from("/games/wot/mods/configs/x.json"));
    }

    #[test]
    fn test_resolve_target_rejects_escapes() {
        let game = Path::new("/games/wot");
        assert!(resolve_target(game, "../evil.txt").is_err());
        assert!(resolve_target(game, "mods/../../evil.txt").is_err());
        assert!(resolve_target(game, "/etc/passwd").is_err());
        assert!(resolve_target(game, "\\Windows\\x.dll").is_err());
        assert!(resolve_target(game, "C:\\Windows\\x.dll").is_err());
        assert!(resolve_target(game, "./").is_err());
    }

    #[test]
    fn test_resolve_target_rejects_colon_in_any_component() {
        let game = Path::new("/games/wot");
        assert!(resolve_target(game, "./C:\\Windows\\evil.dll").is_err());
        assert!(resolve_target(game, ".//C:/Windows/evil.dll").is_err());
        assert!(resolve_target(game, "mods/C:/x").is_err());
        assert!(resolve_target(game, "mods/1.0.0.0/a.wotmod:stream").is_err());
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(archive_name(Path::new("/tmp/x/cool_mod.zip")), "cool_mod.zip");
    }
}
