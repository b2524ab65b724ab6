//! Tests for archive extraction and batch installation
//!
//! These tests verify:
//! - Version placeholder and version folder rewriting on disk
//! - Overwriting existing files and skipping directory members
//! - Unsafe member paths are skipped, never written
//! - A broken archive fails alone; the batch carries on

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wotmods::archive::{self, FileOutcome};
use wotmods::installer::{spawn_install, InstallEvent, Installer};
use wotmods::version::GameVersion;

// =============================================================================
// Fixtures
// =============================================================================

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(name.trim_end_matches('/'), options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap();
}

/// Game folder with `mods/<version>` and an empty archive folder
fn game_fixture(version: &str) -> (TempDir, TempDir) {
    let game = TempDir::new().unwrap();
    fs::create_dir_all(game.path().join("mods").join(version)).unwrap();
    let zips = TempDir::new().unwrap();
    (game, zips)
}

fn version(v: &str) -> GameVersion {
    v.parse().unwrap()
}

// =============================================================================
// Single archive
// =============================================================================

#[test]
fn test_install_rewrites_placeholder_and_version_folder() {
    let (game, zips) = game_fixture("1.27.0.1");
    let archive = zips.path().join("pack.zip");
    write_zip(
        &archive,
        &[
            ("mods/version/com.example.crosshair.wotmod", b"crosshair"),
            ("res_mods/version/gui/flash/marker.swf", b"marker"),
            ("mods/1.20.0.0/com.example.old.wotmod", b"old"),
            ("mods/configs/example/settings.json", b"{}"),
        ],
    );

    let mut outcomes = Vec::new();
    let report = archive::install(&archive, game.path(), &version("1.27.0.1"), |o| {
        outcomes.push(o)
    })
    .unwrap();

    assert_eq!(report.files_written, 4);
    assert_eq!(report.files_skipped, 0);
    let root = game.path();
    assert_eq!(
        fs::read(root.join("mods/1.27.0.1/com.example.crosshair.wotmod")).unwrap(),
        b"crosshair"
    );
    assert_eq!(
        fs::read(root.join("res_mods/1.27.0.1/gui/flash/marker.swf")).unwrap(),
        b"marker"
    );
    assert!(root.join("mods/1.27.0.1/com.example.old.wotmod").is_file());
    assert!(!root.join("mods/1.20.0.0").exists());
    assert!(root.join("mods/configs/example/settings.json").is_file());

    let unchanged = outcomes
        .iter()
        .filter(|o| matches!(o, FileOutcome::Written { changed: false, .. }))
        .count();
    assert_eq!(unchanged, 1);
}

#[test]
fn test_install_overwrites_existing_files() {
    let (game, zips) = game_fixture("1.0.0.0");
    let target = game.path().join("mods/1.0.0.0/a.wotmod");
    fs::write(&target, b"previous").unwrap();

    let archive = zips.path().join("a.zip");
    write_zip(&archive, &[("mods/version/a.wotmod", b"new")]);
    archive::install(&archive, game.path(), &version("1.0.0.0"), |_| {}).unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"new");
}

#[test]
fn test_directory_members_are_not_files() {
    let (game, zips) = game_fixture("1.0.0.0");
    let archive = zips.path().join("dirs.zip");
    write_zip(
        &archive,
        &[
            ("res_mods/", b""),
            ("res_mods/version/", b""),
            ("res_mods/version/readme.txt", b"hi"),
        ],
    );

    let report = archive::install(&archive, game.path(), &version("1.0.0.0"), |_| {}).unwrap();
    assert_eq!(report.files_written, 1);
    assert!(game.path().join("res_mods/1.0.0.0/readme.txt").is_file());
    assert!(!game.path().join("res_mods/version").exists());
}

#[test]
fn test_unsafe_members_are_skipped() {
    let (game, zips) = game_fixture("1.0.0.0");
    let archive = zips.path().join("evil.zip");
    write_zip(
        &archive,
        &[
            ("../outside.txt", b"nope"),
            ("mods/../../outside2.txt", b"nope"),
            ("./mods/C:/evil.dll", b"nope"),
            ("mods/version/ok.wotmod", b"ok"),
        ],
    );

    let mut skipped = Vec::new();
    let report = archive::install(&archive, game.path(), &version("1.0.0.0"), |o| {
        if let FileOutcome::Skipped { source, .. } = o {
            skipped.push(source);
        }
    })
    .unwrap();

    assert_eq!(report.files_written, 1);
    assert_eq!(report.files_skipped, 3);
    assert_eq!(
        skipped,
        vec!["../outside.txt", "mods/../../outside2.txt", "./mods/C:/evil.dll"]
    );
    let parent = game.path().parent().unwrap();
    assert!(!parent.join("outside.txt").exists());
    assert!(!parent.join("outside2.txt").exists());
}

#[test]
fn test_preview_does_not_write() {
    let (game, zips) = game_fixture("1.0.0.0");
    let archive = zips.path().join("p.zip");
    write_zip(&archive, &[("mods/version/x.wotmod", b"x")]);

    let preview = archive::preview(&archive, &version("1.0.0.0"));
    assert!(preview.error.is_none());
    assert_eq!(preview.files.len(), 1);
    assert_eq!(preview.files[0].target, "mods/1.0.0.0/x.wotmod");
    assert!(preview.files[0].changed());
    assert!(!game.path().join("mods/1.0.0.0/x.wotmod").exists());
}

#[test]
fn test_member_at_current_version_is_not_reported_as_moved() {
    let (game, zips) = game_fixture("1.27.0.1");
    let archive = zips.path().join("current.zip");
    write_zip(&archive, &[("mods/1.27.0.1/a.wotmod", b"a")]);

    let preview = archive::preview(&archive, &version("1.27.0.1"));
    assert_eq!(preview.files[0].target, "mods/1.27.0.1/a.wotmod");
    assert!(!preview.files[0].changed());
    let lines = wotmods::commands::preview_lines(&preview);
    assert!(lines.iter().all(|l| !l.contains('→')));

    let mut outcomes = Vec::new();
    archive::install(&archive, game.path(), &version("1.27.0.1"), |o| outcomes.push(o)).unwrap();
    assert!(matches!(
        outcomes.as_slice(),
        [FileOutcome::Written { changed: false, .. }]
    ));
    assert!(game.path().join("mods/1.27.0.1/a.wotmod").is_file());
}

#[test]
fn test_preview_reports_corrupt_archive() {
    let zips = TempDir::new().unwrap();
    let archive = zips.path().join("broken.zip");
    fs::write(&archive, b"this is not a zip file").unwrap();

    let preview = archive::preview(&archive, &version("1.0.0.0"));
    assert_eq!(preview.name, "broken.zip");
    assert!(preview.files.is_empty());
    assert!(preview.error.is_some());
}

#[test]
fn test_list_archives_sorted_and_filtered() {
    let zips = TempDir::new().unwrap();
    write_zip(&zips.path().join("b.zip"), &[]);
    write_zip(&zips.path().join("A.ZIP"), &[]);
    fs::write(zips.path().join("notes.txt"), b"").unwrap();
    fs::create_dir(zips.path().join("folder.zip")).unwrap();

    let names: Vec<String> = archive::list_archives(zips.path())
        .unwrap()
        .iter()
        .map(|p| archive::archive_name(p))
        .collect();
    assert_eq!(names, vec!["A.ZIP", "b.zip"]);
}

// =============================================================================
// Batches
// =============================================================================

#[test]
fn test_batch_continues_after_broken_archive() {
    let (game, zips) = game_fixture("1.5.0.0");
    let broken = zips.path().join("1_broken.zip");
    fs::write(&broken, b"garbage").unwrap();
    let good = zips.path().join("2_good.zip");
    write_zip(&good, &[("mods/version/good.wotmod", b"good")]);

    let installer = Installer::new(game.path(), version("1.5.0.0"));
    let mut events = Vec::new();
    let summary = installer.install_all(&[broken, good], |e| events.push(e));

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert!(!summary.is_success());
    assert!(game.path().join("mods/1.5.0.0/good.wotmod").is_file());

    let failed: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            InstallEvent::ArchiveFailed { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(failed, vec!["1_broken.zip"]);
    assert!(matches!(events.last(), Some(InstallEvent::BatchFinished(s)) if s.failed == 1));
}

#[test]
fn test_spawned_install_ends_with_batch_finished() {
    let (game, zips) = game_fixture("1.0.0.0");
    let archives: Vec<PathBuf> = (0..3)
        .map(|i| {
            let path = zips.path().join(format!("mod{i}.zip"));
            let name = format!("res_mods/version/file{i}.txt");
            write_zip(&path, &[(name.as_str(), b"data")]);
            path
        })
        .collect();

    let rx = spawn_install(Installer::new(game.path(), version("1.0.0.0")), archives);
    let events: Vec<InstallEvent> = rx.iter().collect();

    assert!(matches!(events.first(), Some(InstallEvent::BatchStarted { total: 3 })));
    match events.last() {
        Some(InstallEvent::BatchFinished(summary)) => {
            assert_eq!(summary.succeeded, 3);
            assert_eq!(summary.reports.len(), 3);
        }
        other => panic!("Expected BatchFinished, got {other:?}"),
    }
    for i in 0..3 {
        assert!(game.path().join(format!("res_mods/1.0.0.0/file{i}.txt")).is_file());
    }
}
