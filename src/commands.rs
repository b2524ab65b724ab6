//! Headless command execution
//!
//! Implements the `list`, `detect`, `preview` and `install` subcommands.
//! Output goes to a caller-supplied writer and confirmation is read from a
//! caller-supplied reader, so the whole flow runs unchanged under test.
//!
//! Every command returns the process exit status: `0` on success or when
//! the user cancels, `1` when a precondition fails or an archive failed.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;

use crate::archive::{self, ArchivePreview};
use crate::cli::{Cli, Commands};
use crate::config_file::{InstallerConfig, smart_zip_folder};
use crate::installer::Installer;
use crate::version::{self, GameVersion};

/// Answers accepted as "yes" at the confirmation prompt
pub const CONFIRM_ANSWERS: &[&str] = &["y", "yes", "j", "ja"];

/// Prefix a message with the local wall-clock time, `[HH:MM:SS] msg`.
pub fn stamp(message: &str) -> String {
    format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
}

/// True if `answer` is one of [`CONFIRM_ANSWERS`] (case-insensitive).
pub fn is_confirmation(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    CONFIRM_ANSWERS.contains(&answer.as_str())
}

/// Print `prompt` and read one line; EOF counts as "no".
pub fn confirm(prompt: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(is_confirmation(&line))
}

/// Game and archive folders for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub game_path: PathBuf,
    pub zip_folder: PathBuf,
}

impl Paths {
    /// Command-line flags win over the remembered configuration.
    ///
    /// Without a flag or remembered folder the archive folder is derived
    /// from the game path with [`smart_zip_folder`].
    pub fn resolve(cli: &Cli, config: &InstallerConfig) -> Self {
        let game_path = cli
            .game_path
            .clone()
            .unwrap_or_else(|| config.game_path.clone());
        let zip_folder = match (&cli.zip_folder, &config.zip_folder) {
            (Some(folder), _) | (None, Some(folder)) => folder.clone(),
            (None, None) => smart_zip_folder(&game_path, &config.zip_folder_or_cwd()),
        };
        Self {
            game_path,
            zip_folder,
        }
    }
}

/// Run a non-interactive subcommand.
pub fn run(
    command: &Commands,
    paths: &Paths,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<i32> {
    match command {
        Commands::Tui => anyhow::bail!("the interactive installer is not a headless command"),
        Commands::Detect => {
            let Some(version) = detect_version(&paths.game_path, out)? else {
                return Ok(1);
            };
            writeln!(out, "{version}")?;
            Ok(0)
        }
        Commands::List => {
            let Some(archives) = collect_archives(&paths.zip_folder, &[], out)? else {
                return Ok(1);
            };
            print_archive_list(&archives, out)?;
            Ok(0)
        }
        Commands::Preview { archives } => {
            let Some(version) = detect_version(&paths.game_path, out)? else {
                return Ok(1);
            };
            let Some(archives) = collect_archives(&paths.zip_folder, archives, out)? else {
                return Ok(1);
            };
            print_archive_list(&archives, out)?;

            writeln!(out, "\n=== PREVIEW (nothing is installed) ===")?;
            let installer = Installer::new(&paths.game_path, version);
            for preview in installer.preview_all(&archives) {
                print_preview(&preview, out)?;
            }
            Ok(0)
        }
        Commands::Install { archives, yes } => {
            let Some(version) = detect_version(&paths.game_path, out)? else {
                return Ok(1);
            };
            let Some(archives) = collect_archives(&paths.zip_folder, archives, out)? else {
                return Ok(1);
            };
            print_archive_list(&archives, out)?;

            let installer = Installer::new(&paths.game_path, version);
            let [mods, res_mods] = installer.version_folders();
            writeln!(out, "\nGame path: {}", paths.game_path.display())?;
            writeln!(out, "Current version: {}", installer.version())?;
            writeln!(out, "Target folder for mods: {}", mods.display())?;
            writeln!(out, "Target folder for res_mods: {}", res_mods.display())?;

            if !yes {
                let prompt = format!("\nInstall {} mod(s)? (y/N): ", archives.len());
                if !confirm(&prompt, input, out)? {
                    writeln!(out, "Installation cancelled.")?;
                    return Ok(0);
                }
            }

            writeln!(out)?;
            let mut write_error = None;
            let summary = installer.install_all(&archives, |event| {
                if write_error.is_none() {
                    if let Err(e) = writeln!(out, "{}", stamp(&event.log_line())) {
                        write_error = Some(e);
                    }
                }
            });
            if let Some(e) = write_error {
                return Err(e.into());
            }

            writeln!(out, "Succeeded: {}", summary.succeeded)?;
            writeln!(out, "Failed: {}", summary.failed)?;
            Ok(if summary.is_success() { 0 } else { 1 })
        }
    }
}

/// Check the game path and detect its version, reporting problems to `out`.
fn detect_version(game_path: &Path, out: &mut impl Write) -> Result<Option<GameVersion>> {
    if !game_path.is_dir() {
        writeln!(
            out,
            "Error: game path does not exist: {}",
            game_path.display()
        )?;
        return Ok(None);
    }
    match version::detect(game_path) {
        Ok(version) => {
            writeln!(out, "{}", stamp(&format!("Version detected: {version}")))?;
            Ok(Some(version))
        }
        Err(e) => {
            writeln!(out, "Error: {e}")?;
            Ok(None)
        }
    }
}

/// Explicit names are resolved inside `zip_folder`; otherwise all archives.
fn collect_archives(
    zip_folder: &Path,
    names: &[String],
    out: &mut impl Write,
) -> Result<Option<Vec<PathBuf>>> {
    if !zip_folder.is_dir() {
        writeln!(
            out,
            "Error: archive folder does not exist: {}",
            zip_folder.display()
        )?;
        return Ok(None);
    }

    let archives = if names.is_empty() {
        archive::list_archives(zip_folder)
    } else {
        archive::resolve_archives(zip_folder, names)
    };

    match archives {
        Ok(archives) if archives.is_empty() => {
            writeln!(out, "No archives found.")?;
            Ok(None)
        }
        Ok(archives) => Ok(Some(archives)),
        Err(e) => {
            writeln!(out, "Error: {e}")?;
            Ok(None)
        }
    }
}

fn print_archive_list(archives: &[PathBuf], out: &mut impl Write) -> Result<()> {
    writeln!(out, "\nFound archives ({}):", archives.len())?;
    for (i, path) in archives.iter().enumerate() {
        writeln!(out, "  {:2}. {}", i + 1, archive::archive_name(path))?;
    }
    Ok(())
}

/// Render one archive preview as text lines.
pub fn preview_lines(preview: &ArchivePreview) -> Vec<String> {
    let mut lines = vec![format!("Archive: {}", preview.name)];
    if let Some(ref error) = preview.error {
        lines.push(format!("ERROR: {error}"));
    } else if preview.files.is_empty() {
        lines.push("No installable files found.".to_string());
    } else {
        lines.push(format!("Files to install ({}):", preview.files.len()));
        for file in &preview.files {
            if file.changed() {
                lines.push(format!("  {} → {}", file.source, file.target));
            } else {
                lines.push(format!("  {}", file.target));
            }
        }
    }
    lines
}

fn print_preview(preview: &ArchivePreview, out: &mut impl Write) -> Result<()> {
    writeln!(out, "\n{}", "=".repeat(50))?;
    for line in preview_lines(preview) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Entry point used by `main` for headless subcommands.
pub fn run_from_cli(cli: &Cli, command: &Commands) -> Result<i32> {
    let config = InstallerConfig::load_or_default(&cli.config);
    let paths = Paths::resolve(cli, &config);
    tracing::debug!("Resolved paths: {:?}", paths);

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout().lock();
    run(command, &paths, &mut input, &mut out)
}
