use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config_file::CONFIG_FILE_NAME;

/// wotmods - World of Tanks mod installer
#[derive(Parser, Debug)]
#[command(name = "wotmods")]
#[command(about = "Installs mod archives into the current World of Tanks version folders")]
#[command(version)]
pub struct Cli {
    /// World of Tanks installation directory (defaults to the remembered path)
    #[arg(long, global = true, visible_alias = "wot-path")]
    pub game_path: Option<PathBuf>,

    /// Folder containing the mod archives (defaults to the remembered folder)
    #[arg(long, global = true)]
    pub zip_folder: Option<PathBuf>,

    /// Configuration file remembering the paths
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive installer
    Tui,
    /// List the available archives
    List,
    /// Print the detected game version
    Detect,
    /// Show what would be installed without writing anything
    Preview {
        /// Archive file names inside the zip folder (default: all)
        archives: Vec<String>,
    },
    /// Install archives into the game directory
    Install {
        /// Archive file names inside the zip folder (default: all)
        archives: Vec<String>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// True when the interactive form should be started.
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui))
    }
}
