/*!
 * Configuration handling for clipfiles
 */

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

use crate::error::{Result, ResultExt};
use crate::types::WorkspaceRoot;

/// Persisted copy toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Copy the contents of open files
    pub copy_content: bool,
    /// Copy the tree of open files
    pub copy_structure: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            copy_content: true,
            copy_structure: true,
        }
    }
}

/// One of the two persisted flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Toggle {
    /// File contents
    Content,
    /// File tree
    Structure,
}

impl Settings {
    /// Load settings from `path`. A missing or unreadable file yields the
    /// defaults.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No settings at {}: {}", path.display(), e);
                return Self::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring malformed settings {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Write settings to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        crate::ensure!(
            path.file_name().is_some(),
            Config,
            "Settings path is not a file: {}",
            path.display()
        );
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Flip one flag
    pub fn toggle(&mut self, which: Toggle) {
        match which {
            Toggle::Content => self.copy_content = !self.copy_content,
            Toggle::Structure => self.copy_structure = !self.copy_structure,
        }
    }

    /// Default settings location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("clipfiles")
            .join("settings.json")
    }
}

/// Command-line arguments for clipfiles
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "clipfiles",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copy open files, directory layouts and compact path listings for LLM context",
    long_about = "Turns a set of file paths (or a folder) into text meant to be pasted into a Large Language Model prompt: ASCII trees, file contents, compact brace notation, and Import Lists that can be read back later."
)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Option<Command>,

    /// Copy output to the system clipboard instead of printing it
    #[clap(long, global = true, help = "Copy output to system clipboard")]
    pub clip: bool,

    /// Path to the settings file
    #[clap(long, global = true, value_name = "FILE")]
    pub settings: Option<String>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Copy the directory structure of a folder
    Tree {
        /// Folder to describe
        #[clap(default_value = ".")]
        directory: String,
    },

    /// Copy the tree and/or contents of a set of open files
    Files {
        /// Files to copy (read from stdin, one per line, when omitted)
        paths: Vec<String>,

        /// Workspace folder the files belong to
        #[clap(long)]
        workspace: Option<String>,

        /// Override the persisted content toggle
        #[clap(long)]
        content: Option<bool>,

        /// Override the persisted structure toggle
        #[clap(long)]
        structure: Option<bool>,
    },

    /// Print paths in compact brace notation
    Compact {
        /// Paths to compact (read from stdin when omitted)
        paths: Vec<String>,

        /// Workspace folder; its name labels every relative token
        #[clap(long)]
        workspace: Option<String>,
    },

    /// Serialize paths as an Import List
    Export {
        /// Paths to export (read from stdin when omitted)
        paths: Vec<String>,

        /// Workspace folder to make paths relative to
        #[clap(long)]
        workspace: Option<String>,
    },

    /// Read an Import List and print the files that exist
    Import {
        /// Import List text (read from the clipboard with --clip, else stdin)
        text: Option<String>,

        /// Workspace folders to resolve `root:` names against
        #[clap(long = "workspace")]
        workspaces: Vec<String>,
    },

    /// Show or change the persisted copy options
    Options {
        /// Flip one option and exit
        #[clap(long, value_enum)]
        toggle: Option<Toggle>,

        /// Open files the panel acts on
        paths: Vec<String>,

        /// Workspace folder the files belong to
        #[clap(long)]
        workspace: Option<String>,
    },
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// What to do
    pub command: Command,

    /// Copy output to clipboard
    pub clip: bool,

    /// Settings file location
    pub settings_path: PathBuf,

    /// Debug logging requested
    pub verbose: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            command: args.command.unwrap_or(Command::Options {
                toggle: None,
                paths: Vec::new(),
                workspace: None,
            }),
            clip: args.clip,
            settings_path: args
                .settings
                .map(PathBuf::from)
                .unwrap_or_else(Settings::default_path),
            verbose: args.verbose,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Tree { directory } => {
                let path = Path::new(directory);
                crate::ensure!(
                    path.is_dir(),
                    PathNotFound,
                    "Target directory not found: {}",
                    path.display()
                );
            }
            Command::Files { workspace, .. }
            | Command::Compact { workspace, .. }
            | Command::Export { workspace, .. }
            | Command::Options { workspace, .. } => {
                if let Some(ws) = workspace {
                    validate_workspace(ws)?;
                }
            }
            Command::Import { workspaces, .. } => {
                for ws in workspaces {
                    validate_workspace(ws)?;
                }
            }
        }
        Ok(())
    }
}

fn validate_workspace(dir: &str) -> Result<()> {
    crate::ensure!(
        Path::new(dir).is_dir(),
        PathNotFound,
        "Workspace folder not found: {}",
        dir
    );
    Ok(())
}

/// Build a workspace root from a folder argument, made absolute
pub fn workspace_root(dir: &str) -> Result<WorkspaceRoot> {
    let path = fs::canonicalize(dir).with_context(|| format!("Resolving workspace {}", dir))?;
    Ok(WorkspaceRoot::from_path(path))
}
