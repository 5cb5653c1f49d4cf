/*!
 * Clipboard support for clipfiles
 *
 * Copies output to, and reads Import Lists from, the system clipboard
 * with automatic detection of available clipboard mechanisms.
 */

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::debug;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Trait for clipboard operations
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;

    /// Read the current clipboard text
    fn read_from_clipboard(&self) -> Result<String>;
}

/// Available clipboard providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipboardProvider {
    /// tmux paste buffer
    Tmux,
    /// X11 clipboard with xclip
    Xclip,
    /// X11 clipboard with xsel
    Xsel,
    /// Wayland clipboard
    Wayland,
    /// macOS clipboard
    MacOS,
    /// Windows clipboard (via WSL)
    Wsl,
    /// Termux clipboard
    Termux,
}

impl ClipboardProvider {
    /// Command and arguments that write stdin to the clipboard
    fn copy_command(self) -> (&'static str, Vec<&'static str>) {
        match self {
            Self::Tmux => ("tmux", vec!["load-buffer", "-w", "-"]),
            Self::Xclip => ("xclip", vec!["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", vec!["-b", "-i"]),
            Self::Wayland => ("wl-copy", vec![]),
            Self::MacOS => ("pbcopy", vec![]),
            Self::Wsl => ("clip.exe", vec![]),
            Self::Termux => ("termux-clipboard-set", vec![]),
        }
    }

    /// Command and arguments that print the clipboard to stdout
    fn paste_command(self) -> (&'static str, Vec<&'static str>) {
        match self {
            Self::Tmux => ("tmux", vec!["save-buffer", "-"]),
            Self::Xclip => ("xclip", vec!["-selection", "clipboard", "-out"]),
            Self::Xsel => ("xsel", vec!["-b", "-o"]),
            Self::Wayland => ("wl-paste", vec!["--no-newline"]),
            Self::MacOS => ("pbpaste", vec![]),
            Self::Wsl => ("powershell.exe", vec!["-NoProfile", "-Command", "Get-Clipboard"]),
            Self::Termux => ("termux-clipboard-get", vec![]),
        }
    }
}

impl Clipboard for ClipboardProvider {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (cmd, args) = self.copy_command();
        execute_copy_command(cmd, &args, text)
    }

    fn read_from_clipboard(&self) -> Result<String> {
        let (cmd, args) = self.paste_command();
        execute_paste_command(cmd, &args)
    }
}

//--------------------------------------------------------------------
// Public API
//--------------------------------------------------------------------

/// Copy text to the clipboard
///
/// Automatically detects the most appropriate clipboard mechanism
/// and uses it to copy text to the system clipboard.
///
/// # Examples
/// ```no_run
/// use clipfiles::clipboard::copy_to_clipboard;
///
/// if let Err(e) = copy_to_clipboard("Hello, clipboard!") {
///     eprintln!("Failed to copy to clipboard: {}", e);
/// }
/// ```
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let clipboard = get_clipboard(Direction::Copy)?;
    clipboard.copy_to_clipboard(text)
}

/// Read text from the clipboard
pub fn read_from_clipboard() -> Result<String> {
    let clipboard = get_clipboard(Direction::Paste)?;
    clipboard.read_from_clipboard()
}

/// Check if a command exists on the system
pub fn command_exists(command: &str) -> bool {
    // First check if the command exists in the PATH
    if let Ok(paths) = env::var("PATH") {
        for path in env::split_paths(&paths) {
            if Path::new(&path).join(command).exists() {
                return true;
            }
        }
    }

    // Try to run the command with '--version' flag as fallback
    Command::new(command)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

//--------------------------------------------------------------------
// Internal Implementation
//--------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Copy,
    Paste,
}

/// Get the first usable clipboard implementation for this system
fn get_clipboard(direction: Direction) -> Result<Box<dyn Clipboard>> {
    determine_clipboard_providers(direction)
        .into_iter()
        .next()
        .map(|provider| {
            debug!("Using clipboard provider {:?}", provider);
            Box::new(provider) as Box<dyn Clipboard>
        })
        .ok_or(ClipboardError::NoClipboardFound)
}

/// Spawn `cmd`, feed `text` to its stdin and wait for it
fn execute_copy_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to spawn {}", cmd)))?;

    let stdin = child.stdin.as_mut().ok_or_else(|| {
        ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
    })?;

    stdin
        .write_all(text.as_bytes())
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to write to {}", cmd)))?;

    let status = child
        .wait()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to wait for {}", cmd)))?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

/// Run `cmd` and capture its stdout as text
fn execute_paste_command(cmd: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to spawn {}", cmd)))?;

    if !output.status.success() {
        return Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Platform detection cache (using thread-safe lazy initialization)
static PLATFORM: OnceLock<&'static str> = OnceLock::new();

/// Determine the platform (cached)
fn get_platform() -> &'static str {
    PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "linux") {
            if env::var("WSL_DISTRO_NAME").is_ok() {
                "wsl"
            } else {
                "linux"
            }
        } else if cfg!(target_os = "android") {
            "android"
        } else {
            "unknown"
        }
    })
}

/// Determine which clipboard providers to try based on platform and preference
fn determine_clipboard_providers(direction: Direction) -> Vec<ClipboardProvider> {
    let mut providers = Vec::with_capacity(3);

    // Always try tmux first if available and running (user preference)
    if command_exists("tmux") && is_tmux_running() {
        providers.push(ClipboardProvider::Tmux);
    }

    let candidates: &[ClipboardProvider] = match get_platform() {
        "macos" => &[ClipboardProvider::MacOS],
        "windows" | "wsl" => &[ClipboardProvider::Wsl],
        // Wayland first, then the X11 tools
        "linux" => &[
            ClipboardProvider::Wayland,
            ClipboardProvider::Xsel,
            ClipboardProvider::Xclip,
        ],
        "android" => &[ClipboardProvider::Termux],
        _ => &[],
    };

    for &provider in candidates {
        let (cmd, _) = match direction {
            Direction::Copy => provider.copy_command(),
            Direction::Paste => provider.paste_command(),
        };
        if command_exists(cmd) {
            providers.push(provider);
        }
    }

    providers
}

/// Check if tmux is running and available for clipboard operations
fn is_tmux_running() -> bool {
    // Check if TMUX environment variable is set (inside tmux session)
    if env::var("TMUX").is_ok() {
        return true;
    }

    // Try running tmux list-buffers as a fallback check
    let status = Command::new("tmux")
        .args(["list-buffers"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    // If the command succeeds, tmux is running and can be used
    status.map(|s| s.success()).unwrap_or(false)
}
