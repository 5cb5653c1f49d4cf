/*!
 * Open-files output writer
 *
 * Builds the text copied for a set of open files: the file tree, the file
 * contents, or both, depending on the persisted [`Settings`].
 */

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::Settings;
use crate::fs::DirectoryReader;
use crate::report::FileReportInfo;
use crate::tree::open_files_tree;
use crate::types::{to_slash, WorkspaceRoot};

/// Text produced for the clipboard plus statistics about it
#[derive(Debug, Clone, Default)]
pub struct CopyOutput {
    /// Final text, trailing whitespace trimmed; empty when nothing was selected
    pub text: String,
    /// Number of unique files considered
    pub files: usize,
    /// Lines of file content copied
    pub total_lines: usize,
    /// Characters of file content copied
    pub total_chars: usize,
    /// Files whose content could not be read
    pub skipped: Vec<PathBuf>,
    /// Per-file details, keyed by display path
    pub file_details: HashMap<String, FileReportInfo>,
}

impl CopyOutput {
    /// Whether there is anything worth copying
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Writer for the open-files copy
pub struct OpenFilesWriter<'a, R: DirectoryReader + ?Sized> {
    reader: &'a R,
    settings: Settings,
    workspace: Option<&'a WorkspaceRoot>,
}

impl<'a, R: DirectoryReader + ?Sized> OpenFilesWriter<'a, R> {
    /// Create a new writer
    pub fn new(reader: &'a R, settings: Settings, workspace: Option<&'a WorkspaceRoot>) -> Self {
        Self {
            reader,
            settings,
            workspace,
        }
    }

    /// Compose the clipboard text for `files`
    pub fn compose<P: AsRef<Path>>(&self, files: &[P]) -> CopyOutput {
        let files = unique_paths(files);
        let mut output = CopyOutput {
            files: files.len(),
            ..Default::default()
        };

        let mut text = String::new();
        if self.settings.copy_structure {
            let structure = open_files_tree(&files, self.workspace);
            if !structure.is_empty() {
                text.push_str(&structure);
                if self.settings.copy_content {
                    // Exactly one blank line between the tree and the contents
                    if !text.ends_with('\n') {
                        text.push('\n');
                    }
                    if !text.ends_with("\n\n") {
                        text.push('\n');
                    }
                }
            }
        }

        if self.settings.copy_content {
            for file in &files {
                self.write_file(file, &mut text, &mut output);
            }
        }

        output.text = text.trim_end().to_string();
        output
    }

    /// Append one `--- <path>` section
    fn write_file(&self, file: &Path, text: &mut String, output: &mut CopyOutput) {
        let content = match self.reader.read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                warn!("Error reading {}: {}", file.display(), e);
                output.skipped.push(file.to_path_buf());
                return;
            }
        };

        let display_path = self.display_path(file);
        let info = FileReportInfo {
            lines: content.lines().count(),
            chars: content.chars().count(),
        };
        output.total_lines += info.lines;
        output.total_chars += info.chars;

        text.push_str(&format!("--- {}\n{}\n\n", display_path, content));
        output.file_details.insert(display_path, info);
    }

    /// Workspace-relative path when possible, otherwise the full path
    fn display_path(&self, file: &Path) -> String {
        self.workspace
            .and_then(|ws| ws.relativize(file))
            .unwrap_or_else(|| to_slash(file))
    }
}

/// Drop repeated paths, keeping first-seen order
pub fn unique_paths<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .map(|p| p.as_ref().to_path_buf())
        .filter(|p| seen.insert(p.to_string_lossy().to_string()))
        .collect()
}
