/*!
 * Import List: a single-line serialization of an open-file set
 *
 * ```text
 * root:myapp<TAB>src/a.ts<TAB>src/b.ts      (workspace-relative)
 * /abs/one.rs<TAB>/abs/two.rs               (absolute)
 * ```
 *
 * The parser also accepts runs of two or more spaces as the delimiter when
 * the text has no tab at all, since tabs tend to get lost in chat clients.
 */

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::fs::DirectoryReader;
use crate::types::{EntryKind, ImportListRecord, WorkspaceRoot};

/// Prefix of the optional leading workspace token
pub const ROOT_PREFIX: &str = "root:";

static TAB_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t+").expect("valid tab regex"));
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("valid space regex"));

/// Serialize a set of paths.
///
/// Duplicates are dropped (first occurrence wins). When a workspace is given
/// and every path lies under it, the line starts with `root:<name>` and the
/// paths are workspace-relative with forward slashes; otherwise the paths
/// are written as-is.
pub fn encode<P: AsRef<Path>>(paths: &[P], workspace: Option<&WorkspaceRoot>) -> String {
    let mut seen = HashSet::new();
    let unique: Vec<&Path> = paths
        .iter()
        .map(|path| path.as_ref())
        .filter(|path| seen.insert(path.to_string_lossy().to_string()))
        .collect();

    if unique.is_empty() {
        return String::new();
    }

    if let Some(ws) = workspace {
        let relative: Option<Vec<String>> = unique.iter().map(|p| ws.relativize(p)).collect();
        if let Some(relative) = relative {
            let mut tokens = Vec::with_capacity(relative.len() + 1);
            tokens.push(format!("{}{}", ROOT_PREFIX, ws.name));
            tokens.extend(relative);
            return tokens.join("\t");
        }
        debug!("Some paths lie outside {}, encoding absolute paths", ws.name);
    }

    unique
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("\t")
}

/// Parse an Import List line. Blank or token-less input yields an empty record.
pub fn decode(text: &str) -> ImportListRecord {
    let text = text.trim();
    if text.is_empty() {
        return ImportListRecord::default();
    }

    let delimiter: &Regex = if text.contains('\t') {
        &TAB_RUN
    } else {
        &SPACE_RUN
    };

    let mut tokens: Vec<String> = delimiter
        .split(text)
        .filter(|token| !token.trim().is_empty())
        .map(str::to_string)
        .collect();

    let mut root_name = None;
    if let Some(first) = tokens.first() {
        if has_root_prefix(first) {
            let name = first[ROOT_PREFIX.len()..].trim().to_string();
            tokens.remove(0);
            if !name.is_empty() {
                root_name = Some(name);
            }
        }
    }

    ImportListRecord {
        root_name,
        paths: tokens,
    }
}

fn has_root_prefix(token: &str) -> bool {
    token
        .get(..ROOT_PREFIX.len())
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case(ROOT_PREFIX))
}

/// Outcome of resolving a decoded record against the filesystem
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResolution {
    /// Existing regular files, in record order
    pub files: Vec<PathBuf>,
    /// Tokens that did not resolve to an existing file
    pub missing: Vec<String>,
}

impl ImportResolution {
    /// One-line human summary of the import
    pub fn summary(&self) -> String {
        match (self.files.len(), self.missing.len()) {
            (0, 0) => "Nothing to import.".to_string(),
            (0, missing) => format!("None of the {} listed files could be found.", missing),
            (found, 0) => format!("Opened {} files.", found),
            (found, missing) => format!(
                "Opened {} files; some files missing ({} not found).",
                found, missing
            ),
        }
    }
}

/// Join a `/`-separated relative path under `base` using host separators
pub fn join_relative(base: &Path, relative: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for segment in relative.split(['/', '\\']).filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}

/// Resolve a decoded record to existing files.
///
/// A root name is looked up among `workspaces` by name, falling back to the
/// first workspace. Paths that do not resolve to a regular file are skipped
/// and reported in `missing`.
pub fn resolve<R: DirectoryReader + ?Sized>(
    record: &ImportListRecord,
    workspaces: &[WorkspaceRoot],
    reader: &R,
) -> ImportResolution {
    let base = match &record.root_name {
        Some(name) => {
            let found = workspaces.iter().find(|ws| &ws.name == name);
            if found.is_none() {
                match workspaces.first() {
                    Some(first) => warn!(
                        "Workspace {:?} not found, resolving against {}",
                        name, first.name
                    ),
                    None => warn!("Workspace {:?} not found and no workspace is open", name),
                }
            }
            found.or_else(|| workspaces.first()).map(|ws| ws.path.as_path())
        }
        None => None,
    };

    let mut resolution = ImportResolution::default();
    for token in &record.paths {
        let candidate = match (&record.root_name, base) {
            (Some(_), Some(base)) => Some(join_relative(base, token)),
            (Some(_), None) => None,
            (None, _) => Some(PathBuf::from(token)),
        };

        match candidate {
            Some(path) if reader.stat(&path) == Some(EntryKind::File) => {
                resolution.files.push(path)
            }
            _ => {
                debug!("Skipping unresolved import entry {}", token);
                resolution.missing.push(token.clone());
            }
        }
    }
    resolution
}
