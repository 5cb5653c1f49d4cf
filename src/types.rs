/*!
 * Core types and data structures for the clipfiles application
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Kind of a directory entry as reported by a [`crate::fs::DirectoryReader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (symlinks are reported as files too)
    File,
    /// Directory containing other entries
    Directory,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

/// One immediate child of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// Entry name, without any path separator
    pub name: String,
    /// Entry kind
    pub kind: EntryKind,
}

impl DirEntryInfo {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }
}

/// A node of a [`PathTree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathNode {
    /// Terminal file segment
    File,
    /// Directory segment with its own children
    Directory(PathTree),
}

impl PathNode {
    pub fn is_dir(&self) -> bool {
        matches!(self, PathNode::Directory(_))
    }
}

/// Nested tree of path segments built from a flat list of paths.
///
/// Keys are single, non-empty path segments. Children are kept in a
/// `BTreeMap`, so iteration is always in ascending lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTree {
    children: BTreeMap<String, PathNode>,
}

impl PathTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one path. Back-slashes are treated as separators and empty
    /// segments (leading `/`, `//`) are skipped. A trailing `/` marks the
    /// last segment as a directory.
    pub fn insert(&mut self, path: &str) {
        let normalized = normalize_separators(path);
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        let Some((last, parents)) = segments.split_last() else {
            return;
        };
        let (file, dirs) = if normalized.ends_with('/') {
            (None, segments.as_slice())
        } else {
            (Some(last), parents)
        };

        let mut level = self;
        for dir in dirs {
            let node = level
                .children
                .entry((*dir).to_string())
                .or_insert_with(|| PathNode::Directory(PathTree::new()));
            // A segment first seen as a file becomes a directory once a deeper path needs it
            if let PathNode::File = node {
                *node = PathNode::Directory(PathTree::new());
            }
            level = match node {
                PathNode::Directory(tree) => tree,
                PathNode::File => unreachable!("file nodes are upgraded above"),
            };
        }

        if let Some(file) = file {
            level
                .children
                .entry((*file).to_string())
                .or_insert(PathNode::File);
        }
    }

    /// Whether the tree has no entries at all
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of immediate children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Immediate children in ascending name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of terminal file entries in the whole tree
    pub fn leaf_count(&self) -> usize {
        self.children
            .values()
            .map(|node| match node {
                PathNode::File => 1,
                PathNode::Directory(tree) => tree.leaf_count(),
            })
            .sum()
    }
}

impl<S: AsRef<str>> FromIterator<S> for PathTree {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = PathTree::new();
        for path in iter {
            tree.insert(path.as_ref());
        }
        tree
    }
}

/// A named workspace folder used to relativize paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRoot {
    /// Display name (the folder's base name by default)
    pub name: String,
    /// Absolute location of the workspace
    pub path: PathBuf,
}

impl WorkspaceRoot {
    /// Create a workspace root with an explicit name
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Create a workspace root named after the folder's base name
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = base_name(&path);
        Self { name, path }
    }

    /// Path of `path` relative to this workspace, with forward slashes,
    /// or `None` when it lies outside the workspace.
    pub fn relativize(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.path).ok()?;
        if rel.as_os_str().is_empty() {
            return None;
        }
        Some(to_slash(rel))
    }
}

/// A decoded Import List line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportListRecord {
    /// Workspace name the paths are relative to; absent means absolute paths
    pub root_name: Option<String>,
    /// Path tokens in their serialized order
    pub paths: Vec<String>,
}

impl ImportListRecord {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Replace back-slashes with forward slashes
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Render a path with forward slashes regardless of platform
pub fn to_slash(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy())
}

/// Last component of a path, or the whole path when it has none (e.g. `/`)
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
