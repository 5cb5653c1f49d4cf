/*!
 * ASCII tree rendering
 *
 * Shared by the directory walker and the open-files listing: one line per
 * entry, `├── ` / `└── ` connectors, and a 4-column continuation indent.
 */

use std::cmp::Ordering;
use std::path::Path;

use crate::types::{base_name, to_slash, PathNode, PathTree, WorkspaceRoot};

/// Connector for every entry but the last one at a level
pub const BRANCH: &str = "├── ";
/// Connector for the last entry at a level
pub const LAST_BRANCH: &str = "└── ";
/// Indent under a non-last entry
pub const PIPE_INDENT: &str = "│   ";
/// Indent under the last entry
pub const SPACE_INDENT: &str = "    ";

/// Directories first, then case-sensitive ascending by name
pub fn compare_entries(a_name: &str, a_is_dir: bool, b_name: &str, b_is_dir: bool) -> Ordering {
    b_is_dir.cmp(&a_is_dir).then_with(|| a_name.cmp(b_name))
}

/// One rendered line, including its trailing newline
pub fn entry_line(prefix: &str, is_last: bool, name: &str, is_dir: bool) -> String {
    format!(
        "{}{}{}{}\n",
        prefix,
        if is_last { LAST_BRANCH } else { BRANCH },
        name,
        if is_dir { "/" } else { "" }
    )
}

/// Prefix for the children of an entry
pub fn child_prefix(prefix: &str, is_last: bool) -> String {
    format!("{}{}", prefix, if is_last { SPACE_INDENT } else { PIPE_INDENT })
}

/// Build a tree from a list of path strings
pub fn build_tree<S: AsRef<str>>(paths: &[S]) -> PathTree {
    let mut tree = PathTree::new();
    for path in paths {
        tree.insert(path.as_ref());
    }
    tree
}

/// Render an in-memory tree below `prefix`
pub fn render(tree: &PathTree, prefix: &str) -> String {
    let mut entries: Vec<(&str, &PathNode)> = tree.iter().collect();
    entries.sort_by(|(a, a_node), (b, b_node)| {
        compare_entries(a, a_node.is_dir(), b, b_node.is_dir())
    });

    let mut out = String::new();
    let count = entries.len();
    for (i, (name, node)) in entries.into_iter().enumerate() {
        let is_last = i + 1 == count;
        out.push_str(&entry_line(prefix, is_last, name, node.is_dir()));
        if let PathNode::Directory(children) = node {
            out.push_str(&render(children, &child_prefix(prefix, is_last)));
        }
    }
    out
}

/// Open paths split by whether they live under the workspace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizedPaths {
    /// Workspace-relative paths, forward slashes
    pub workspace: Vec<String>,
    /// Everything else, as given (forward slashes)
    pub outside: Vec<String>,
}

/// Split paths into workspace-relative and outside-workspace lists
pub fn categorize<P: AsRef<Path>>(
    paths: &[P],
    workspace: Option<&WorkspaceRoot>,
) -> CategorizedPaths {
    let mut categorized = CategorizedPaths::default();
    for path in paths {
        let path = path.as_ref();
        match workspace.and_then(|ws| ws.relativize(path)) {
            Some(rel) => categorized.workspace.push(rel),
            None => categorized.outside.push(to_slash(path)),
        }
    }
    categorized
}

/// Render the tree of a set of open files.
///
/// Workspace files appear under the workspace's base name; other files are
/// rendered as a second tree without a root label, directly after the first.
pub fn open_files_tree<P: AsRef<Path>>(paths: &[P], workspace: Option<&WorkspaceRoot>) -> String {
    let categorized = categorize(paths, workspace);
    let mut out = String::new();

    if let Some(ws) = workspace {
        if !categorized.workspace.is_empty() {
            out.push_str(&format!("{}/\n", base_name(&ws.path)));
            out.push_str(&render(&build_tree(&categorized.workspace), ""));
        }
    }

    if !categorized.outside.is_empty() {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&render(&build_tree(&categorized.outside), ""));
    }

    out
}
