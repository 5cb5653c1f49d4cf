/*!
 * Compact brace notation for path sets
 *
 * Paths are grouped by their first `group_depth` segments; the remaining
 * tails of each group are folded into a brace expression where linear
 * single-child runs collapse to `a/b/c`:
 *
 * ```text
 * src/app/main.rs src/app/util/io.rs src/lib.rs  ->  src/lib.rs src/app/{main.rs,util/io.rs}
 * ```
 */

use std::collections::BTreeMap;
use std::path::Path;

use crate::tree::build_tree;
use crate::types::{normalize_separators, PathNode, PathTree, WorkspaceRoot};

/// Number of leading segments shared by a group
pub const DEFAULT_GROUP_DEPTH: usize = 2;

/// Split a normalized path into `(head, tail)` for the given depth.
///
/// The head never swallows the whole path when it has more than one segment:
/// at least one trailing segment is left as the tail.
pub fn split_head(path: &str, group_depth: usize) -> Option<(String, String)> {
    let normalized = normalize_separators(path);
    let absolute = normalized.starts_with('/');
    let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return None;
    }

    let head_len = group_depth.min(segments.len().saturating_sub(1).max(1)).max(1);
    let mut head = segments[..head_len].join("/");
    if absolute {
        head.insert(0, '/');
    }
    let tail = segments[head_len..].join("/");
    Some((head, tail))
}

/// Group paths by head, heads in ascending order. A path that ends exactly
/// at its head contributes no tail.
pub fn group_paths<S: AsRef<str>>(paths: &[S], group_depth: usize) -> Vec<(String, Vec<String>)> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in paths {
        let Some((head, tail)) = split_head(path.as_ref(), group_depth) else {
            continue;
        };
        let tails = groups.entry(head).or_default();
        if !tail.is_empty() {
            tails.push(tail);
        }
    }
    groups.into_iter().collect()
}

/// Render a tree in brace notation
pub fn format_brace_tree(tree: &PathTree) -> String {
    let parts: Vec<String> = tree
        .iter()
        .map(|(name, node)| match node {
            PathNode::File => name.to_string(),
            PathNode::Directory(children) => match chain(name, children) {
                Some(run) => run,
                None => format!("{}/{}", name, format_brace_tree(children)),
            },
        })
        .collect();

    match parts.len() {
        0 => String::new(),
        1 => parts.into_iter().next().unwrap_or_default(),
        _ => format!("{{{}}}", parts.join(",")),
    }
}

/// `name/seg/.../leaf` when every level below `name` has exactly one child
fn chain(name: &str, children: &PathTree) -> Option<String> {
    let mut run = vec![name];
    let mut level = children;
    loop {
        if level.len() != 1 {
            return None;
        }
        let (child, node) = level.iter().next()?;
        run.push(child);
        match node {
            PathNode::File => return Some(run.join("/")),
            PathNode::Directory(next) => level = next,
        }
    }
}

fn group_token(head: &str, tails: &[String]) -> String {
    if tails.is_empty() {
        return head.to_string();
    }
    format!("{}/{}", head, format_brace_tree(&build_tree(tails)))
}

/// Render paths in compact notation.
///
/// With a workspace, paths under it are made relative and every resulting
/// token is prefixed with `<workspace name>/`; paths outside it keep their
/// absolute form and get no label.
pub fn compact<P: AsRef<Path>>(
    paths: &[P],
    group_depth: usize,
    workspace: Option<&WorkspaceRoot>,
) -> String {
    let mut inside = Vec::new();
    let mut outside = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match workspace.and_then(|ws| ws.relativize(path)) {
            Some(rel) => inside.push(rel),
            None => outside.push(normalize_separators(&path.to_string_lossy())),
        }
    }

    let label = workspace.map(|ws| ws.name.as_str());
    let mut tokens: Vec<(String, String)> = Vec::new();
    for (head, tails) in group_paths(&inside, group_depth) {
        let token = group_token(&head, &tails);
        let token = match label {
            Some(label) => format!("{}/{}", label, token),
            None => token,
        };
        tokens.push((head, token));
    }
    for (head, tails) in group_paths(&outside, group_depth) {
        let token = group_token(&head, &tails);
        tokens.push((head, token));
    }

    tokens.sort_by(|a, b| a.0.cmp(&b.0));
    tokens
        .into_iter()
        .map(|(_, token)| token)
        .collect::<Vec<_>>()
        .join(" ")
}
