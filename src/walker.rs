/*!
 * Directory structure walker
 *
 * Recursively lists a folder through a [`DirectoryReader`], layering nested
 * `.gitignore` files on top of the inherited rules, and renders the result
 * with the same connectors as [`crate::tree`].
 */

use std::path::Path;

use tracing::{debug, error, warn};

use crate::fs::DirectoryReader;
use crate::ignore_rules::{find_ignore_file, load_ignore_rules, IgnoreRuleSet, IGNORE_FILE_NAME};
use crate::tree::{child_prefix, compare_entries, entry_line, LAST_BRANCH};
use crate::types::{base_name, to_slash, DirEntryInfo};

/// Marker emitted in place of a subtree whose directory could not be listed
pub const READ_ERROR_MARKER: &str = "ERROR reading directory";

/// Walks one root directory
pub struct DirectoryWalker<'a, R: DirectoryReader + ?Sized> {
    reader: &'a R,
    root: &'a Path,
}

impl<'a, R: DirectoryReader + ?Sized> DirectoryWalker<'a, R> {
    /// Create a walker for `root`
    pub fn new(reader: &'a R, root: &'a Path) -> Self {
        Self { reader, root }
    }

    /// Render the full structure: `<rootName>/` followed by the tree, with
    /// trailing whitespace trimmed. Rules start from the nearest ignore file
    /// at or above the root.
    pub fn structure(&self) -> String {
        let ignore_file = find_ignore_file(self.reader, self.root);
        let rules = load_ignore_rules(self.reader, ignore_file.as_deref());

        let mut output = format!("{}/\n", base_name(self.root));
        output.push_str(&self.walk(self.root, &rules, ""));
        output.trim_end().to_string()
    }

    /// Render the entries of `current` (and below) with the given prefix
    pub fn walk(&self, current: &Path, inherited: &IgnoreRuleSet, prefix: &str) -> String {
        let rules = self.effective_rules(current, inherited);

        let entries = match self.reader.list_entries(current) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Error reading directory {}: {}", current.display(), e);
                return format!("{}{}{}\n", prefix, LAST_BRANCH, READ_ERROR_MARKER);
            }
        };

        let entries = self.filter_and_sort(current, entries, &rules);

        let mut structure = String::new();
        let count = entries.len();
        for (i, entry) in entries.iter().enumerate() {
            let is_last = i + 1 == count;
            let is_dir = entry.kind.is_dir();
            structure.push_str(&entry_line(prefix, is_last, &entry.name, is_dir));

            if is_dir {
                let sub_dir = current.join(&entry.name);
                structure.push_str(&self.walk(&sub_dir, &rules, &child_prefix(prefix, is_last)));
            }
        }
        structure
    }

    /// Merge a local ignore file, if `current` has one, into the inherited rules
    fn effective_rules(&self, current: &Path, inherited: &IgnoreRuleSet) -> IgnoreRuleSet {
        let local_file = current.join(IGNORE_FILE_NAME);
        if !self.reader.exists(&local_file) {
            return inherited.clone();
        }

        match self.reader.read_to_string(&local_file) {
            Ok(content) => {
                debug!("Layering ignore rules from {}", local_file.display());
                let base = current.strip_prefix(self.root).unwrap_or(Path::new(""));
                IgnoreRuleSet::merge(inherited, &IgnoreRuleSet::local(base, &content))
            }
            Err(e) => {
                warn!("Error reading ignore file {}: {}", local_file.display(), e);
                inherited.clone()
            }
        }
    }

    fn filter_and_sort(
        &self,
        current: &Path,
        entries: Vec<DirEntryInfo>,
        rules: &IgnoreRuleSet,
    ) -> Vec<DirEntryInfo> {
        let mut kept: Vec<DirEntryInfo> = entries
            .into_iter()
            .filter(|entry| {
                let rel = self.relative_path(&current.join(&entry.name));
                let ignored = rules.matches(&rel, entry.kind.is_dir());
                if ignored {
                    debug!("Ignoring {}", rel);
                }
                !ignored
            })
            .collect();

        kept.sort_by(|a, b| compare_entries(&a.name, a.kind.is_dir(), &b.name, b.kind.is_dir()));
        kept
    }

    fn relative_path(&self, path: &Path) -> String {
        let rel = path.strip_prefix(self.root).unwrap_or(path);
        to_slash(rel)
    }
}

/// Render the directory structure of `root`
pub fn directory_structure<R: DirectoryReader + ?Sized>(reader: &R, root: &Path) -> String {
    DirectoryWalker::new(reader, root).structure()
}
