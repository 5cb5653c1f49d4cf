/*!
 * Hierarchical gitignore-style rules
 *
 * Every `.gitignore` met while descending adds a layer on top of the rules
 * inherited from its ancestors. Layers are evaluated from the most specific
 * one down, so a child `!keep.log` can re-include what a parent `*.log`
 * excluded, and a child pattern can exclude what the parent allowed.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::Match;
use tracing::{debug, warn};

use crate::fs::DirectoryReader;

/// Name of the per-directory ignore file
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Version-control metadata directory, always hidden
pub const IMPLICIT_IGNORE: &str = ".git";

/// Patterns parsed from a single ignore file
#[derive(Debug)]
struct RuleLayer {
    /// Directory of the ignore file, relative to the walk root ("" for the root)
    base: PathBuf,
    /// Raw pattern lines in file order
    patterns: Vec<String>,
    matcher: Gitignore,
}

impl RuleLayer {
    fn parse(base: PathBuf, lines: Vec<String>) -> Self {
        let mut builder = GitignoreBuilder::new(&base);
        for line in &lines {
            if let Err(e) = builder.add_line(None, line) {
                warn!("Skipping invalid ignore pattern {:?}: {}", line, e);
            }
        }
        let matcher = builder.build().unwrap_or_else(|e| {
            warn!("Failed to build ignore rules for {:?}: {}", base, e);
            Gitignore::empty()
        });

        Self {
            base,
            patterns: lines,
            matcher,
        }
    }

    fn matched(&self, path: &Path, is_dir: bool) -> Match<()> {
        // Only paths strictly below the layer's directory are governed by it.
        // The matcher strips its own root from the full path.
        match path.strip_prefix(&self.base) {
            Ok(local) if !local.as_os_str().is_empty() => {}
            _ => return Match::None,
        }
        match self.matcher.matched(path, is_dir) {
            Match::None => Match::None,
            Match::Ignore(_) => Match::Ignore(()),
            Match::Whitelist(_) => Match::Whitelist(()),
        }
    }
}

/// Ordered stack of ignore layers.
///
/// Cloning is cheap: layers are shared, and merging always builds a new set
/// so nothing flows back up to the parent.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRuleSet {
    layers: Vec<Arc<RuleLayer>>,
}

impl IgnoreRuleSet {
    /// Rules for the walk root: the given ignore file content (if any) plus
    /// the implicit `.git` exclusion.
    pub fn load(content: Option<&str>) -> Self {
        let mut lines = content.map(split_lines).unwrap_or_default();
        lines.push(IMPLICIT_IGNORE.to_string());
        Self {
            layers: vec![Arc::new(RuleLayer::parse(PathBuf::new(), lines))],
        }
    }

    /// Rules of a nested ignore file located in `base` (relative to the walk
    /// root). Patterns are anchored at that directory.
    pub fn local(base: impl Into<PathBuf>, content: &str) -> Self {
        Self {
            layers: vec![Arc::new(RuleLayer::parse(base.into(), split_lines(content)))],
        }
    }

    /// Layer `child` on top of `parent`; child patterns are evaluated after
    /// the parent's.
    pub fn merge(parent: &IgnoreRuleSet, child: &IgnoreRuleSet) -> IgnoreRuleSet {
        let mut layers = parent.layers.clone();
        layers.extend(child.layers.iter().cloned());
        IgnoreRuleSet { layers }
    }

    /// Whether a root-relative, forward-slash path is excluded. Directories
    /// are probed both bare and in their `dir/` form.
    pub fn matches(&self, relative_path: &str, is_directory: bool) -> bool {
        self.is_excluded(relative_path, false)
            || (is_directory && self.is_excluded(relative_path, true))
    }

    /// All pattern lines in evaluation order
    pub fn patterns(&self) -> Vec<&str> {
        self.layers
            .iter()
            .flat_map(|layer| layer.patterns.iter().map(String::as_str))
            .collect()
    }

    fn is_excluded(&self, relative_path: &str, as_dir: bool) -> bool {
        let path = Path::new(relative_path.trim_end_matches('/'));
        // Last matching pattern wins, so look at the most specific layer first
        for layer in self.layers.iter().rev() {
            match layer.matched(path, as_dir) {
                Match::Ignore(()) => return true,
                Match::Whitelist(()) => return false,
                Match::None => {}
            }
        }
        false
    }
}

fn split_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

/// Find the nearest ignore file at or above `start`
pub fn find_ignore_file<R: DirectoryReader + ?Sized>(reader: &R, start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(IGNORE_FILE_NAME);
        if reader.exists(&candidate) {
            debug!("Found ignore file {}", candidate.display());
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

/// Load the rule set for a walk root from an optional ignore file.
///
/// An unreadable file is not an error: it is logged and only the implicit
/// rule applies.
pub fn load_ignore_rules<R: DirectoryReader + ?Sized>(
    reader: &R,
    ignore_file: Option<&Path>,
) -> IgnoreRuleSet {
    let content = ignore_file.and_then(|path| match reader.read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("Error reading ignore file {}: {}", path.display(), e);
            None
        }
    });
    IgnoreRuleSet::load(content.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_git_rule() {
        let rules = IgnoreRuleSet::load(None);
        assert!(rules.matches(".git", true));
        assert!(rules.matches("nested/.git", true));
        assert!(!rules.matches("src", true));
        assert_eq!(rules.patterns(), vec![".git"]);
    }

    #[test]
    fn test_basic_patterns() {
        let rules = IgnoreRuleSet::load(Some("# build output\ntarget/\n*.log\n"));
        assert!(rules.matches("target", true));
        assert!(!rules.matches("target", false));
        assert!(rules.matches("app.log", false));
        assert!(rules.matches("logs/app.log", false));
        assert!(!rules.matches("src/main.rs", false));
    }

    #[test]
    fn test_child_negation_overrides_parent() {
        let parent = IgnoreRuleSet::load(Some("*.log"));
        let child = IgnoreRuleSet::local("sub", "!keep.log");
        let merged = IgnoreRuleSet::merge(&parent, &child);

        assert!(!merged.matches("sub/keep.log", false));
        assert!(merged.matches("sub/other.log", false));
        // The parent set is untouched by the merge
        assert!(parent.matches("sub/keep.log", false));
    }

    #[test]
    fn test_child_adds_exclusions() {
        let parent = IgnoreRuleSet::load(None);
        let child = IgnoreRuleSet::local("web", "dist/\n/generated.ts");
        let merged = IgnoreRuleSet::merge(&parent, &child);

        assert!(merged.matches("web/dist", true));
        assert!(merged.matches("web/generated.ts", false));
        assert!(!merged.matches("web/src/generated.ts", false));
        assert!(!merged.matches("api/generated.ts", false));
    }

    #[test]
    fn test_merge_keeps_pattern_order() {
        let parent = IgnoreRuleSet::load(Some("*.tmp"));
        let child = IgnoreRuleSet::local("a", "!x.tmp\nbuild");
        let merged = IgnoreRuleSet::merge(&parent, &child);
        assert_eq!(merged.patterns(), vec!["*.tmp", ".git", "!x.tmp", "build"]);
    }
}
