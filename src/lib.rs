/*!
 * clipfiles - Turn file sets and folders into LLM-ready text
 *
 * This library renders ASCII trees of folders (honoring nested `.gitignore`
 * files) and of open-file sets, compacts path lists into brace notation, and
 * encodes/decodes Import Lists so a file set can be reopened later.
 */

pub mod clipboard;
pub mod compact;
pub mod config;
pub mod error;
pub mod fs;
pub mod ignore_rules;
pub mod import_list;
pub mod panel;
pub mod report;
pub mod tree;
pub mod types;
pub mod walker;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use compact::{compact, DEFAULT_GROUP_DEPTH};
pub use config::{Config, Settings};
pub use error::{ClipFilesError, Result};
pub use fs::{DirectoryReader, LocalFs};
pub use ignore_rules::IgnoreRuleSet;
pub use import_list::{decode, encode, resolve, ImportResolution};
pub use panel::{OptionsPanel, PanelEffect, PanelItem, PanelState};
pub use report::{CopyReport, FileReportInfo, ReportFormat, Reporter};
pub use tree::{build_tree, open_files_tree, render};
pub use types::{DirEntryInfo, EntryKind, ImportListRecord, PathNode, PathTree, WorkspaceRoot};
pub use walker::{directory_structure, DirectoryWalker};
pub use writer::{CopyOutput, OpenFilesWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
