/*!
 * Directory read capability
 *
 * The tree walker and the import resolver only talk to the filesystem
 * through [`DirectoryReader`], so tests can swap in an in-memory reader.
 */

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::types::{DirEntryInfo, EntryKind};

/// Read-only access to a directory hierarchy
pub trait DirectoryReader {
    /// List the immediate entries of a directory
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>>;

    /// Read the raw bytes of a file
    fn read_file(&self, file: &Path) -> io::Result<Vec<u8>>;

    /// Kind of the entry at `path`, or `None` when nothing is there
    fn stat(&self, path: &Path) -> Option<EntryKind>;

    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool {
        self.stat(path).is_some()
    }

    /// Read a file as text, replacing invalid UTF-8 sequences
    fn read_to_string(&self, file: &Path) -> io::Result<String> {
        let bytes = self.read_file(file)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// [`DirectoryReader`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl DirectoryReader for LocalFs {
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
        // Limit depth to just the current directory
        let mut entries = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                kind,
            });
        }
        Ok(entries)
    }

    fn read_file(&self, file: &Path) -> io::Result<Vec<u8>> {
        fs::read(file)
    }

    fn stat(&self, path: &Path) -> Option<EntryKind> {
        let metadata = fs::metadata(path).ok()?;
        if metadata.is_dir() {
            Some(EntryKind::Directory)
        } else {
            Some(EntryKind::File)
        }
    }
}
