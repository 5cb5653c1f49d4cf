/*!
 * Scenario tests for clipfiles functionality
 */

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use crate::compact::{compact, DEFAULT_GROUP_DEPTH};
use crate::config::Settings;
use crate::fs::DirectoryReader;
use crate::import_list::{decode, encode, resolve};
use crate::tree::{build_tree, open_files_tree, render};
use crate::types::{DirEntryInfo, EntryKind, WorkspaceRoot};
use crate::walker::{directory_structure, READ_ERROR_MARKER};
use crate::writer::OpenFilesWriter;

/// In-memory filesystem with injectable read failures
#[derive(Default)]
struct MemoryFs {
    entries: BTreeMap<PathBuf, Option<String>>,
    unreadable: BTreeSet<PathBuf>,
}

impl MemoryFs {
    fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent directories
    fn file(mut self, path: &str, content: &str) -> Self {
        let path = PathBuf::from(path);
        self.add_parents(&path);
        self.entries.insert(path, Some(content.to_string()));
        self
    }

    /// Add an (empty) directory, creating its parents
    fn dir(mut self, path: &str) -> Self {
        let path = PathBuf::from(path);
        self.add_parents(&path);
        self.entries.insert(path, None);
        self
    }

    /// Make listing or reading `path` fail
    fn unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(PathBuf::from(path));
        self
    }

    fn add_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() || ancestor == Path::new("/") {
                continue;
            }
            self.entries.insert(ancestor.to_path_buf(), None);
        }
    }

    fn check_readable(&self, path: &Path) -> io::Result<()> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        Ok(())
    }
}

impl DirectoryReader for MemoryFs {
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
        self.check_readable(dir)?;
        match self.entries.get(dir) {
            Some(None) => {}
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such directory: {}", dir.display()),
                ))
            }
        }

        Ok(self
            .entries
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .filter_map(|(path, content)| {
                let name = path.file_name()?.to_string_lossy().to_string();
                Some(match content {
                    Some(_) => DirEntryInfo::file(name),
                    None => DirEntryInfo::dir(name),
                })
            })
            .collect())
    }

    fn read_file(&self, file: &Path) -> io::Result<Vec<u8>> {
        self.check_readable(file)?;
        match self.entries.get(file) {
            Some(Some(content)) => Ok(content.as_bytes().to_vec()),
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", file.display()),
            )),
        }
    }

    fn stat(&self, path: &Path) -> Option<EntryKind> {
        self.entries.get(path).map(|content| match content {
            Some(_) => EntryKind::File,
            None => EntryKind::Directory,
        })
    }
}

#[test]
fn test_unreadable_directory_renders_error_line() {
    let fs = MemoryFs::new()
        .dir("/proj/a")
        .file("/proj/b/x.txt", "x")
        .file("/proj/z.txt", "z")
        .unreadable("/proj/a");

    let expected = format!(
        "\
proj/
├── a/
│   └── {}
├── b/
│   └── x.txt
└── z.txt",
        READ_ERROR_MARKER
    );
    assert_eq!(directory_structure(&fs, Path::new("/proj")), expected);
}

#[test]
fn test_unreadable_root_is_single_error_line() {
    let fs = MemoryFs::new().dir("/proj").unreadable("/proj");
    assert_eq!(
        directory_structure(&fs, Path::new("/proj")),
        format!("proj/\n└── {}", READ_ERROR_MARKER)
    );
}

#[test]
fn test_nested_ignore_layers_in_memory() {
    let fs = MemoryFs::new()
        .file("/proj/.gitignore", "*.log\n")
        .file("/proj/top.log", "")
        .file("/proj/.git/HEAD", "ref: refs/heads/main")
        .file("/proj/sub/.gitignore", "!keep.log\n")
        .file("/proj/sub/keep.log", "")
        .file("/proj/sub/drop.log", "")
        .file("/proj/other/also.log", "");

    let expected = "\
proj/
├── other/
├── sub/
│   ├── .gitignore
│   └── keep.log
└── .gitignore";
    assert_eq!(directory_structure(&fs, Path::new("/proj")), expected);
}

#[test]
fn test_unreadable_nested_ignore_file_keeps_inherited_rules() {
    let fs = MemoryFs::new()
        .file("/proj/.gitignore", "*.tmp\n")
        .file("/proj/sub/.gitignore", "*.rs\n")
        .file("/proj/sub/a.rs", "")
        .file("/proj/sub/b.tmp", "")
        .unreadable("/proj/sub/.gitignore");

    let structure = directory_structure(&fs, Path::new("/proj"));
    assert!(structure.contains("a.rs"));
    assert!(!structure.contains("b.tmp"));
}

#[test]
fn test_render_lists_every_leaf_once_sorted() {
    let paths = [
        "src/main.rs",
        "src/lib.rs",
        "README.md",
        "src/app/mod.rs",
        "Cargo.toml",
        "docs/guide.md",
    ];
    let tree = build_tree(&paths);
    assert_eq!(tree.leaf_count(), paths.len());

    let rendered = render(&tree, "");
    let lines: Vec<&str> = rendered.lines().collect();
    let file_lines = lines.iter().filter(|line| !line.ends_with('/')).count();
    assert_eq!(file_lines, paths.len());

    // Top level: directories first, then files, each group ascending
    let top: Vec<&str> = lines
        .iter()
        .filter(|line| line.starts_with("├── ") || line.starts_with("└── "))
        .map(|line| &line["├── ".len()..])
        .collect();
    assert_eq!(top, vec!["docs/", "src/", "Cargo.toml", "README.md"]);
}

#[test]
fn test_import_list_roundtrip_through_resolve() {
    let fs = MemoryFs::new()
        .file("/w/myapp/src/a.ts", "a")
        .file("/w/myapp/src/b.ts", "b")
        .dir("/w/other");
    let myapp = WorkspaceRoot::from_path("/w/myapp");
    let other = WorkspaceRoot::from_path("/w/other");

    let text = encode(
        &["/w/myapp/src/a.ts", "/w/myapp/src/b.ts", "/w/myapp/src/gone.ts"],
        Some(&myapp),
    );
    assert_eq!(text, "root:myapp\tsrc/a.ts\tsrc/b.ts\tsrc/gone.ts");

    let record = decode(&text);
    let resolution = resolve(&record, &[other.clone(), myapp.clone()], &fs);
    assert_eq!(
        resolution.files,
        vec![
            PathBuf::from("/w/myapp/src/a.ts"),
            PathBuf::from("/w/myapp/src/b.ts")
        ]
    );
    assert_eq!(resolution.missing, vec!["src/gone.ts"]);
}

#[test]
fn test_resolve_unknown_root_falls_back_to_first_workspace() {
    let fs = MemoryFs::new().file("/w/first/src/a.ts", "a");
    let first = WorkspaceRoot::from_path("/w/first");

    let record = decode("root:elsewhere\tsrc/a.ts");
    let resolution = resolve(&record, &[first], &fs);
    assert_eq!(resolution.files, vec![PathBuf::from("/w/first/src/a.ts")]);
}

#[test]
fn test_resolve_skips_directories_and_without_workspace() {
    let fs = MemoryFs::new()
        .file("/abs/file.rs", "")
        .dir("/abs/folder");

    let record = decode("/abs/file.rs\t/abs/folder\t/abs/missing.rs");
    let resolution = resolve(&record, &[], &fs);
    assert_eq!(resolution.files, vec![PathBuf::from("/abs/file.rs")]);
    assert_eq!(resolution.missing.len(), 2);

    let relative = decode("root:app\tsrc/a.rs");
    let resolution = resolve(&relative, &[], &fs);
    assert!(resolution.files.is_empty());
    assert_eq!(resolution.missing, vec!["src/a.rs"]);
}

#[test]
fn test_open_files_copy_with_workspace_and_outside_file() {
    let fs = MemoryFs::new()
        .file("/w/app/src/main.rs", "fn main() {}")
        .file("/tmp/notes.md", "todo")
        .file("/w/app/secret.key", "nope")
        .unreadable("/w/app/secret.key");
    let ws = WorkspaceRoot::from_path("/w/app");
    let files = ["/w/app/src/main.rs", "/tmp/notes.md", "/w/app/secret.key"];

    let writer = OpenFilesWriter::new(&fs, Settings::default(), Some(&ws));
    let output = writer.compose(&files);

    let expected = "\
app/
├── src/
│   └── main.rs
└── secret.key
└── tmp/
    └── notes.md

--- src/main.rs
fn main() {}

--- /tmp/notes.md
todo";
    assert_eq!(output.text, expected);
    assert_eq!(output.skipped, vec![PathBuf::from("/w/app/secret.key")]);
    assert_eq!(output.total_chars, "fn main() {}".len() + "todo".len());
}

#[test]
fn test_open_files_tree_and_compact_agree_on_workspace() {
    let ws = WorkspaceRoot::from_path("/w/myapp");
    let files = ["/w/myapp/src/ui/button.ts", "/w/myapp/src/ui/input.ts"];

    let tree = open_files_tree(&files, Some(&ws));
    assert!(tree.starts_with("myapp/\n"));

    let compacted = compact(&files, DEFAULT_GROUP_DEPTH, Some(&ws));
    assert_eq!(compacted, "myapp/src/ui/{button.ts,input.ts}");
}
