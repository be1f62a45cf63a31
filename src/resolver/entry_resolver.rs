use crate::error::Result;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// How a file came to be exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOrigin {
    /// Named directly by a manifest line, kept verbatim.
    Listed { entry: String },
    /// Found while walking a directory named by the manifest.
    Discovered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub source_path: PathBuf,
    /// Path relative to the base directory, `/`-separated, no leading slash.
    pub relative_path: String,
    pub origin: EntryOrigin,
}

impl ExportFile {
    /// Path written to the flatten index.
    ///
    /// Discovered files get a leading `/`; listed files keep the manifest
    /// line byte for byte. Existing exports depend on this asymmetry.
    pub fn recorded_path(&self) -> String {
        match self.origin {
            EntryOrigin::Listed { ref entry } => entry.clone(),
            EntryOrigin::Discovered => format!("/{}", self.relative_path),
        }
    }

    /// Path written inside the combined document's delimiter lines.
    pub fn delimiter_path(&self) -> &str {
        match self.origin {
            EntryOrigin::Listed { ref entry } => entry,
            EntryOrigin::Discovered => &self.relative_path,
        }
    }

    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub enum ResolvedEntry {
    File(ExportFile),
    Directory {
        path: PathBuf,
        files: Vec<ExportFile>,
        /// Subtrees that could not be read; the walk continues past them.
        skipped: Vec<String>,
    },
    Missing(PathBuf),
}

impl ResolvedEntry {
    pub fn files(&self) -> &[ExportFile] {
        match self {
            ResolvedEntry::File(file) => std::slice::from_ref(file),
            ResolvedEntry::Directory { files, .. } => files,
            ResolvedEntry::Missing(_) => &[],
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ResolvedEntry::Missing(_))
    }
}

pub struct EntryResolver {
    base_dir: PathBuf,
}

impl EntryResolver {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Candidate path for a manifest line: leading separators are dropped so
    /// the entry always lands under the base directory.
    pub fn candidate_path(&self, entry: &str) -> PathBuf {
        self.base_dir.join(entry.trim_start_matches(&['/', '\\'][..]))
    }

    pub fn resolve(&self, entry: &str) -> Result<ResolvedEntry> {
        let candidate = self.candidate_path(entry);

        if candidate.is_dir() {
            let (files, skipped) = self.walk_directory(&candidate);
            Ok(ResolvedEntry::Directory {
                path: candidate,
                files,
                skipped,
            })
        } else if candidate.is_file() {
            Ok(ResolvedEntry::File(ExportFile {
                relative_path: self.normalized_relative_path(&candidate),
                source_path: candidate,
                origin: EntryOrigin::Listed {
                    entry: entry.to_string(),
                },
            }))
        } else {
            Ok(ResolvedEntry::Missing(candidate))
        }
    }

    fn walk_directory(&self, root: &Path) -> (Vec<ExportFile>, Vec<String>) {
        let mut files = Vec::new();
        let mut skipped = Vec::new();

        // Symlinked directories are listed but not descended into
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by(files_before_directories);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let location = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    skipped.push(format!("Skipped unreadable path {}: {}", location, err));
                    continue;
                }
            };

            if is_exportable_file(&entry) {
                let source_path = entry.into_path();
                files.push(ExportFile {
                    relative_path: self.normalized_relative_path(&source_path),
                    source_path,
                    origin: EntryOrigin::Discovered,
                });
            }
        }

        (files, skipped)
    }

    fn normalized_relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.base_dir).unwrap_or(path);
        relative.to_string_lossy().replace('\\', "/")
    }
}

fn is_exportable_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

// A directory's own files come before the contents of its subdirectories,
// each group ordered by name.
fn files_before_directories(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_tree(root: &Path) {
        fs::create_dir_all(root.join("dirA/nested")).unwrap();
        fs::write(root.join("dirA/x.txt"), "x").unwrap();
        fs::write(root.join("dirA/b.rs"), "b").unwrap();
        fs::write(root.join("dirA/nested/a.md"), "a").unwrap();
        fs::write(root.join("fileB.py"), "print()").unwrap();
    }

    #[test]
    fn test_resolve_listed_file_keeps_manifest_line() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());
        let resolver = EntryResolver::new(temp_dir.path());

        let resolved = resolver.resolve("/fileB.py").unwrap();
        let files = resolved.files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].recorded_path(), "/fileB.py");
        assert_eq!(files[0].delimiter_path(), "/fileB.py");
        assert_eq!(files[0].relative_path, "fileB.py");
        assert_eq!(
            files[0].origin,
            EntryOrigin::Listed {
                entry: "/fileB.py".to_string()
            }
        );

        let resolved = resolver.resolve("fileB.py").unwrap();
        assert_eq!(resolved.files()[0].recorded_path(), "fileB.py");
    }

    #[test]
    fn test_resolve_directory_walks_recursively() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());
        let resolver = EntryResolver::new(temp_dir.path());

        let resolved = resolver.resolve("/dirA").unwrap();
        let recorded: Vec<String> = resolved.files().iter().map(|f| f.recorded_path()).collect();
        assert_eq!(
            recorded,
            ["/dirA/b.rs", "/dirA/x.txt", "/dirA/nested/a.md"]
        );

        let delimited: Vec<&str> = resolved.files().iter().map(|f| f.delimiter_path()).collect();
        assert_eq!(delimited, ["dirA/b.rs", "dirA/x.txt", "dirA/nested/a.md"]);
        assert!(resolved
            .files()
            .iter()
            .all(|f| f.origin == EntryOrigin::Discovered));
    }

    #[test]
    fn test_resolve_directory_with_trailing_separator() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());
        let resolver = EntryResolver::new(temp_dir.path());

        let resolved = resolver.resolve("dirA/nested/").unwrap();
        assert_eq!(resolved.files().len(), 1);
        assert_eq!(resolved.files()[0].recorded_path(), "/dirA/nested/a.md");
    }

    #[test]
    fn test_resolve_missing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = EntryResolver::new(temp_dir.path());

        let resolved = resolver.resolve("/does/not/exist.rs").unwrap();
        assert!(resolved.is_missing());
        assert!(resolved.files().is_empty());
        match resolved {
            ResolvedEntry::Missing(path) => {
                assert_eq!(path, temp_dir.path().join("does/not/exist.rs"))
            }
            other => panic!("expected missing entry, got {:?}", other),
        }
    }

    #[test]
    fn test_candidate_path_strips_leading_separators() {
        let resolver = EntryResolver::new("/base");
        assert_eq!(resolver.candidate_path("/src/lib.rs"), PathBuf::from("/base/src/lib.rs"));
        assert_eq!(resolver.candidate_path("//src"), PathBuf::from("/base/src"));
        assert_eq!(resolver.candidate_path("src"), PathBuf::from("/base/src"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_tree(root);
        fs::create_dir(root.join("links")).unwrap();
        std::os::unix::fs::symlink(root.join("fileB.py"), root.join("links/file_link.py")).unwrap();
        std::os::unix::fs::symlink(root.join("dirA"), root.join("links/dir_link")).unwrap();

        let resolver = EntryResolver::new(root);
        let resolved = resolver.resolve("links").unwrap();
        let recorded: Vec<String> = resolved.files().iter().map(|f| f.recorded_path()).collect();
        assert_eq!(recorded, ["/links/file_link.py"]);
    }
}
