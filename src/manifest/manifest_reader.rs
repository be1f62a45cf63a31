use crate::error::{Result, TxtExportError};
use std::fs;
use std::path::{Path, PathBuf};

/// The ordered list of entries read from a manifest file.
///
/// Surrounding whitespace of the whole file is dropped, then each line is kept
/// exactly as written (minus its line ending); duplicates and blank interior
/// lines are preserved.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    entries: Vec<String>,
}

impl Manifest {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(TxtExportError::ManifestMissing {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        Ok(Self::parse(path, &content))
    }

    pub fn parse<P: Into<PathBuf>>(path: P, content: &str) -> Self {
        let trimmed = content.trim();
        let entries = if trimmed.is_empty() {
            Vec::new()
        } else {
            // `\r\n`, `\n` and a lone `\r` all end a line
            trimmed
                .replace("\r\n", "\n")
                .split(['\n', '\r'])
                .map(str::to_string)
                .collect()
        };

        Self {
            path: path.into(),
            entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl IntoIterator for Manifest {
    type Item = String;
    type IntoIter = ManifestEntries;

    fn into_iter(self) -> Self::IntoIter {
        ManifestEntries {
            inner: self.entries.into_iter(),
        }
    }
}

/// Single-pass iterator over manifest entries in file order.
#[derive(Debug)]
pub struct ManifestEntries {
    inner: std::vec::IntoIter<String>,
}

impl Iterator for ManifestEntries {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ManifestEntries {}
