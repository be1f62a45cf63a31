use crate::config::ExportMode;
use crate::error::{Result, TxtExportError};
use crate::exporter::runner::{ExportSink, SinkOutcome};
use crate::resolver::ExportFile;
use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Copies every file into one flat directory as `<file name>.txt` and keeps
/// an index of what was exported.
pub struct FlattenSink {
    output_dir: PathBuf,
    index_file_name: String,
    project_name: String,
    records: Vec<String>,
}

const COPY_BUFFER_SIZE: usize = 64 * 1024;

impl FlattenSink {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(
        output_dir: P,
        index_file_name: S,
        project_name: S,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            index_file_name: index_file_name.into(),
            project_name: project_name.into(),
            records: Vec::new(),
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(&self.index_file_name)
    }

    /// Destination for a source file. `.txt` is always appended, so
    /// `main.rs` becomes `main.rs.txt`.
    pub fn destination_for(&self, file: &ExportFile) -> Result<PathBuf> {
        let name = file.file_name();
        if name.is_empty() {
            return Err(TxtExportError::InvalidPath {
                path: format!("No file name in {}", file.source_path.display()),
            });
        }
        Ok(self.output_dir.join(format!("{}.txt", name)))
    }

    pub fn render_index(&self) -> String {
        let mut index = format!("**{} Project Files**\n\n", self.project_name);
        index.push_str(&self.records.join("\n"));
        index
    }

    fn copy_file_with_buffer(&self, source: &Path, dest: &Path) -> Result<u64> {
        let source_file = fs::File::open(source)?;
        let dest_file = fs::File::create(dest)?;

        let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, source_file);
        let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, dest_file);

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; 8192];

        loop {
            let bytes_read = reader.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }

            writer.write_all(&buffer[..bytes_read])?;
            total_bytes += bytes_read as u64;
        }

        writer.flush()?;

        if let Ok(modified_time) = fs::metadata(source).and_then(|m| m.modified()) {
            let _ = filetime::set_file_mtime(
                dest,
                filetime::FileTime::from_system_time(modified_time),
            );
        }

        Ok(total_bytes)
    }
}

impl ExportSink for FlattenSink {
    fn mode(&self) -> ExportMode {
        ExportMode::Flatten
    }

    fn begin(&mut self) -> Result<()> {
        self.records.clear();
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    fn accept(&mut self, file: &ExportFile) -> Result<SinkOutcome> {
        let destination = self.destination_for(file)?;
        let bytes = self.copy_file_with_buffer(&file.source_path, &destination)?;
        self.records.push(file.recorded_path());

        Ok(SinkOutcome::Written {
            bytes,
            destination: Some(destination),
        })
    }

    fn finish(&mut self) -> Result<PathBuf> {
        let index_path = self.index_path();
        fs::write(&index_path, self.render_index())?;
        Ok(index_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{EntryOrigin, EntryResolver};
    use tempfile::TempDir;

    fn listed(path: PathBuf, entry: &str) -> ExportFile {
        ExportFile {
            source_path: path,
            relative_path: entry.trim_start_matches('/').to_string(),
            origin: EntryOrigin::Listed {
                entry: entry.to_string(),
            },
        }
    }

    #[test]
    fn test_copy_appends_txt_and_keeps_bytes() {
        let source_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let content: Vec<u8> = (0..=255u8).cycle().take(20_000).collect();
        let source = source_dir.path().join("main.rs");
        fs::write(&source, &content).unwrap();

        let mut sink = FlattenSink::new(out_dir.path().join("flat"), "index.txt", "Demo");
        sink.begin().unwrap();
        let outcome = sink.accept(&listed(source, "main.rs")).unwrap();

        let dest = out_dir.path().join("flat/main.rs.txt");
        assert_eq!(
            outcome,
            SinkOutcome::Written {
                bytes: content.len() as u64,
                destination: Some(dest.clone()),
            }
        );
        assert_eq!(fs::read(dest).unwrap(), content);
    }

    #[test]
    fn test_basename_collision_overwrites() {
        let source_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        fs::create_dir_all(source_dir.path().join("a")).unwrap();
        fs::create_dir_all(source_dir.path().join("b")).unwrap();
        fs::write(source_dir.path().join("a/mod.rs"), "first").unwrap();
        fs::write(source_dir.path().join("b/mod.rs"), "second").unwrap();

        let mut sink = FlattenSink::new(out_dir.path(), "index.txt", "Demo");
        sink.begin().unwrap();
        sink.accept(&listed(source_dir.path().join("a/mod.rs"), "a/mod.rs"))
            .unwrap();
        sink.accept(&listed(source_dir.path().join("b/mod.rs"), "b/mod.rs"))
            .unwrap();

        let copied = fs::read_to_string(out_dir.path().join("mod.rs.txt")).unwrap();
        assert_eq!(copied, "second");
        sink.finish().unwrap();
        let index = fs::read_to_string(out_dir.path().join("index.txt")).unwrap();
        assert_eq!(index, "**Demo Project Files**\n\na/mod.rs\nb/mod.rs");
    }

    #[test]
    fn test_index_layout() {
        let base = TempDir::new().unwrap();
        fs::create_dir_all(base.path().join("dirA")).unwrap();
        fs::write(base.path().join("dirA/x.txt"), "x").unwrap();
        fs::write(base.path().join("fileB.py"), "b").unwrap();

        let resolver = EntryResolver::new(base.path());
        let out_dir = base.path().join("out");
        let mut sink = FlattenSink::new(&out_dir, "project_file_system.txt", "ULP 1.5");
        sink.begin().unwrap();
        for entry in ["/dirA", "fileB.py"] {
            for file in resolver.resolve(entry).unwrap().files() {
                sink.accept(file).unwrap();
            }
        }
        let index_path = sink.finish().unwrap();

        assert_eq!(index_path, out_dir.join("project_file_system.txt"));
        assert_eq!(
            fs::read_to_string(index_path).unwrap(),
            "**ULP 1.5 Project Files**\n\n/dirA/x.txt\nfileB.py"
        );
    }

    #[test]
    fn test_empty_index() {
        let out_dir = TempDir::new().unwrap();
        let mut sink = FlattenSink::new(out_dir.path(), "index.txt", "Empty");
        sink.begin().unwrap();
        let index_path = sink.finish().unwrap();
        assert_eq!(
            fs::read_to_string(index_path).unwrap(),
            "**Empty Project Files**\n\n"
        );
    }

    #[test]
    fn test_missing_source_propagates() {
        let out_dir = TempDir::new().unwrap();
        let mut sink = FlattenSink::new(out_dir.path(), "index.txt", "Demo");
        sink.begin().unwrap();
        let result = sink.accept(&listed(out_dir.path().join("gone.rs"), "gone.rs"));
        assert!(matches!(result, Err(TxtExportError::Io(_))));
    }
}
