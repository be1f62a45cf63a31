use crate::config::{ExportMode, ExportSettings};
use crate::error::Result;
use crate::exporter::{ExportProgress, ExportReport};
use crate::manifest::Manifest;
use crate::resolver::{EntryResolver, ExportFile, ResolvedEntry};
use crate::ui::OutputFormatter;
use chrono::Utc;
use std::path::PathBuf;

/// Result of handing one file to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    Written {
        bytes: u64,
        /// Set when the file was copied to its own destination.
        destination: Option<PathBuf>,
    },
    Skipped {
        reason: String,
    },
}

/// Terminal action applied to every resolved file.
pub trait ExportSink {
    fn mode(&self) -> ExportMode;

    /// Called once the manifest has been read, before the first file.
    fn begin(&mut self) -> Result<()>;

    fn accept(&mut self, file: &ExportFile) -> Result<SinkOutcome>;

    /// Writes any summary artifact and returns its path.
    fn finish(&mut self) -> Result<PathBuf>;
}

pub struct Exporter<'a> {
    settings: ExportSettings,
    output: &'a OutputFormatter,
}

impl<'a> Exporter<'a> {
    pub fn new(settings: ExportSettings, output: &'a OutputFormatter) -> Self {
        Self { settings, output }
    }

    /// Resolve every manifest entry without exporting anything.
    pub fn plan(&self) -> Result<Vec<(String, ResolvedEntry)>> {
        let manifest = Manifest::read(&self.settings.manifest_path)?;
        let resolver = EntryResolver::new(&self.settings.base_dir);

        manifest
            .into_iter()
            .map(|entry| {
                let resolved = resolver.resolve(&entry)?;
                Ok((entry, resolved))
            })
            .collect()
    }

    pub fn run(&self, sink: &mut dyn ExportSink) -> Result<ExportReport> {
        let manifest = Manifest::read(&self.settings.manifest_path)?;
        self.output.debug(&format!(
            "Read {} manifest entries from {}",
            manifest.len(),
            manifest.path().display()
        ));

        let resolver = EntryResolver::new(&self.settings.base_dir);
        let mut progress = ExportProgress::new();

        sink.begin()?;

        for entry in manifest {
            let resolved = resolver.resolve(&entry)?;
            self.export_entry(&resolved, sink, &mut progress)?;
            progress.finish_entry();
        }

        let artifact_path = sink.finish()?;

        Ok(ExportReport {
            mode: sink.mode(),
            base_dir: self.settings.base_dir.clone(),
            manifest_path: self.settings.manifest_path.clone(),
            artifact_path,
            entries_processed: progress.entries_processed,
            files_exported: progress.files_exported,
            bytes_written: progress.bytes_written,
            missing_entries: progress.missing_entries.clone(),
            errors: progress.errors.clone(),
            duration: progress.elapsed(),
            finished_at: Utc::now(),
        })
    }

    fn export_entry(
        &self,
        resolved: &ResolvedEntry,
        sink: &mut dyn ExportSink,
        progress: &mut ExportProgress,
    ) -> Result<()> {
        match resolved {
            ResolvedEntry::Missing(path) => {
                self.output
                    .progress_line(&format!("Path not found: {}", path.display()));
                progress.add_missing(path);
                return Ok(());
            }
            ResolvedEntry::Directory { path, files, skipped } => {
                self.output.debug(&format!(
                    "Found {} files under {}",
                    files.len(),
                    path.display()
                ));
                for reason in skipped {
                    self.output.warning(reason);
                    progress.add_error(reason.clone());
                }
            }
            ResolvedEntry::File(_) => {}
        }

        for file in resolved.files() {
            match sink.accept(file)? {
                SinkOutcome::Written { bytes, destination } => {
                    match destination {
                        Some(dest) => self.output.progress_line(&format!(
                            "Copied and renamed: {} -> {}",
                            file.source_path.display(),
                            dest.display()
                        )),
                        None => self.output.debug(&format!(
                            "Appended {} ({} bytes)",
                            file.delimiter_path(),
                            bytes
                        )),
                    }
                    progress.add_file(bytes);
                }
                SinkOutcome::Skipped { reason } => {
                    self.output.warning(&reason);
                    progress.add_error(reason);
                }
            }
        }

        Ok(())
    }
}
