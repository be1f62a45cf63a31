use crate::config::{DecodePolicy, ExportMode};
use crate::error::{Result, TxtExportError};
use crate::exporter::runner::{ExportSink, SinkOutcome};
use crate::resolver::ExportFile;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Concatenates every file into one text document, each wrapped in
/// `START`/`END` delimiter lines.
pub struct CombineSink {
    output_path: PathBuf,
    decode: DecodePolicy,
    writer: Option<BufWriter<fs::File>>,
}

impl CombineSink {
    pub fn new<P: Into<PathBuf>>(output_path: P) -> Self {
        Self {
            output_path: output_path.into(),
            decode: DecodePolicy::default(),
            writer: None,
        }
    }

    pub fn with_decode_policy(mut self, decode: DecodePolicy) -> Self {
        self.decode = decode;
        self
    }

    fn writer(&mut self) -> Result<&mut BufWriter<fs::File>> {
        self.writer.as_mut().ok_or_else(|| {
            TxtExportError::Io(io::Error::new(
                io::ErrorKind::Other,
                "combined output is not open",
            ))
        })
    }
}

pub fn start_delimiter(path: &str) -> String {
    format!("--- START OF FILE: {} ---\n", path)
}

pub fn end_delimiter(path: &str) -> String {
    format!("\n--- END OF FILE: {} ---\n\n", path)
}

/// Decode file bytes as UTF-8 text. Invalid sequences are dropped or
/// replaced with U+FFFD, and `\r\n` / lone `\r` become `\n`.
pub fn decode_text(bytes: &[u8], policy: DecodePolicy) -> String {
    let text = match policy {
        DecodePolicy::Replace => String::from_utf8_lossy(bytes).into_owned(),
        DecodePolicy::Ignore => drop_invalid_utf8(bytes),
    };

    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

fn drop_invalid_utf8(bytes: &[u8]) -> String {
    let mut decoded = String::with_capacity(bytes.len());
    let mut rest = bytes;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                decoded.push_str(valid);
                break;
            }
            Err(err) => {
                let (valid, invalid) = rest.split_at(err.valid_up_to());
                decoded.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match err.error_len() {
                    Some(len) => rest = &invalid[len..],
                    // Truncated sequence at end of input
                    None => break,
                }
            }
        }
    }

    decoded
}

impl ExportSink for CombineSink {
    fn mode(&self) -> ExportMode {
        ExportMode::Combine
    }

    fn begin(&mut self) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = fs::File::create(&self.output_path)?;
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    fn accept(&mut self, file: &ExportFile) -> Result<SinkOutcome> {
        let bytes = match fs::read(&file.source_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                return Ok(SinkOutcome::Skipped {
                    reason: format!("Failed to read {}: {}", file.source_path.display(), e),
                });
            }
        };

        let path = file.delimiter_path().to_string();
        let text = decode_text(&bytes, self.decode);
        let header = start_delimiter(&path);
        let footer = end_delimiter(&path);

        let writer = self.writer()?;
        writer.write_all(header.as_bytes())?;
        writer.write_all(text.as_bytes())?;
        writer.write_all(footer.as_bytes())?;

        Ok(SinkOutcome::Written {
            bytes: (header.len() + text.len() + footer.len()) as u64,
            destination: None,
        })
    }

    fn finish(&mut self) -> Result<PathBuf> {
        let mut writer = self.writer.take().ok_or_else(|| {
            TxtExportError::Io(io::Error::new(
                io::ErrorKind::Other,
                "combined output is not open",
            ))
        })?;
        writer.flush()?;
        Ok(self.output_path.clone())
    }
}
