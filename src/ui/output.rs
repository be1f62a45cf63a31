use crate::config::ExportMode;
use crate::error::{TxtExportError, UserFriendlyError};
use crate::exporter::ExportReport;
use crate::resolver::{ExportFile, ResolvedEntry};
use console::{style, Emoji, Term};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    /// Per-file progress. Printed verbatim in human and plain modes so the
    /// lines stay greppable.
    pub fn progress_line(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Json => self.print_json_message("progress", message),
                OutputMode::Human | OutputMode::Plain => println!("{}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &TxtExportError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// Closing line naming the artifact, matching what each mode produced.
    pub fn print_artifact(&self, report: &ExportReport) {
        let message = artifact_message(report.mode, &report.artifact_path);
        self.progress_line(&message);
    }

    pub fn print_export_summary(&self, report: &ExportReport) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_summary(report),
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => self.print_plain_summary(report),
        }
    }

    /// Lists what an export would produce. `destination` is the output
    /// directory in flatten mode and the combined file in combine mode.
    pub fn print_plan(
        &self,
        plan: &[(String, ResolvedEntry)],
        mode: ExportMode,
        destination: &Path,
    ) {
        match self.mode {
            OutputMode::Json => {
                if !self.should_show_message(0) {
                    return;
                }
                let entries: Vec<serde_json::Value> = plan
                    .iter()
                    .map(|(entry, resolved)| {
                        serde_json::json!({
                            "entry": entry,
                            "missing": resolved.is_missing(),
                            "files": resolved
                                .files()
                                .iter()
                                .map(|f| planned_source(mode, f))
                                .collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                self.print_json_object(&serde_json::json!({
                    "type": "plan",
                    "mode": mode.to_string(),
                    "destination": destination.display().to_string(),
                    "entries": entries,
                }));
            }
            OutputMode::Human | OutputMode::Plain => {
                for (entry, resolved) in plan {
                    if let ResolvedEntry::Missing(path) = resolved {
                        self.progress_line(&format!(
                            "  {} -> Path not found: {}",
                            entry,
                            path.display()
                        ));
                        continue;
                    }
                    for file in resolved.files() {
                        self.progress_line(&format!(
                            "  {} -> {}",
                            planned_source(mode, file),
                            planned_destination(mode, file, destination).display()
                        ));
                    }
                }
            }
        }
    }

    /// One `label: value` line of run details.
    pub fn detail(&self, label: &str, value: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Json => self.print_json_object(&serde_json::json!({
                    "type": "detail",
                    "label": label,
                    "value": value,
                })),
                OutputMode::Human | OutputMode::Plain => println!("  {}: {}", label, value),
            }
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        if self.use_colors {
            let (emoji, styled) = match msg_type {
                MessageType::Success => (CHECKMARK, style(message).green().bold()),
                MessageType::Error => (CROSS, style(message).red().bold()),
                MessageType::Warning => (WARNING, style(message).yellow().bold()),
                MessageType::Info => (INFO, style(message).cyan()),
            };

            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, styled),
                _ => println!("{}{}", emoji, styled),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, report: &ExportReport) {
        println!();
        self.print_separator();

        let headline = summary_headline(report);
        if self.use_colors {
            if report.has_warnings() {
                println!("{}{}", WARNING, style(&headline).yellow().bold());
            } else {
                println!("{} {}", style(&headline).green().bold(), CHECKMARK);
            }
        } else {
            let prefix = if report.has_warnings() { "!" } else { "✓" };
            println!("{} {}", prefix, headline);
        }

        println!();
        let field = |value: String| {
            if self.use_colors {
                style(value).cyan().bold().to_string()
            } else {
                value
            }
        };
        println!("  Files exported:  {}", field(report.files_exported.to_string()));
        println!("  Bytes written:   {}", field(format_bytes(report.bytes_written)));
        println!("  Time taken:      {}", field(format_duration(report.duration)));

        if !report.missing_entries.is_empty() {
            println!("  Missing entries: {}", report.missing_entries.len());
        }
        if !report.errors.is_empty() {
            println!("  Errors:          {}", report.errors.len());
            for error in &report.errors {
                println!("    - {}", error);
            }
        }

        self.print_separator();
    }

    fn print_plain_summary(&self, report: &ExportReport) {
        println!("COMPLETED: {}", summary_headline(report));
        println!("Files exported: {}", report.files_exported);
        println!("Bytes written: {}", report.bytes_written);
        println!("Duration: {:?}", report.duration);
        if !report.missing_entries.is_empty() {
            println!("Missing entries: {}", report.missing_entries.len());
        }
        if !report.errors.is_empty() {
            println!("Errors: {}", report.errors.len());
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

fn artifact_message(mode: ExportMode, path: &Path) -> String {
    match mode {
        ExportMode::Flatten => format!("Exported processed files to: {}", path.display()),
        ExportMode::Combine => format!("All files combined into: {}", path.display()),
    }
}

fn summary_headline(report: &ExportReport) -> String {
    if report.has_warnings() {
        format!("Export completed with warnings ({} mode)", report.mode)
    } else {
        format!("Export completed ({} mode)", report.mode)
    }
}

// Flatten lists the index path of each file, combine its delimiter path.
fn planned_source(mode: ExportMode, file: &ExportFile) -> String {
    match mode {
        ExportMode::Flatten => file.recorded_path(),
        ExportMode::Combine => file.delimiter_path().to_string(),
    }
}

fn planned_destination(mode: ExportMode, file: &ExportFile, destination: &Path) -> PathBuf {
    match mode {
        ExportMode::Flatten => destination.join(format!("{}.txt", file.file_name())),
        ExportMode::Combine => destination.to_path_buf(),
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
