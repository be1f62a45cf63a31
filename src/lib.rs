pub mod cli;
pub mod config;
pub mod error;
pub mod exporter;
pub mod manifest;
pub mod resolver;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, DecodePolicy, ExportMode, ExportSettings, OutputConfig, PathConfig};
pub use error::{Result, TxtExportError, UserFriendlyError};

// Core functionality re-exports
pub use exporter::{CombineSink, ExportReport, ExportSink, Exporter, FlattenSink, SinkOutcome};
pub use manifest::Manifest;
pub use resolver::{EntryOrigin, EntryResolver, ExportFile, ResolvedEntry};
pub use ui::{OutputFormatter, OutputMode};

use std::path::Path;

/// Main library interface for txtexport functionality
pub struct TxtExport {
    config: Config,
    output_formatter: OutputFormatter,
}

impl TxtExport {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
        }
    }

    /// Create a TxtExport instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Run the configured export mode end to end
    pub fn export(&self) -> Result<ExportReport> {
        let mode = self.config.output.mode;
        let settings = self.config.export_settings();

        self.output_formatter
            .start_operation(&format!("Exporting manifest entries ({} mode)", mode));
        self.output_formatter.info(&format!(
            "Base directory: {}",
            settings.base_dir.display()
        ));

        let mut sink = self.create_sink(&settings);
        let exporter = Exporter::new(settings, &self.output_formatter);
        let report = exporter.run(sink.as_mut())?;

        self.output_formatter.print_artifact(&report);
        Ok(report)
    }

    /// Resolve the manifest and print what would be exported
    pub fn dry_run(&self) -> Result<Vec<(String, ResolvedEntry)>> {
        let mode = self.config.output.mode;
        let settings = self.config.export_settings();
        let destination = match mode {
            ExportMode::Flatten => settings.output_dir.clone(),
            ExportMode::Combine => settings.output_dir.join(&self.config.output.combined_file_name),
        };
        let exporter = Exporter::new(settings, &self.output_formatter);

        let plan = exporter.plan()?;
        self.output_formatter.print_plan(&plan, mode, &destination);
        Ok(plan)
    }

    fn create_sink(&self, settings: &ExportSettings) -> Box<dyn ExportSink> {
        match self.config.output.mode {
            ExportMode::Flatten => Box::new(FlattenSink::new(
                settings.output_dir.clone(),
                self.config.output.index_file_name.clone(),
                self.config.project_name(),
            )),
            ExportMode::Combine => Box::new(
                CombineSink::new(settings.output_dir.join(&self.config.output.combined_file_name))
                    .with_decode_policy(self.config.output.decode),
            ),
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::sample().save_to_file(output_path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &TxtExportError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_project(root: &Path) {
        fs::create_dir_all(root.join("dirA/sub")).unwrap();
        fs::write(root.join("dirA/x.txt"), "x contents").unwrap();
        fs::write(root.join("dirA/sub/y.rs"), "fn y() {}").unwrap();
        fs::write(root.join("fileB.py"), "print('b')").unwrap();
        fs::write(
            root.join("prompt_file_list.txt"),
            "/dirA\nfileB.py\n/ghost.md\n",
        )
        .unwrap();
    }

    fn quiet_export(root: &Path, mode: ExportMode) -> TxtExport {
        let mut config = Config::default();
        config.paths.base_dir = root.to_path_buf();
        config.output.mode = mode;
        config.output.project_name = Some("ULP 1.5".to_string());
        TxtExport::new(config, OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_flatten_export() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_project(root);

        let report = quiet_export(root, ExportMode::Flatten).export().unwrap();
        let out = root.join("txtexport_flattened");

        assert_eq!(report.files_exported, 3);
        assert_eq!(report.missing_entries.len(), 1);
        assert_eq!(report.artifact_path, out.join("project_file_system.txt"));
        assert_eq!(fs::read_to_string(out.join("x.txt.txt")).unwrap(), "x contents");
        assert_eq!(fs::read_to_string(out.join("y.rs.txt")).unwrap(), "fn y() {}");
        assert_eq!(fs::read_to_string(out.join("fileB.py.txt")).unwrap(), "print('b')");
        assert_eq!(
            fs::read_to_string(out.join("project_file_system.txt")).unwrap(),
            "**ULP 1.5 Project Files**\n\n/dirA/x.txt\n/dirA/sub/y.rs\nfileB.py"
        );
    }

    #[test]
    fn test_combine_export() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_project(root);

        let report = quiet_export(root, ExportMode::Combine).export().unwrap();
        let combined_path = root.join("txtexport_flattened/all_files_combined.txt");
        assert_eq!(report.artifact_path, combined_path);

        let combined = fs::read_to_string(combined_path).unwrap();
        let x_start = combined.find("--- START OF FILE: dirA/x.txt ---").unwrap();
        let x_end = combined.find("--- END OF FILE: dirA/x.txt ---").unwrap();
        let b_start = combined.find("--- START OF FILE: fileB.py ---").unwrap();
        let b_end = combined.find("--- END OF FILE: fileB.py ---").unwrap();
        assert!(x_start < x_end && x_end < b_start && b_start < b_end);
        assert!(combined[x_start..x_end].contains("x contents"));
        assert!(!combined.contains("ghost.md"));
    }

    #[test]
    fn test_reruns_are_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_project(root);
        let out = root.join("txtexport_flattened");

        for mode in [ExportMode::Flatten, ExportMode::Combine] {
            let export = quiet_export(root, mode);
            let first = export.export().unwrap();
            let first_bytes = fs::read(&first.artifact_path).unwrap();
            let second = export.export().unwrap();
            assert_eq!(fs::read(&second.artifact_path).unwrap(), first_bytes);
        }
        assert_eq!(fs::read(out.join("x.txt.txt")).unwrap(), b"x contents");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_project(root);

        let plan = quiet_export(root, ExportMode::Flatten).dry_run().unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].1.files().len(), 2);
        assert!(plan[2].1.is_missing());
        assert!(!root.join("txtexport_flattened").exists());
    }

    #[test]
    fn test_indented_first_entry_is_a_listed_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_project(root);
        fs::write(root.join("prompt_file_list.txt"), "\n  dirA/x.txt\n").unwrap();

        let report = quiet_export(root, ExportMode::Flatten).export().unwrap();
        let out = root.join("txtexport_flattened");

        assert_eq!(report.entries_processed, 1);
        assert_eq!(report.files_exported, 1);
        assert!(!out.join("fileB.py.txt").exists());
        assert_eq!(
            fs::read_to_string(out.join("project_file_system.txt")).unwrap(),
            "**ULP 1.5 Project Files**\n\ndirA/x.txt"
        );
    }

    #[test]
    fn test_combine_dry_run_keeps_output_dir_empty() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_project(root);

        let plan = quiet_export(root, ExportMode::Combine).dry_run().unwrap();
        let delimited: Vec<&str> = plan
            .iter()
            .flat_map(|(_, resolved)| resolved.files())
            .map(|f| f.delimiter_path())
            .collect();
        assert_eq!(delimited, ["dirA/x.txt", "dirA/sub/y.rs", "fileB.py"]);
        assert!(!root.join("txtexport_flattened").exists());
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        TxtExport::generate_sample_config(&config_path).unwrap();
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[paths]"));
        assert!(content.contains("[output]"));
    }

}
