use crate::config::{CliOverrides, Config, ExportMode};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "txtexport")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Flatten the files listed in a manifest into plain-text exports")]
#[command(
    long_about = "txtexport reads prompt_file_list.txt from the base directory and exports \
                  every listed file (directories are walked recursively) into \
                  txtexport_flattened/, either as individual .txt copies with an index \
                  or as one combined, delimited text document."
)]
#[command(after_help = "EXAMPLES:\n  \
    txtexport\n  \
    txtexport --mode combine\n  \
    txtexport --base-dir ~/work/ulp-1.5 --project-name \"ULP 1.5\"\n  \
    txtexport --config txtexport.toml --dry-run")]
pub struct Cli {
    /// Export mode (defaults to flatten)
    #[arg(short, long, value_enum)]
    pub mode: Option<ExportMode>,

    /// Project root that manifest entries are relative to
    #[arg(short, long, help = "Base directory (defaults to the current directory)")]
    pub base_dir: Option<PathBuf>,

    /// Manifest file, relative to the base directory
    #[arg(long, help = "Manifest file (default: prompt_file_list.txt)")]
    pub manifest: Option<PathBuf>,

    /// Output directory, relative to the base directory
    #[arg(short, long, help = "Output directory (default: txtexport_flattened)")]
    pub output_dir: Option<PathBuf>,

    /// Project name shown in the index header
    #[arg(long)]
    pub project_name: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are printed)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be exported without writing anything)
    #[arg(long, help = "Show what would be exported without actually doing it")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_base_dir(self.base_dir.clone())
            .with_manifest(self.manifest.clone())
            .with_output_dir(self.output_dir.clone())
            .with_mode(self.mode)
            .with_project_name(self.project_name.clone())
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
