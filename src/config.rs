use crate::error::{Result, TxtExportError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_NAME: &str = "prompt_file_list.txt";
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "txtexport_flattened";
pub const DEFAULT_INDEX_FILE_NAME: &str = "project_file_system.txt";
pub const DEFAULT_COMBINED_FILE_NAME: &str = "all_files_combined.txt";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathConfig {
    pub base_dir: PathBuf,
    /// Relative paths are resolved against `base_dir`.
    pub manifest: PathBuf,
    /// Relative paths are resolved against `base_dir`.
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub mode: ExportMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub index_file_name: String,
    pub combined_file_name: String,
    pub decode: DecodePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Copy every file into one flat directory as `<name>.txt`
    #[default]
    Flatten,
    /// Concatenate every file into a single delimited text file
    Combine,
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportMode::Flatten => write!(f, "flatten"),
            ExportMode::Combine => write!(f, "combine"),
        }
    }
}

/// How invalid UTF-8 is handled when building the combined document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    #[default]
    Ignore,
    Replace,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            base_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            manifest: PathBuf::from(DEFAULT_MANIFEST_NAME),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR_NAME),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: ExportMode::default(),
            project_name: None,
            index_file_name: DEFAULT_INDEX_FILE_NAME.to_string(),
            combined_file_name: DEFAULT_COMBINED_FILE_NAME.to_string(),
            decode: DecodePolicy::default(),
        }
    }
}

/// Fully resolved locations for one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub base_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub output_dir: PathBuf,
}

impl ExportSettings {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        let base_dir = base_dir.into();
        Self {
            manifest_path: base_dir.join(DEFAULT_MANIFEST_NAME),
            output_dir: base_dir.join(DEFAULT_OUTPUT_DIR_NAME),
            base_dir,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TxtExportError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| TxtExportError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| TxtExportError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["txtexport.toml", ".txtexport.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref base_dir) = cli_args.base_dir {
            self.paths.base_dir = base_dir.clone();
        }

        if let Some(ref manifest) = cli_args.manifest {
            self.paths.manifest = manifest.clone();
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.paths.output_dir = output_dir.clone();
        }

        if let Some(mode) = cli_args.mode {
            self.output.mode = mode;
        }

        if let Some(ref project_name) = cli_args.project_name {
            self.output.project_name = Some(project_name.clone());
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| TxtExportError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| TxtExportError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_file_name("index_file_name", &self.output.index_file_name)?;
        validate_file_name("combined_file_name", &self.output.combined_file_name)?;

        if self.paths.manifest.as_os_str().is_empty() {
            return Err(TxtExportError::Config {
                message: "Manifest path must not be empty".to_string(),
            });
        }

        if self.paths.output_dir.as_os_str().is_empty() {
            return Err(TxtExportError::Config {
                message: "Output directory must not be empty".to_string(),
            });
        }

        if let Some(ref name) = self.output.project_name {
            if name.trim().is_empty() {
                return Err(TxtExportError::Config {
                    message: "Project name must not be blank".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn export_settings(&self) -> ExportSettings {
        let base_dir = self.paths.base_dir.clone();
        ExportSettings {
            manifest_path: base_dir.join(&self.paths.manifest),
            output_dir: base_dir.join(&self.paths.output_dir),
            base_dir,
        }
    }

    /// Project name used in the index header; falls back to the base
    /// directory's own name.
    pub fn project_name(&self) -> String {
        if let Some(ref name) = self.output.project_name {
            return name.clone();
        }

        let base = self
            .paths
            .base_dir
            .canonicalize()
            .unwrap_or_else(|_| self.paths.base_dir.clone());

        base.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Project".to_string())
    }

    /// Defaults with a relative base directory, suitable for writing out.
    pub fn sample() -> Self {
        let mut sample_config = Self::default();
        sample_config.paths.base_dir = PathBuf::from(".");
        sample_config
    }
}

fn validate_file_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TxtExportError::Config {
            message: format!("{} must not be empty", field),
        });
    }

    if name.contains('/') || name.contains('\\') {
        return Err(TxtExportError::Config {
            message: format!("{} must be a plain file name, got: {}", field, name),
        });
    }

    Ok(())
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub base_dir: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub mode: Option<ExportMode>,
    pub project_name: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(mut self, base_dir: Option<PathBuf>) -> Self {
        self.base_dir = base_dir;
        self
    }

    pub fn with_manifest(mut self, manifest: Option<PathBuf>) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_mode(mut self, mode: Option<ExportMode>) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_project_name(mut self, project_name: Option<String>) -> Self {
        self.project_name = project_name;
        self
    }
}
