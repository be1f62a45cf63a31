use thiserror::Error;

#[derive(Error, Debug)]
pub enum TxtExportError {
    #[error("Manifest file not found: {path}")]
    ManifestMissing { path: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for TxtExportError {
    fn user_message(&self) -> String {
        match self {
            TxtExportError::ManifestMissing { path } => {
                format!("Manifest file not found: {}", path)
            }
            TxtExportError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            TxtExportError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            TxtExportError::ManifestMissing { .. } => Some(
                "Create a prompt_file_list.txt in the base directory with one relative path per line, or point to another file with --manifest.".to_string()
            ),
            TxtExportError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            TxtExportError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => Some(
                "Ensure you have the necessary read/write permissions for the source files and output directory.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for TxtExportError {
    fn from(error: toml::de::Error) -> Self {
        TxtExportError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TxtExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = TxtExportError::ManifestMissing {
            path: "/tmp/prompt_file_list.txt".to_string(),
        };
        assert!(error.user_message().contains("Manifest file not found"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = TxtExportError::from(io_error);
        assert!(matches!(error, TxtExportError::Io(_)));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let error = TxtExportError::from(toml_error);
        assert!(matches!(error, TxtExportError::Config { .. }));
    }
}
