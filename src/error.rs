use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabFuseError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input directory not found: {path}")]
    InputDirNotFound { path: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("No input files found in {path}")]
    NoInputFiles { path: String },

    #[error("Malformed CSV in {path}: {message}")]
    MalformedCsv { path: PathBuf, message: String },

    #[error("Malformed line-delimited JSON in {path}: {message}")]
    MalformedJson { path: PathBuf, message: String },

    #[error("Malformed XML in {path}: {message}")]
    MalformedXml { path: PathBuf, message: String },

    #[error("No records extracted from any input file")]
    NoRecordsExtracted,

    #[error("Record is missing required field '{field}'")]
    MissingField { field: String },

    #[error("Field '{field}' is not numeric: {value}")]
    NonNumericField { field: String, value: String },

    #[error("Field '{field}' produced a non-finite number")]
    NonFiniteNumber { field: String },

    #[error("Failed to write output: {0}")]
    OutputWrite(#[from] csv::Error),

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for TabFuseError {
    fn user_message(&self) -> String {
        match self {
            TabFuseError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            TabFuseError::InputDirNotFound { path } => {
                format!("Input directory not found: {}", path)
            }
            TabFuseError::NoInputFiles { path } => {
                format!("No input files found in: {}", path)
            }
            TabFuseError::MalformedCsv { path, message } => {
                format!("Could not parse CSV file {}: {}", path.display(), message)
            }
            TabFuseError::MalformedJson { path, message } => {
                format!("Could not parse JSON file {}: {}", path.display(), message)
            }
            TabFuseError::MalformedXml { path, message } => {
                format!("Could not parse XML file {}: {}", path.display(), message)
            }
            TabFuseError::NoRecordsExtracted => {
                "No records could be extracted from the input files".to_string()
            }
            TabFuseError::MissingField { field } => {
                format!("A record is missing the required field '{}'", field)
            }
            TabFuseError::NonNumericField { field, value } => {
                format!("Field '{}' has a non-numeric value: {}", field, value)
            }
            TabFuseError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            TabFuseError::InputDirNotFound { .. } => Some(
                "Check that the directory exists, or pass a different directory as the first argument.".to_string(),
            ),
            TabFuseError::NoInputFiles { .. } => Some(
                "The input directory must contain at least one file with a dot in its name (e.g. data.csv, data.json, data.xml).".to_string(),
            ),
            TabFuseError::MalformedCsv { .. }
            | TabFuseError::MalformedJson { .. }
            | TabFuseError::MalformedXml { .. } => Some(
                "Fix the file or run without --strict to skip unreadable files.".to_string(),
            ),
            TabFuseError::NoRecordsExtracted => Some(
                "Every input file was either unsupported or unreadable. Check the journal file for per-file errors.".to_string(),
            ),
            TabFuseError::MissingField { field } => Some(format!(
                "Every record must carry a '{}' field. Check for input files with a different schema.",
                field
            )),
            TabFuseError::NonNumericField { field, .. } => Some(format!(
                "Values in the '{}' column must be numbers (plain or quoted).",
                field
            )),
            TabFuseError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for TabFuseError {
    fn from(error: toml::de::Error) -> Self {
        TabFuseError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TabFuseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = TabFuseError::InputDirNotFound {
            path: "missing_dir".to_string(),
        };
        assert!(error.user_message().contains("Input directory not found"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_parse_errors_carry_path() {
        let error = TabFuseError::MalformedJson {
            path: PathBuf::from("source3.json"),
            message: "expected object".to_string(),
        };
        assert!(error.user_message().contains("source3.json"));
        assert!(error.suggestion().unwrap().contains("--strict"));
    }

    #[test]
    fn test_transform_errors_name_the_field() {
        let error = TabFuseError::MissingField {
            field: "weight".to_string(),
        };
        assert!(error.user_message().contains("'weight'"));
        assert!(error.suggestion().unwrap().contains("weight"));
    }
}
