use crate::error::{Result, TabFuseError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
    pub journal: JournalConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    pub exclude_patterns: Vec<String>,
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// When true, a file that fails to parse aborts the run instead of
    /// contributing an empty table.
    pub strict: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Destination for the combined CSV. Relative paths resolve against the
    /// input directory.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JournalConfig {
    /// Destination for the append-only run journal. Relative paths resolve
    /// against the input directory.
    pub path: PathBuf,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            max_file_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("transformed_data.csv"),
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("log_file.txt"),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TabFuseError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| TabFuseError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| TabFuseError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["tabfuse.toml", "tabfuse.config.toml", ".tabfuse.toml"];

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
        if let Some(ref exclude) = cli_args.exclude {
            self.discovery.exclude_patterns.extend(exclude.clone());
        }

        if let Some(max_size) = cli_args.max_file_size {
            self.discovery.max_file_size = max_size;
        }

        if let Some(strict) = cli_args.strict {
            self.extraction.strict = strict;
        }

        if let Some(ref output_path) = cli_args.output_path {
            self.output.path = output_path.clone();
        }

        if let Some(ref journal_path) = cli_args.journal_path {
            self.journal.path = journal_path.clone();
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| TabFuseError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| TabFuseError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.discovery.max_file_size == 0 {
            return Err(TabFuseError::Config {
                message: "Maximum file size must be greater than 0".to_string(),
            });
        }

        for pattern in &self.discovery.exclude_patterns {
            if let Err(e) = Regex::new(pattern) {
                return Err(TabFuseError::Config {
                    message: format!("Invalid exclude pattern '{}': {}", pattern, e),
                });
            }
        }

        if self.output.path.file_name().is_none() {
            return Err(TabFuseError::Config {
                message: "Output path must name a file".to_string(),
            });
        }

        if self.journal.path.file_name().is_none() {
            return Err(TabFuseError::Config {
                message: "Journal path must name a file".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub exclude: Option<Vec<String>>,
    pub max_file_size: Option<u64>,
    pub strict: Option<bool>,
    pub output_path: Option<PathBuf>,
    pub journal_path: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exclude(mut self, exclude: Option<Vec<String>>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_max_file_size(mut self, max_size: Option<u64>) -> Self {
        self.max_file_size = max_size;
        self
    }

    pub fn with_strict(mut self, strict: Option<bool>) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_output_path(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path;
        self
    }

    pub fn with_journal_path(mut self, journal_path: Option<PathBuf>) -> Self {
        self.journal_path = journal_path;
        self
    }
}
