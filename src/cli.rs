use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tabfuse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Merge mixed-format tabular data files into a single normalized CSV")]
#[command(
    long_about = "TabFuse scans a directory for CSV, line-delimited JSON and XML data files, \
                       merges their records into one table, converts height (inches to meters) \
                       and weight (pounds to kilograms), drops exact duplicates and writes a \
                       single combined CSV. Every step is journaled to an append-only log file."
)]
#[command(after_help = "EXAMPLES:\n  \
    tabfuse\n  \
    tabfuse ./incoming --output combined.csv --verbose\n  \
    tabfuse ./incoming --exclude '.*\\.bak' --strict\n  \
    tabfuse ./incoming --config my-config.toml --output-format json")]
pub struct Cli {
    /// Directory containing the input files (scanned non-recursively)
    #[arg(default_value = ".")]
    pub input_dir: PathBuf,

    /// Output CSV path (default: transformed_data.csv in the input directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run journal path (default: log_file.txt in the input directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// File-name patterns to exclude from discovery
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Maximum file size in MB
    #[arg(long, help = "Maximum input file size to process (in MB)")]
    pub max_size: Option<u64>,

    /// Abort on the first unreadable input file instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show what would be processed without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a sample configuration file
    #[arg(long)]
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
        let max_file_size = self.max_size.map(|size| size * 1024 * 1024); // MB to bytes

        CliOverrides::new()
            .with_exclude(self.exclude.clone())
            .with_max_file_size(max_file_size)
            .with_strict(self.strict.then_some(true))
            .with_output_path(self.output.clone())
            .with_journal_path(self.log_file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_process_the_current_directory() {
        let cli = Cli::try_parse_from(["tabfuse"]).unwrap();
        assert_eq!(cli.input_dir, PathBuf::from("."));
        assert!(!cli.strict);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_flags_reach_the_overrides() {
        let cli = Cli::try_parse_from([
            "tabfuse",
            "incoming",
            "--output",
            "combined.csv",
            "--max-size",
            "5",
            "--strict",
        ])
        .unwrap();

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.output_path, Some(PathBuf::from("combined.csv")));
        assert_eq!(overrides.max_file_size, Some(5 * 1024 * 1024));
        assert_eq!(overrides.strict, Some(true));
    }

    #[test]
    fn test_unset_strict_does_not_override_config() {
        let cli = Cli::try_parse_from(["tabfuse"]).unwrap();
        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.strict, None);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["tabfuse", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_exclude_is_comma_delimited() {
        let cli = Cli::try_parse_from(["tabfuse", "--exclude", "a,b"]).unwrap();
        assert_eq!(
            cli.exclude,
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }
}
