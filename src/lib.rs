pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod journal;
pub mod load;
pub mod report;
pub mod table;
pub mod transform;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, DiscoveryConfig, ExtractionConfig, JournalConfig, OutputConfig};
pub use error::{Result, TabFuseError, UserFriendlyError};

// Core functionality re-exports
pub use discovery::{InputFile, InputScanner, ScanOutcome};
pub use extract::{ExtractProgress, Extractor, SourceFormat};
pub use journal::{FileJournal, MemoryJournal, RunJournal, RUN_SEPARATOR};
pub use report::{FileInfo, RunReport, RunSummary};
pub use table::{Record, Table};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Main library interface: sequences discovery, extraction, transformation,
/// deduplication and load, journaling every phase boundary.
pub struct TabFuse {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl TabFuse {
    /// Create a new TabFuse instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create a TabFuse instance for testing (no signal handler conflicts)
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new_for_test();

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create TabFuse instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Run the full pipeline against `input_dir`, journaling to the
    /// configured journal file.
    pub fn run(&self, input_dir: &Path) -> Result<RunReport> {
        let journal = FileJournal::new(self.journal_path(input_dir));
        self.run_with_journal(input_dir, &journal)
    }

    /// Run the full pipeline with an injected journal sink.
    pub fn run_with_journal(
        &self,
        input_dir: &Path,
        journal: &dyn RunJournal,
    ) -> Result<RunReport> {
        let start_time = Instant::now();

        self.shutdown.check_shutdown()?;
        self.output_formatter.start_operation("Starting ETL run");
        journal.record("ETL run started")?;

        // Discover input files
        let output_path = self.output_path(input_dir);
        let outcome = self.discover(input_dir)?;
        for note in &outcome.skipped {
            journal.record(note)?;
        }
        journal.record(&format!("Found {} files to process", outcome.files.len()))?;
        self.output_formatter
            .info(&format!("Found {} input files", outcome.files.len()));

        let scanner = self.scanner(input_dir);
        self.output_formatter
            .debug(&scanner.statistics(&outcome.files).display_summary());
        self.shutdown.check_shutdown()?;

        // Phase 1: extraction
        self.output_formatter.start_operation("Extracting records");
        let (extracted, extract_progress) = self.extract_records(&outcome.files, journal)?;
        journal.record(&format!("Extracted {} records", extracted.len()))?;
        self.shutdown.check_shutdown()?;

        if extracted.is_empty() {
            return Err(TabFuseError::NoRecordsExtracted);
        }

        // Phase 2: transformation and duplicate removal
        self.output_formatter.start_operation("Transforming records");
        let mut transformed = transform::transform(extracted, journal)?;
        journal.record("Removing duplicate records")?;
        let duplicates_removed = transformed.dedup_exact();
        journal.record(&format!(
            "Data after duplicate removal: {} records",
            transformed.len()
        ))?;
        self.shutdown.check_shutdown()?;

        // Phase 3: load
        self.output_formatter.start_operation("Writing combined CSV");
        load::load(&transformed, &output_path, journal)?;
        journal.record("Load completed")?;

        journal.record("ETL run finished")?;
        journal.record(RUN_SEPARATOR)?;

        let report = RunReport::new(
            input_dir.display().to_string(),
            output_path.display().to_string(),
            &outcome.files,
            &extract_progress,
            duplicates_removed,
            transformed.len(),
            start_time.elapsed(),
        );

        self.output_formatter.print_run_summary(&report.summary);
        Ok(report)
    }

    /// Scan the input directory without touching the journal (dry runs).
    pub fn discover(&self, input_dir: &Path) -> Result<ScanOutcome> {
        self.scanner(input_dir).scan_directory(input_dir)
    }

    fn scanner(&self, input_dir: &Path) -> InputScanner {
        let output_path = self.output_path(input_dir);
        let journal_path = self.journal_path(input_dir);
        InputScanner::new(&self.config.discovery)
            .with_reserved_paths(&[output_path.as_path(), journal_path.as_path()])
    }

    fn extract_records(
        &self,
        files: &[InputFile],
        journal: &dyn RunJournal,
    ) -> Result<(Table, ExtractProgress)> {
        let extract_start = Instant::now();
        let file_progress = self
            .progress_manager
            .create_file_progress(files.len() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &ExtractProgress| {
                ui::progress::update_extract_progress(&pb, progress);
            }
        };

        let extractor = Extractor::new(journal).with_strict(self.config.extraction.strict);
        let (table, progress) = extractor.extract_data(files, Some(&progress_callback))?;

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Extracted {} records", table.len()),
            extract_start.elapsed(),
        );

        Ok((table, progress))
    }

    /// Resolved output path: relative configured paths live in the input
    /// directory, matching where the scanner excludes them from discovery.
    pub fn output_path(&self, input_dir: &Path) -> PathBuf {
        resolve_path(input_dir, &self.config.output.path)
    }

    pub fn journal_path(&self, input_dir: &Path) -> PathBuf {
        resolve_path(input_dir, &self.config.journal.path)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(TabFuseError::Io)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &TabFuseError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

fn resolve_path(input_dir: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        input_dir.join(configured)
    }
}

/// Convenience function to run the pipeline with default configuration
pub fn run_pipeline_simple(input_dir: &Path, verbose: bool) -> Result<RunReport> {
    let tabfuse = TabFuse::new(
        Config::default(),
        OutputMode::Human,
        if verbose { 1 } else { 0 },
        false,
    )?;

    tabfuse.run(input_dir)
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_instance() -> TabFuse {
        TabFuse::new_for_test(Config::default(), OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_tabfuse_creation() {
        let tabfuse = quiet_instance();
        assert!(tabfuse.is_running());
        assert_eq!(
            tabfuse.config().output.path,
            PathBuf::from("transformed_data.csv")
        );
    }

    #[test]
    fn test_path_resolution_against_input_dir() {
        let tabfuse = quiet_instance();
        let input_dir = Path::new("incoming");
        assert_eq!(
            tabfuse.output_path(input_dir),
            PathBuf::from("incoming/transformed_data.csv")
        );
        assert_eq!(
            tabfuse.journal_path(input_dir),
            PathBuf::from("incoming/log_file.txt")
        );
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        TabFuse::generate_sample_config(&config_path).unwrap();
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[discovery]"));
        assert!(content.contains("[output]"));
        assert!(content.contains("[journal]"));
    }

    #[test]
    fn test_end_to_end_two_sources() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("a.csv"),
            "name,height,weight\nAlice,70,160\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("b.xml"),
            "<data><person><name>Bob</name><height>65</height><weight>140</weight></person></data>",
        )
        .unwrap();

        let tabfuse = quiet_instance();
        let report = tabfuse.run(temp_dir.path()).unwrap();

        assert_eq!(report.summary.files_discovered, 2);
        assert_eq!(report.summary.records_extracted, 2);
        assert_eq!(report.summary.records_loaded, 2);
        assert!(report.errors.is_empty());

        let output = fs::read_to_string(temp_dir.path().join("transformed_data.csv")).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "name,height,weight");
        assert_eq!(lines[1], "Alice,1.78,72.57");
        assert_eq!(lines[2], "Bob,1.65,63.5");

        let log = fs::read_to_string(temp_dir.path().join("log_file.txt")).unwrap();
        for needle in [
            "ETL run started",
            "Found 2 files to process",
            "Starting extraction phase",
            "Extracting data from CSV file",
            "Extracting data from XML file",
            "Extraction phase completed (2 files processed)",
            "Extracted 2 records",
            "Transformation completed",
            "Data after duplicate removal: 2 records",
            "Loading data into",
            "ETL run finished",
            RUN_SEPARATOR,
        ] {
            assert!(log.contains(needle), "missing journal line: {}", needle);
        }
    }

    #[test]
    fn test_rerun_does_not_reingest_its_own_output() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("a.csv"),
            "name,height,weight\nAlice,70,160\n",
        )
        .unwrap();

        let tabfuse = quiet_instance();
        let first = tabfuse.run(temp_dir.path()).unwrap();
        let second = tabfuse.run(temp_dir.path()).unwrap();

        assert_eq!(first.summary.files_discovered, 1);
        assert_eq!(second.summary.files_discovered, 1);
        assert_eq!(second.summary.records_loaded, 1);

        // Journal survives both runs, appended not truncated
        let log = fs::read_to_string(temp_dir.path().join("log_file.txt")).unwrap();
        assert_eq!(log.matches("ETL run started").count(), 2);
    }

    #[test]
    fn test_duplicate_records_collapse_across_sources() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("a.csv"),
            "name,height,weight\nAlice,70,160\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("b.json"),
            "{\"name\":\"Alice\",\"height\":70,\"weight\":160}\n",
        )
        .unwrap();

        let tabfuse = quiet_instance();
        let report = tabfuse.run(temp_dir.path()).unwrap();

        assert_eq!(report.summary.records_extracted, 2);
        assert_eq!(report.summary.duplicates_removed, 1);
        assert_eq!(report.summary.records_loaded, 1);
    }

    #[test]
    fn test_unreadable_file_is_skipped_and_reported() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("a.csv"),
            "name,height,weight\nAlice,70,160\n",
        )
        .unwrap();
        fs::write(temp_dir.path().join("b.json"), "[1,2,3]\n").unwrap();

        let tabfuse = quiet_instance();
        let report = tabfuse.run(temp_dir.path()).unwrap();

        assert_eq!(report.summary.records_loaded, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("b.json"));
    }

    #[test]
    fn test_strict_mode_aborts_on_unreadable_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("a.csv"),
            "name,height,weight\nAlice,70,160\n",
        )
        .unwrap();
        fs::write(temp_dir.path().join("b.json"), "[1,2,3]\n").unwrap();

        let mut config = Config::default();
        config.extraction.strict = true;
        let tabfuse = TabFuse::new_for_test(config, OutputMode::Plain, 0, true);

        let result = tabfuse.run(temp_dir.path());
        assert!(matches!(result, Err(TabFuseError::MalformedJson { .. })));
        // A failed run leaves no output file behind
        assert!(!temp_dir.path().join("transformed_data.csv").exists());
    }

    #[test]
    fn test_all_files_unreadable_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.json"), "[1,2,3]\n").unwrap();

        let tabfuse = quiet_instance();
        let result = tabfuse.run(temp_dir.path());
        assert!(matches!(result, Err(TabFuseError::NoRecordsExtracted)));
    }

    #[test]
    fn test_missing_field_aborts_the_run() {
        let temp_dir = TempDir::new().unwrap();
        // Valid NDJSON, but no weight field: fails at transform time
        fs::write(
            temp_dir.path().join("a.json"),
            "{\"name\":\"Alice\",\"height\":70}\n",
        )
        .unwrap();

        let tabfuse = quiet_instance();
        let result = tabfuse.run(temp_dir.path());
        assert!(matches!(
            result,
            Err(TabFuseError::MissingField { field }) if field == "weight"
        ));
    }

    #[test]
    fn test_shutdown_handling() {
        let tabfuse = quiet_instance();
        assert!(tabfuse.is_running());

        tabfuse.request_shutdown();
        assert!(!tabfuse.is_running());

        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("a.csv"),
            "name,height,weight\nAlice,70,160\n",
        )
        .unwrap();
        let result = tabfuse.run(temp_dir.path());
        assert!(matches!(result, Err(TabFuseError::Cancelled)));
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}
