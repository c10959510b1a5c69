use clap::Parser;
use std::process;
use tabfuse::{
    Cli, OutputFormatter, OutputMode, SourceFormat, TabFuse, TabFuseError, UserFriendlyError,
};

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    // Create TabFuse instance
    let tabfuse = match TabFuse::from_cli(&cli) {
        Ok(tabfuse) => tabfuse,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    // Handle dry run mode
    if cli.dry_run {
        return handle_dry_run(&cli, &tabfuse);
    }

    // Execute the pipeline
    match tabfuse.run(&cli.input_dir) {
        Ok(report) => {
            tabfuse.output_formatter().print_run_report(&report);

            // Return appropriate exit code
            if report.errors.is_empty() {
                0 // Success
            } else {
                2 // Success with skipped files
            }
        }
        Err(e) => {
            tabfuse.handle_error(&e);

            // Map error types to appropriate exit codes
            match e {
                TabFuseError::Cancelled => 130, // Interrupted (SIGINT)
                TabFuseError::Config { .. } => 2,
                TabFuseError::InputDirNotFound { .. } => 3,
                TabFuseError::NoInputFiles { .. } => 4,
                TabFuseError::MalformedCsv { .. }
                | TabFuseError::MalformedJson { .. }
                | TabFuseError::MalformedXml { .. } => 5,
                TabFuseError::MissingField { .. }
                | TabFuseError::NonNumericField { .. }
                | TabFuseError::NonFiniteNumber { .. } => 6,
                TabFuseError::NoRecordsExtracted => 7,
                _ => 1, // General error
            }
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "tabfuse.toml".to_string());

    match TabFuse::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  tabfuse <input-dir> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cli: &Cli, tabfuse: &TabFuse) -> i32 {
    let formatter = tabfuse.output_formatter();

    formatter.info("DRY RUN MODE - No files will be read or written");
    formatter.print_separator();

    let outcome = match tabfuse.discover(&cli.input_dir) {
        Ok(outcome) => outcome,
        Err(e) => {
            formatter.print_user_friendly_error(&e);
            return 1;
        }
    };

    formatter.info("Files that would be processed:");
    for file in &outcome.files {
        let disposition = match SourceFormat::from_path(&file.path) {
            Some(format) => format.label(),
            None => "unsupported (empty contribution)",
        };
        println!("  {} [{}]", file.filename, disposition);
    }

    for note in &outcome.skipped {
        formatter.warning(note);
    }

    formatter.print_separator();
    formatter.info("Plan:");
    println!(
        "  Output file:  {}",
        tabfuse.output_path(&cli.input_dir).display()
    );
    println!(
        "  Journal file: {}",
        tabfuse.journal_path(&cli.input_dir).display()
    );
    println!(
        "  Failure policy: {}",
        if tabfuse.config().extraction.strict {
            "strict (abort on first unreadable file)"
        } else {
            "skip unreadable files"
        }
    );

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to process the files");

    0
}

fn print_startup_error(error: &TabFuseError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
