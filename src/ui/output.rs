use crate::error::{TabFuseError, UserFriendlyError};
use crate::report::{RunReport, RunSummary};
use console::{style, Emoji, Term};

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

enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

pub struct OutputFormatter {
    #[allow(dead_code)]
    term: Term,
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            term,
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
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
        if self.should_show_message(1) {
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

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
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

    pub fn print_separator(&self) {
        if self.mode == OutputMode::Human && !self.quiet {
            println!("{}", "─".repeat(50));
        }
    }

    pub fn print_user_friendly_error(&self, error: &TabFuseError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    println!();
                    if self.use_colors {
                        println!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        println!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    println!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    pub fn print_run_summary(&self, summary: &RunSummary) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_summary(summary),
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "summary",
                    "summary": summary,
                }));
            }
            OutputMode::Plain => {
                println!("FILES: {}", summary.files_discovered);
                println!("EXTRACTED: {}", summary.records_extracted);
                println!("DUPLICATES_REMOVED: {}", summary.duplicates_removed);
                println!("LOADED: {}", summary.records_loaded);
            }
        }
    }

    pub fn print_run_report(&self, report: &RunReport) {
        match self.mode {
            OutputMode::Human => {
                if !report.errors.is_empty() {
                    self.warning(&format!(
                        "{} file(s) skipped due to errors:",
                        report.errors.len()
                    ));
                    for error in &report.errors {
                        println!("  {}", error);
                    }
                }
                self.success(&format!(
                    "Wrote {} records to {}",
                    report.summary.records_loaded, report.output_path
                ));
            }
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => {
                for error in &report.errors {
                    println!("SKIPPED: {}", error);
                }
                println!("OUTPUT: {}", report.output_path);
                println!("RECORDS: {}", report.summary.records_loaded);
            }
        }
    }

    fn print_human_summary(&self, summary: &RunSummary) {
        println!();
        if self.use_colors {
            println!("{}", style("Run Summary").bold().underlined());
        } else {
            println!("Run Summary");
            println!("===========");
        }

        println!("  Input files:        {}", summary.files_discovered);
        let mut extensions: Vec<_> = summary.files_by_extension.iter().collect();
        extensions.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (ext, count) in extensions {
            println!("    {}: {}", ext, count);
        }
        println!("  Records extracted:  {}", summary.records_extracted);
        println!("  Duplicates removed: {}", summary.duplicates_removed);
        println!("  Records written:    {}", summary.records_loaded);
        println!("  Duration:           {:.2?}", summary.duration);
        println!();
    }

    fn print_human_message(&self, message_type: MessageType, message: &str) {
        if self.use_colors {
            match message_type {
                MessageType::Success => println!("{}{}", CHECKMARK, style(message).green()),
                MessageType::Error => eprintln!("{}{}", CROSS, style(message).red()),
                MessageType::Warning => println!("{}{}", WARNING, style(message).yellow()),
                MessageType::Info => println!("{}{}", INFO, message),
            }
        } else {
            match message_type {
                MessageType::Success => println!("✓ {}", message),
                MessageType::Error => eprintln!("✗ {}", message),
                MessageType::Warning => println!("! {}", message),
                MessageType::Info => println!("i {}", message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": level,
            "message": message,
        }));
    }

    fn print_json_object(&self, value: &serde_json::Value) {
        println!("{}", serde_json::to_string(value).unwrap_or_default());
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }
}
