use crate::discovery::InputFile;
use crate::error::Result;
use crate::journal::RunJournal;
use crate::table::Table;
use std::path::Path;

/// A recognized source format, decided by the path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
    Xml,
}

impl SourceFormat {
    /// Case-sensitive extension match: `.csv`, `.json`, `.xml`. Anything
    /// else (including no extension or an uppercase variant) is unsupported.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Some(SourceFormat::Csv),
            Some("json") => Some(SourceFormat::Json),
            Some("xml") => Some(SourceFormat::Xml),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "CSV",
            SourceFormat::Json => "JSON",
            SourceFormat::Xml => "XML",
        }
    }
}

/// Running totals for the extraction phase, handed to the progress callback
/// after each file and kept for the final report.
#[derive(Debug, Clone)]
pub struct ExtractProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub records_extracted: usize,
    pub current_file: Option<String>,
    pub errors: Vec<String>,
}

impl ExtractProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            records_extracted: 0,
            current_file: None,
            errors: Vec::new(),
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_processed as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Dispatches files to the per-format parsers and applies the failure
/// policy: by default a parse failure is journaled and the file contributes
/// an empty table; in strict mode it aborts the run.
pub struct Extractor<'a> {
    journal: &'a dyn RunJournal,
    strict: bool,
}

impl<'a> Extractor<'a> {
    pub fn new(journal: &'a dyn RunJournal) -> Self {
        Self {
            journal,
            strict: false,
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Extract a single file. Unsupported formats and (in the default
    /// policy) unreadable files contribute an empty table.
    pub fn extract_file(&self, path: &Path) -> Result<Table> {
        self.extract_with_policy(path).map(|(table, _)| table)
    }

    fn extract_with_policy(&self, path: &Path) -> Result<(Table, Option<String>)> {
        let Some(format) = SourceFormat::from_path(path) else {
            self.journal
                .record(&format!("Unsupported file format: {}", path.display()))?;
            return Ok((Table::new(), None));
        };

        self.journal.record(&format!(
            "Extracting data from {} file: {}",
            format.label(),
            path.display()
        ))?;

        let parsed = match format {
            SourceFormat::Csv => super::csv::extract_from_csv(path),
            SourceFormat::Json => super::json::extract_from_json(path),
            SourceFormat::Xml => super::xml::extract_from_xml(path),
        };

        match parsed {
            Ok(table) => Ok((table, None)),
            Err(error) if !self.strict => {
                let note = format!(
                    "Error reading {} file {}: {}",
                    format.label(),
                    path.display(),
                    error
                );
                self.journal.record(&note)?;
                Ok((Table::new(), Some(note)))
            }
            Err(error) => Err(error),
        }
    }

    /// The extraction phase: dispatch every discovered file and flatten all
    /// records into one table. Differing schemas across formats simply
    /// produce heterogeneous records.
    pub fn extract_data(
        &self,
        files: &[InputFile],
        progress_callback: Option<&dyn Fn(&ExtractProgress)>,
    ) -> Result<(Table, ExtractProgress)> {
        self.journal.record("Starting extraction phase")?;

        let mut progress = ExtractProgress::new(files.len());
        let mut combined = Table::new();

        for file in files {
            progress.current_file = Some(file.filename.clone());

            let (table, error) = self.extract_with_policy(&file.path)?;
            if let Some(note) = error {
                progress.errors.push(note);
            }

            progress.files_processed += 1;
            progress.records_extracted += table.len();
            combined.extend(table);

            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        self.journal.record(&format!(
            "Extraction phase completed ({} files processed)",
            files.len()
        ))?;

        Ok((combined, progress))
    }
}
