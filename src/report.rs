use crate::discovery::InputFile;
use crate::extract::ExtractProgress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

/// Machine-readable record of one completed run, printed verbatim in JSON
/// output mode and rendered by the formatter otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub input_directory: String,
    pub output_path: String,
    pub summary: RunSummary,
    pub files: Vec<FileInfo>,
    pub completed_at: DateTime<Utc>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub files_discovered: usize,
    pub files_by_extension: HashMap<String, usize>,
    pub records_extracted: usize,
    pub duplicates_removed: usize,
    pub records_loaded: usize,
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub filename: String,
    pub extension: String,
    pub size: u64,
    pub modified: SystemTime,
}

impl From<&InputFile> for FileInfo {
    fn from(file: &InputFile) -> Self {
        Self {
            filename: file.filename.clone(),
            extension: file.extension.clone(),
            size: file.size,
            modified: file.modified,
        }
    }
}

impl RunReport {
    pub fn new(
        input_directory: String,
        output_path: String,
        files: &[InputFile],
        progress: &ExtractProgress,
        duplicates_removed: usize,
        records_loaded: usize,
        duration: Duration,
    ) -> Self {
        let mut files_by_extension: HashMap<String, usize> = HashMap::new();
        for file in files {
            let ext = if file.extension.is_empty() {
                "no_extension".to_string()
            } else {
                file.extension.clone()
            };
            *files_by_extension.entry(ext).or_insert(0) += 1;
        }

        let summary = RunSummary {
            files_discovered: files.len(),
            files_by_extension,
            records_extracted: progress.records_extracted,
            duplicates_removed,
            records_loaded,
            duration,
        };

        Self {
            input_directory,
            output_path,
            summary,
            files: files.iter().map(FileInfo::from).collect(),
            completed_at: Utc::now(),
            errors: progress.errors.clone(),
        }
    }
}
