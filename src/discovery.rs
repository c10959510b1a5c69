use crate::config::DiscoveryConfig;
use crate::error::{Result, TabFuseError};
use regex::Regex;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// One candidate input file, identified at discovery time. Which extractor
/// (if any) interprets it is decided later by the dispatcher.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub path: PathBuf,
    pub filename: String,
    pub extension: String,
    pub size: u64,
    pub modified: SystemTime,
}

impl InputFile {
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            path,
            filename,
            extension,
            size,
            modified,
        }
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Result of scanning an input directory: the candidate files plus notes for
/// anything skipped before dispatch (oversized files, excluded names).
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub files: Vec<InputFile>,
    pub skipped: Vec<String>,
}

/// Non-recursive scanner over a single input directory.
///
/// A candidate must be a regular file whose name contains a literal dot.
/// The journal file and the output file are excluded so repeated runs do not
/// re-ingest their own artifacts.
pub struct InputScanner {
    exclude_patterns: Vec<Regex>,
    reserved_names: Vec<OsString>,
    max_file_size: u64,
}

impl InputScanner {
    pub fn new(config: &DiscoveryConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            exclude_patterns,
            reserved_names: Vec::new(),
            max_file_size: config.max_file_size,
        }
    }

    /// Exclude the given paths (journal, output) from discovery by file name.
    pub fn with_reserved_paths(mut self, paths: &[&Path]) -> Self {
        self.reserved_names = paths
            .iter()
            .filter_map(|p| p.file_name().map(OsString::from))
            .collect();
        self
    }

    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<ScanOutcome> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(TabFuseError::InputDirNotFound {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(TabFuseError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut outcome = ScanOutcome::default();

        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    outcome.skipped.push(format!("Scan error: {}", err));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().to_string();

            // Candidate rule: any file name containing a literal dot.
            if !filename.contains('.') {
                continue;
            }

            if self.is_reserved(entry.file_name()) {
                continue;
            }

            if self.is_excluded(&filename) {
                outcome
                    .skipped
                    .push(format!("Excluded by pattern: {}", filename));
                continue;
            }

            let metadata = entry.metadata().map_err(|e| {
                TabFuseError::InvalidPath {
                    path: format!("{}: {}", entry.path().display(), e),
                }
            })?;

            if metadata.len() > self.max_file_size {
                outcome.skipped.push(format!(
                    "Skipping oversized file {} ({} bytes, limit {} bytes)",
                    filename,
                    metadata.len(),
                    self.max_file_size
                ));
                continue;
            }

            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            outcome
                .files
                .push(InputFile::new(entry.into_path(), metadata.len(), modified));
        }

        if outcome.files.is_empty() {
            return Err(TabFuseError::NoInputFiles {
                path: root_path.display().to_string(),
            });
        }

        // Sort by file name for deterministic output order
        outcome.files.sort_by(|a, b| a.filename.cmp(&b.filename));

        Ok(outcome)
    }

    fn is_reserved(&self, filename: &std::ffi::OsStr) -> bool {
        self.reserved_names.iter().any(|name| name == filename)
    }

    fn is_excluded(&self, filename: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(filename))
    }

    pub fn statistics(&self, files: &[InputFile]) -> ScanStatistics {
        let total_files = files.len();
        let total_size = files.iter().map(|f| f.size).sum();

        let mut files_by_extension = HashMap::new();
        for file in files {
            let ext = if file.extension.is_empty() {
                "no_extension".to_string()
            } else {
                file.extension.clone()
            };
            *files_by_extension.entry(ext).or_insert(0) += 1;
        }

        ScanStatistics {
            total_files,
            total_size,
            files_by_extension,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub files_by_extension: HashMap<String, usize>,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan results:\n  Total files: {}\n  Total size: {} bytes\n",
            self.total_files, self.total_size
        );

        if !self.files_by_extension.is_empty() {
            summary.push_str("  Files by type:\n");
            let mut extensions: Vec<_> = self.files_by_extension.iter().collect();
            extensions.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

            for (ext, count) in extensions {
                summary.push_str(&format!("    {}: {} files\n", ext, count));
            }
        }

        summary
    }
}
