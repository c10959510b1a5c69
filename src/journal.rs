use crate::error::Result;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Separator appended after every completed run.
pub const RUN_SEPARATOR: &str = "#############################################################################################################";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only sink for the human-readable run journal.
///
/// Every pipeline phase receives a `&dyn RunJournal` instead of writing to a
/// process-wide file, so tests can swap in [`MemoryJournal`].
pub trait RunJournal {
    fn record(&self, message: &str) -> Result<()>;
}

/// File-backed journal. Appends one `"<timestamp> - <message>"` line per
/// event, creating the file if absent and never truncating it. The file is
/// opened and closed per call; no handle is held across the run.
pub struct FileJournal {
    path: PathBuf,
}

impl FileJournal {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RunJournal for FileJournal {
    fn record(&self, message: &str) -> Result<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{} - {}", timestamp, message)?;
        Ok(())
    }
}

/// In-memory journal for tests.
#[derive(Default)]
pub struct MemoryJournal {
    lines: Mutex<Vec<String>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl RunJournal for MemoryJournal {
    fn record(&self, message: &str) -> Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.to_string());
        Ok(())
    }
}
