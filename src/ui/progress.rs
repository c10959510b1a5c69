use crate::extract::ExtractProgress;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    pub fn create_file_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_files));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} files {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message("Extracting files...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn update_extract_progress(pb: &ProgressBar, progress: &ExtractProgress) {
    pb.set_position(progress.files_processed as u64);
    if let Some(ref current) = progress.current_file {
        pb.set_message(format!(
            "{} ({} records)",
            current, progress.records_extracted
        ));
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, elapsed: Duration) {
    pb.finish_with_message(format!("{} in {:.2?}", message, elapsed));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_manager_hands_out_hidden_bars() {
        let manager = ProgressManager::new(false);
        assert!(!manager.is_enabled());

        let pb = manager.create_file_progress(10);
        assert!(pb.is_hidden());
    }

    #[test]
    fn test_progress_updates_track_extraction() {
        let manager = ProgressManager::new(false);
        let pb = manager.create_file_progress(3);

        let mut progress = ExtractProgress::new(3);
        progress.files_processed = 2;
        progress.records_extracted = 5;
        progress.current_file = Some("b.xml".to_string());

        update_extract_progress(&pb, &progress);
        assert_eq!(pb.position(), 2);
    }
}
