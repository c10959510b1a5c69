use crate::error::{Result, TabFuseError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Ctrl-C handling: the first interrupt asks the pipeline to stop at the
/// next phase boundary, the second force-exits.
pub struct GracefulShutdown {
    running: Arc<AtomicBool>,
}

impl GracefulShutdown {
    pub fn new() -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let interrupted = Arc::new(AtomicBool::new(false));

        ctrlc::set_handler(move || {
            running_clone.store(false, Ordering::SeqCst);

            if !interrupted.swap(true, Ordering::SeqCst) {
                eprintln!("\nStopping after the current phase... (press Ctrl+C again to force exit)");
            } else {
                std::process::exit(130);
            }
        })
        .map_err(|e| TabFuseError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(Self { running })
    }

    /// For tests: no signal handler registration (a process may only
    /// install one).
    pub fn new_for_test() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if !self.is_running() {
            return Err(TabFuseError::Cancelled);
        }
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
