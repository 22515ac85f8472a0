//! Scan progress reporting.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Progress information during a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanProgress {
    /// Number of directories finished so far.
    pub dirs_scanned: u64,
    /// Number of files sized so far.
    pub files_scanned: u64,
    /// Directories sized by the estimator so far.
    pub dirs_estimated: u64,
    /// Bytes accounted for so far (files plus estimated directories).
    pub bytes_scanned: u64,
    /// Directory that just finished.
    pub current_path: PathBuf,
    /// Number of errors/warnings encountered.
    pub errors_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            dirs_scanned: 0,
            files_scanned: 0,
            dirs_estimated: 0,
            bytes_scanned: 0,
            current_path: PathBuf::new(),
            errors_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate scan rate in bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.bytes_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get total items scanned (files + dirs).
    pub fn total_items(&self) -> u64 {
        self.files_scanned + self.dirs_scanned
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Running counters behind [`ScanProgress`] snapshots.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    progress: ScanProgress,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            progress: ScanProgress::new(),
        }
    }

    pub fn record_file(&mut self, size: u64) {
        self.progress.files_scanned += 1;
        self.progress.bytes_scanned += size;
    }

    pub fn record_estimate(&mut self, size: u64) {
        self.progress.dirs_estimated += 1;
        self.progress.bytes_scanned += size;
    }

    pub fn record_error(&mut self) {
        self.progress.errors_count += 1;
    }

    pub fn finish_dir(&mut self, path: &Path) {
        self.progress.dirs_scanned += 1;
        self.progress.current_path = path.to_path_buf();
    }

    pub fn snapshot(&self) -> ScanProgress {
        ScanProgress {
            elapsed: self.start_time.elapsed(),
            ..self.progress.clone()
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_snapshot() {
        let mut tracker = ProgressTracker::new();
        tracker.record_file(100);
        tracker.record_file(50);
        tracker.record_estimate(4096);
        tracker.record_error();
        tracker.finish_dir(Path::new("/data"));

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.files_scanned, 2);
        assert_eq!(snapshot.dirs_scanned, 1);
        assert_eq!(snapshot.dirs_estimated, 1);
        assert_eq!(snapshot.bytes_scanned, 4246);
        assert_eq!(snapshot.errors_count, 1);
        assert_eq!(snapshot.current_path, PathBuf::from("/data"));
        assert_eq!(snapshot.total_items(), 3);
    }

    #[test]
    fn test_rate_without_elapsed_time() {
        assert_eq!(ScanProgress::new().bytes_per_second(), 0.0);
    }
}
