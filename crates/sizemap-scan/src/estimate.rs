//! Aggregate size estimation for directories that are not enumerated.
//!
//! A [`SizeEstimator`] owns an ordered chain of [`SizeProbe`]s and returns
//! the first answer any of them gives. The standard chain asks `du` first
//! and falls back to walking the subtree in-process. Both probes skip
//! symbolic links and treat unreadable entries as absent, so switching
//! probes changes cost, not counting policy.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use jwalk::{Parallelism, WalkDir};
use thiserror::Error;
use tracing::debug;

use sizemap_core::{EstimatorStrategy, ScanConfig};

/// Longest sleep between polls of a running `du`.
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A way of measuring the total size of a directory subtree.
pub trait SizeProbe: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Total size in bytes, or `None` if this probe cannot answer.
    fn probe(&self, path: &Path) -> Option<u64>;
}

/// Reasons a `du` invocation produced no usable answer.
#[derive(Debug, Error)]
pub enum DuError {
    #[error("failed to spawn du: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed waiting for du: {0}")]
    Wait(#[source] std::io::Error),

    #[error("du timed out after {0:?}")]
    Timeout(Duration),

    #[error("du exited with {0}")]
    Status(ExitStatus),

    #[error("unparseable du output: {0:?}")]
    Parse(String),
}

/// Bulk measurement through `du -sk`.
#[derive(Debug, Clone)]
pub struct DuProbe {
    program: PathBuf,
    timeout: Duration,
}

impl DuProbe {
    /// Probe running the `du` found on `PATH`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: PathBuf::from("du"),
            timeout,
        }
    }

    /// Use a different executable. It must accept `-sk <path>` and print
    /// a size in KiB as its first token.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Run `du` and return the size in bytes.
    pub fn measure(&self, path: &Path) -> Result<u64, DuError> {
        let mut child = Command::new(&self.program)
            .arg("-sk")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(DuError::Spawn)?;

        let deadline = Instant::now() + self.timeout;
        let mut interval = Duration::from_millis(1);
        let status = loop {
            if let Some(status) = child.try_wait().map_err(DuError::Wait)? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(DuError::Timeout(self.timeout));
            }
            thread::sleep(interval);
            interval = (interval * 2).min(MAX_POLL_INTERVAL);
        };

        if !status.success() {
            return Err(DuError::Status(status));
        }

        let mut output = String::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_string(&mut output).map_err(DuError::Wait)?;
        }
        parse_du_output(&output).ok_or(DuError::Parse(output))
    }
}

impl SizeProbe for DuProbe {
    fn name(&self) -> &'static str {
        "du"
    }

    fn probe(&self, path: &Path) -> Option<u64> {
        match self.measure(path) {
            Ok(size) => Some(size),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "du probe failed");
                None
            }
        }
    }
}

/// Parse the leading KiB count of `du -sk` output into bytes.
pub fn parse_du_output(output: &str) -> Option<u64> {
    output
        .split_whitespace()
        .next()?
        .parse::<u64>()
        .ok()
        .map(|kib| kib.saturating_mul(1024))
}

/// Manual measurement: walk the subtree and sum file lengths.
///
/// Sequential, links not followed, hidden entries included. An unreadable
/// directory drops only its own subtree.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkProbe;

impl WalkProbe {
    /// Sum of the lengths of every non-directory, non-link entry below `path`.
    pub fn walk_size(path: &Path) -> u64 {
        let walker = WalkDir::new(path)
            .parallelism(Parallelism::Serial)
            .skip_hidden(false)
            .follow_links(false);

        let mut total: u64 = 0;
        for entry in walker {
            let Ok(entry) = entry else {
                continue;
            };
            let file_type = entry.file_type();
            if file_type.is_dir() || file_type.is_symlink() {
                continue;
            }
            if let Ok(metadata) = entry.metadata() {
                total = total.saturating_add(metadata.len());
            }
        }
        total
    }
}

impl SizeProbe for WalkProbe {
    fn name(&self) -> &'static str {
        "walk"
    }

    fn probe(&self, path: &Path) -> Option<u64> {
        Some(Self::walk_size(path))
    }
}

/// Ordered chain of probes.
pub struct SizeEstimator {
    probes: Vec<Box<dyn SizeProbe>>,
}

impl SizeEstimator {
    /// Estimator with an explicit probe chain.
    pub fn new(probes: Vec<Box<dyn SizeProbe>>) -> Self {
        Self { probes }
    }

    /// Build the chain selected by the configuration.
    pub fn from_config(config: &ScanConfig) -> Self {
        let du = || Box::new(DuProbe::new(config.du_timeout)) as Box<dyn SizeProbe>;
        let walk = || Box::new(WalkProbe) as Box<dyn SizeProbe>;
        match config.estimator {
            EstimatorStrategy::Auto => Self::new(vec![du(), walk()]),
            EstimatorStrategy::BulkOnly => Self::new(vec![du()]),
            EstimatorStrategy::ManualOnly => Self::new(vec![walk()]),
        }
    }

    /// Append a probe to the end of the chain.
    pub fn with_probe(mut self, probe: impl SizeProbe + 'static) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    /// First answer from the chain, or `None` if every probe declined.
    pub fn try_estimate(&self, path: &Path) -> Option<u64> {
        for probe in &self.probes {
            if let Some(size) = probe.probe(path) {
                return Some(size);
            }
            debug!(path = %path.display(), probe = probe.name(), "probe declined, falling through");
        }
        None
    }

    /// Total size of `path`; zero when nothing could measure it.
    pub fn estimate(&self, path: &Path) -> u64 {
        self.try_estimate(path).unwrap_or(0)
    }

    /// Names of the probes, in order.
    pub fn probe_names(&self) -> Vec<&'static str> {
        self.probes.iter().map(|p| p.name()).collect()
    }
}

impl Default for SizeEstimator {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

impl fmt::Debug for SizeEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizeEstimator")
            .field("probes", &self.probe_names())
            .finish()
    }
}
