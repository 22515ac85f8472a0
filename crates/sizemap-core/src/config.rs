//! Scan configuration types.

use std::path::PathBuf;
use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default maximum recursion depth.
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default time limit for one bulk `du` invocation.
pub const DEFAULT_DU_TIMEOUT: Duration = Duration::from_secs(30);

/// Which probes the size estimator uses for unexpanded directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorStrategy {
    /// Bulk `du` first, manual walk when it fails.
    #[default]
    Auto,
    /// Bulk `du` only; zero when it fails.
    BulkOnly,
    /// Manual walk only.
    ManualOnly,
}

/// Configuration for scanning operations.
///
/// Hidden entries are always excluded and symbolic links are never
/// followed; neither is configurable.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Depth at which directories stop being enumerated. The root is at
    /// depth 0.
    #[builder(default = "DEFAULT_MAX_DEPTH")]
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Estimator probe chain.
    #[builder(default)]
    #[serde(default)]
    pub estimator: EstimatorStrategy,

    /// Time limit for one bulk `du` invocation.
    #[builder(default = "DEFAULT_DU_TIMEOUT")]
    #[serde(default = "default_du_timeout")]
    pub du_timeout: Duration,
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_du_timeout() -> Duration {
    DEFAULT_DU_TIMEOUT
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if let Some(timeout) = self.du_timeout {
            if timeout.is_zero() {
                return Err("du timeout must be greater than zero".to_string());
            }
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            estimator: EstimatorStrategy::Auto,
            du_timeout: DEFAULT_DU_TIMEOUT,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
