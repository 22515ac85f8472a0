//! Directory sizing engine for sizemap.
//!
//! # Overview
//!
//! `sizemap-scan` walks a directory tree depth-first and builds a size
//! tree where every directory's size is the sum of its children. Key
//! behavior:
//!
//! - **Depth cutoff**: directories at `max_depth` are not enumerated;
//!   their size comes from a [`SizeEstimator`] (`du`, then a manual walk)
//! - **Best effort**: unreadable entries and directories never abort a
//!   scan; they become zero-sized or estimated nodes plus a warning
//! - **Hidden entries and symlinks** are excluded everywhere
//! - **Progress updates** via broadcast channels
//!
//! # Example
//!
//! ```rust,no_run
//! use sizemap_scan::{ScanConfig, Walker};
//!
//! let config = ScanConfig::new("/path/to/scan");
//! let tree = Walker::new(config).scan().unwrap();
//!
//! println!("Total size: {} bytes", tree.total_size());
//! for item in tree.largest(10) {
//!     println!("{:>12} {}", item.size, item.path.display());
//! }
//! ```

mod estimate;
mod fs;
mod progress;
mod walker;

pub use estimate::{DuError, DuProbe, SizeEstimator, SizeProbe, WalkProbe, parse_du_output};
pub use fs::{DirEntryInfo, EntryKind, FileSystem, Listing, StdFs};
pub use progress::ScanProgress;
pub use walker::{Walker, scan_path};

// Re-export core types for convenience
pub use sizemap_core::{
    EstimatorStrategy, FileTree, NodeKind, ScanConfig, ScanError, ScanWarning, SizeOrigin,
    TreeNode, TreeStats, WarningKind,
};
