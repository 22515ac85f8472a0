//! Core types for sizemap.
//!
//! This crate provides the data structures shared by the scanner, the
//! shortcut generator and the CLI: the size tree, scan configuration,
//! errors and warnings, and tree flattening for cross-tree ranking.

mod config;
mod error;
mod node;
mod tree;

pub use config::{
    DEFAULT_DU_TIMEOUT, DEFAULT_MAX_DEPTH, EstimatorStrategy, ScanConfig, ScanConfigBuilder,
    ScanConfigBuilderError,
};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use node::{NodeKind, SizeOrigin, TreeNode};
pub use tree::{FileTree, FlatItem, ItemKind, TreeStats, flatten, rank_largest};
