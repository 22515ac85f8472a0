//! Size tree container, statistics, and flattening.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::error::ScanWarning;
use crate::node::{NodeKind, TreeNode};

/// Summary statistics for a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total size in bytes.
    pub total_size: u64,
    /// Number of file nodes.
    pub total_files: u64,
    /// Number of directory nodes, root included.
    pub total_dirs: u64,
    /// Directories sized by the estimator instead of enumeration.
    pub estimated_dirs: u64,
    /// Symbolic links skipped.
    pub skipped_symlinks: u64,
    /// Hidden entries skipped.
    pub skipped_hidden: u64,
    /// Entries or directories that could not be read.
    pub read_errors: u64,
    /// Deepest level visited (root = 0).
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file.
    pub fn record_file(&mut self, depth: u32) {
        self.total_files += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.total_dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a directory sized by the estimator.
    pub fn record_estimate(&mut self) {
        self.estimated_dirs += 1;
    }

    /// Record a skipped symlink.
    pub fn record_symlink(&mut self) {
        self.skipped_symlinks += 1;
    }

    /// Record skipped hidden entries.
    pub fn record_hidden(&mut self, count: u64) {
        self.skipped_hidden += count;
    }

    /// Record a read or metadata error.
    pub fn record_error(&mut self) {
        self.read_errors += 1;
    }
}

/// Complete scan result with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTree {
    /// Root node of the tree.
    pub root: TreeNode,

    /// Canonical root path that was scanned.
    pub root_path: PathBuf,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Scan configuration used.
    pub config: ScanConfig,

    /// Summary statistics.
    pub stats: TreeStats,

    /// Warnings encountered during scan.
    pub warnings: Vec<ScanWarning>,
}

impl FileTree {
    /// Create a new file tree.
    pub fn new(
        root: TreeNode,
        root_path: PathBuf,
        config: ScanConfig,
        stats: TreeStats,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            root,
            root_path,
            scanned_at: SystemTime::now(),
            scan_duration,
            config,
            stats,
            warnings,
        }
    }

    /// Get the total size of the tree.
    pub fn total_size(&self) -> u64 {
        self.root.size
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The `n` largest items anywhere in the tree.
    pub fn largest(&self, n: usize) -> Vec<FlatItem<'_>> {
        rank_largest(&self.root, n)
    }
}

/// Kind of a flattened item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemKind {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "dir")]
    Dir,
}

impl From<&NodeKind> for ItemKind {
    fn from(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::File => ItemKind::File,
            NodeKind::Directory { .. } => ItemKind::Dir,
        }
    }
}

/// One node of a tree, without its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlatItem<'a> {
    pub name: &'a str,
    pub path: &'a Path,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: ItemKind,
}

impl<'a> From<&'a TreeNode> for FlatItem<'a> {
    fn from(node: &'a TreeNode) -> Self {
        Self {
            name: node.name.as_str(),
            path: &node.path,
            size: node.size,
            kind: ItemKind::from(&node.kind),
        }
    }
}

/// Pre-order list of every node: the root first, then each child
/// subtree in stored order.
pub fn flatten(root: &TreeNode) -> Vec<FlatItem<'_>> {
    let mut items = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        items.push(FlatItem::from(node));
        stack.extend(node.children().iter().rev());
    }
    items
}

/// The `n` largest items of the tree, directories and files ranked
/// together, largest first.
pub fn rank_largest(root: &TreeNode, n: usize) -> Vec<FlatItem<'_>> {
    let mut items = flatten(root);
    items.sort_by(|a, b| b.size.cmp(&a.size));
    items.truncate(n);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::directory(
            "root",
            "/root",
            vec![
                TreeNode::file("a", "/root/a", 100),
                TreeNode::directory("b", "/root/b", vec![TreeNode::file("c", "/root/b/c", 200)]),
            ],
        )
    }

    #[test]
    fn test_tree_stats_default() {
        let stats = TreeStats::default();
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.total_dirs, 0);
    }

    #[test]
    fn test_tree_stats_record() {
        let mut stats = TreeStats::new();
        stats.record_file(2);
        stats.record_dir(1);
        stats.record_hidden(3);

        assert_eq!(stats.total_files, 1);
        assert_eq!(stats.total_dirs, 1);
        assert_eq!(stats.skipped_hidden, 3);
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn test_flatten_preorder() {
        let root = sample();
        let names: Vec<&str> = flatten(&root).iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["root", "b", "c", "a"]);
    }

    #[test]
    fn test_rank_largest() {
        let root = sample();
        let top = rank_largest(&root, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "root");
        assert_eq!(top[0].size, 300);
        assert_eq!(top[0].kind, ItemKind::Dir);
        // b and c tie at 200; the stable sort keeps pre-order.
        assert_eq!(top[1].name, "b");
    }
}
