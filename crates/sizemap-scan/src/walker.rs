//! Depth-bounded recursive directory sizing.

use std::path::{Path, PathBuf};
use std::time::Instant;

use compact_str::CompactString;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use sizemap_core::{
    FileTree, ScanConfig, ScanError, ScanWarning, SizeOrigin, TreeNode, TreeStats,
};

use crate::estimate::SizeEstimator;
use crate::fs::{EntryKind, FileSystem, Listing, StdFs};
use crate::progress::{ProgressTracker, ScanProgress};

/// Sequential depth-first walker.
///
/// Directories shallower than `max_depth` are enumerated and their size is
/// the sum of their children. At `max_depth`, or when listing is refused,
/// the [`SizeEstimator`] supplies an aggregate size instead. Hidden entries
/// and symbolic links are never counted.
pub struct Walker<F = StdFs> {
    fs: F,
    estimator: SizeEstimator,
    config: ScanConfig,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl Walker<StdFs> {
    /// Walker over the real filesystem with the configured estimator.
    pub fn new(config: ScanConfig) -> Self {
        let estimator = SizeEstimator::from_config(&config);
        Self::with_parts(StdFs, estimator, config)
    }
}

impl<F: FileSystem> Walker<F> {
    /// Walker with an explicit filesystem and estimator.
    pub fn with_parts(fs: F, estimator: SizeEstimator, config: ScanConfig) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            fs,
            estimator,
            config,
            progress_tx,
        }
    }

    /// Subscribe to scan progress updates, sent after each directory.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// The configuration this walker scans with.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan the configured root.
    ///
    /// Fails only when the root cannot be resolved. Everything below the
    /// root is absorbed into the tree as zero-sized or estimated nodes and
    /// reported through [`FileTree::warnings`].
    pub fn scan(&self) -> Result<FileTree, ScanError> {
        let start = Instant::now();
        let root_path = self
            .fs
            .canonicalize(&self.config.root)
            .map_err(|e| ScanError::io(&self.config.root, e))?;

        info!(
            root = %root_path.display(),
            max_depth = self.config.max_depth,
            estimator = ?self.estimator.probe_names(),
            "starting scan"
        );

        let mut ctx = ScanContext::new();
        let root = self.walk(&root_path, 0, &mut ctx);
        ctx.stats.total_size = root.size;

        let scan_duration = start.elapsed();
        let progress = ctx.progress.snapshot();
        info!(
            total = %format_size(root.size),
            files = ctx.stats.total_files,
            dirs = ctx.stats.total_dirs,
            items = progress.total_items(),
            rate = %format!("{}/s", format_size(progress.bytes_per_second() as u64)),
            warnings = ctx.warnings.len(),
            elapsed = ?scan_duration,
            "scan complete"
        );

        Ok(FileTree::new(
            root,
            root_path,
            self.config.clone(),
            ctx.stats,
            scan_duration,
            ctx.warnings,
        ))
    }

    /// Size one path as if it sat at `depth` below the scan root.
    ///
    /// Never fails: an unresolvable path is used as given and sizes to
    /// whatever the fallbacks produce.
    pub fn scan_node(&self, path: &Path, depth: u32) -> TreeNode {
        let path = self
            .fs
            .canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf());
        self.walk(&path, depth, &mut ScanContext::new())
    }

    fn walk(&self, path: &Path, depth: u32, ctx: &mut ScanContext) -> TreeNode {
        let name = TreeNode::name_for(path);

        if self.fs.is_file(path) {
            let size = self.fs.file_len(path).unwrap_or(0);
            ctx.record_file(size, depth);
            return TreeNode::file(name, path, size);
        }

        ctx.stats.record_dir(depth);

        if depth >= self.config.max_depth {
            let size = self.estimate(path, ctx);
            info!(depth, path = %path.display(), size = %format_size(size), "max depth, estimated");
            self.finish_dir(path, ctx);
            return TreeNode::unexpanded(name, path, size, SizeOrigin::DepthLimit);
        }

        debug!(depth, path = %path.display(), "scanning");

        let entries = match self.fs.list(path) {
            Listing::Entries(entries) => entries,
            Listing::PermissionDenied => {
                let size = self.estimate(path, ctx);
                info!(path = %path.display(), size = %format_size(size), "permission denied, estimated");
                ctx.warn(ScanWarning::permission_denied(path));
                self.finish_dir(path, ctx);
                return TreeNode::unexpanded(name, path, size, SizeOrigin::PermissionDenied);
            }
            Listing::Failed(err) => {
                warn!(path = %path.display(), error = %err, "cannot read directory");
                ctx.warn(ScanWarning::read_error(path, &err));
                self.finish_dir(path, ctx);
                return TreeNode::unexpanded(name, path, 0, SizeOrigin::ReadError);
            }
        };

        let mut children = Vec::with_capacity(entries.len());
        let mut dirs = 0u64;
        let mut files = 0u64;
        let mut hidden = 0u64;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "skipping unreadable entry");
                    ctx.warn(ScanWarning::metadata_error(path, &err));
                    continue;
                }
            };

            if entry.is_hidden() {
                hidden += 1;
                continue;
            }

            let child = match entry.kind {
                // Never followed: links can form cycles.
                EntryKind::Symlink => {
                    ctx.stats.record_symlink();
                    continue;
                }
                EntryKind::Directory => {
                    dirs += 1;
                    self.walk(&entry.path, depth + 1, ctx)
                }
                EntryKind::File | EntryKind::Other => {
                    files += 1;
                    let size = self.fs.file_len(&entry.path).unwrap_or(0);
                    ctx.record_file(size, depth + 1);
                    TreeNode::file(
                        CompactString::new(entry.name.to_string_lossy()),
                        entry.path,
                        size,
                    )
                }
            };
            children.push(child);
        }

        ctx.stats.record_hidden(hidden);

        let node = TreeNode::directory(name, path, children);
        debug!(
            depth,
            path = %path.display(),
            dirs,
            files,
            size = %format_size(node.size),
            "done"
        );
        self.finish_dir(path, ctx);
        node
    }

    fn estimate(&self, path: &Path, ctx: &mut ScanContext) -> u64 {
        ctx.stats.record_estimate();
        match self.estimator.try_estimate(path) {
            Some(size) => {
                ctx.progress.record_estimate(size);
                size
            }
            None => {
                warn!(path = %path.display(), "no estimator could size directory");
                ctx.warn(ScanWarning::estimate_failed(path));
                0
            }
        }
    }

    fn finish_dir(&self, path: &Path, ctx: &mut ScanContext) {
        ctx.progress.finish_dir(path);
        // No subscribers is fine.
        let _ = self.progress_tx.send(ctx.progress.snapshot());
    }
}

/// Counters and warnings threaded through one scan.
struct ScanContext {
    stats: TreeStats,
    warnings: Vec<ScanWarning>,
    progress: ProgressTracker,
}

impl ScanContext {
    fn new() -> Self {
        Self {
            stats: TreeStats::new(),
            warnings: Vec::new(),
            progress: ProgressTracker::new(),
        }
    }

    fn record_file(&mut self, size: u64, depth: u32) {
        self.stats.record_file(depth);
        self.progress.record_file(size);
    }

    fn warn(&mut self, warning: ScanWarning) {
        self.stats.record_error();
        self.progress.record_error();
        self.warnings.push(warning);
    }
}

fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Scan `root` with default settings and the given depth.
pub fn scan_path(root: impl Into<PathBuf>, max_depth: u32) -> Result<FileTree, ScanError> {
    let mut config = ScanConfig::new(root);
    config.max_depth = max_depth;
    Walker::new(config).scan()
}
