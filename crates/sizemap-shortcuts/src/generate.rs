//! Ranked shortcut generation.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use sizemap_core::{FlatItem, ItemKind, TreeNode, rank_largest};

use crate::format::ShortcutFormat;

/// Subdirectory for directory shortcuts.
pub const FOLDERS_DIR: &str = "folders";

/// Subdirectory for file shortcuts.
pub const FILES_DIR: &str = "files";

/// Errors that stop shortcut generation as a whole.
#[derive(Debug, Error)]
pub enum ShortcutError {
    /// The output directory could not be prepared.
    #[error("cannot prepare shortcuts directory {path}: {source}")]
    Prepare {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where and how many shortcuts to write.
#[derive(Debug, Clone)]
pub struct ShortcutConfig {
    /// Output directory. Replaced on every run.
    pub dir: PathBuf,
    /// Number of largest items to link.
    pub count: usize,
    /// Pointer file format.
    pub format: ShortcutFormat,
}

impl ShortcutConfig {
    pub fn new(dir: impl Into<PathBuf>, count: usize) -> Self {
        Self {
            dir: dir.into(),
            count,
            format: ShortcutFormat::native(),
        }
    }

    pub fn with_format(mut self, format: ShortcutFormat) -> Self {
        self.format = format;
        self
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutSummary {
    /// Shortcut files written.
    pub created: usize,
    /// Items whose shortcut could not be written.
    pub failed: usize,
    /// Paths of the written files, in rank order.
    pub files: Vec<PathBuf>,
}

/// Write one shortcut per top-ranked item of `tree`.
///
/// Directories and files share one ranking. Shortcuts are split into
/// `folders/` and `files/` and named `{rank:03}_{size_mb}MB_{name}.{ext}`
/// so they sort by rank in a file browser. A failure on one item is
/// logged and counted, and the remaining items are still written.
pub fn generate(tree: &TreeNode, config: &ShortcutConfig) -> Result<ShortcutSummary, ShortcutError> {
    let top = rank_largest(tree, config.count);
    prepare_dir(&config.dir)?;

    let mut summary = ShortcutSummary::default();
    for (index, item) in top.iter().enumerate() {
        let target = shortcut_path(&config.dir, index + 1, item, config.format);
        match fs::write(&target, config.format.render(item.name, item.path)) {
            Ok(()) => {
                summary.created += 1;
                summary.files.push(target);
            }
            Err(err) => {
                warn!(item = %item.path.display(), error = %err, "could not create shortcut");
                summary.failed += 1;
            }
        }
    }

    info!(
        created = summary.created,
        failed = summary.failed,
        dir = %config.dir.display(),
        "shortcuts written"
    );
    Ok(summary)
}

/// File name for the item at 1-based `rank`.
pub fn shortcut_file_name(rank: usize, item: &FlatItem<'_>, format: ShortcutFormat) -> String {
    let size_mb = item.size as f64 / (1024.0 * 1024.0);
    let safe_name = item.name.replace(['/', ':'], "_");
    format!("{rank:03}_{size_mb:.0}MB_{safe_name}.{}", format.extension())
}

fn shortcut_path(dir: &Path, rank: usize, item: &FlatItem<'_>, format: ShortcutFormat) -> PathBuf {
    let subdir = match item.kind {
        ItemKind::Dir => FOLDERS_DIR,
        ItemKind::File => FILES_DIR,
    };
    dir.join(subdir).join(shortcut_file_name(rank, item, format))
}

fn prepare_dir(dir: &Path) -> Result<(), ShortcutError> {
    let prepare = |source: std::io::Error| ShortcutError::Prepare {
        path: dir.to_path_buf(),
        source,
    };
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(prepare)?;
    }
    fs::create_dir_all(dir.join(FOLDERS_DIR)).map_err(prepare)?;
    fs::create_dir_all(dir.join(FILES_DIR)).map_err(prepare)?;
    Ok(())
}
