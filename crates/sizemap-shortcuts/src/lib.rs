//! Pointer files to the largest items of a size tree.
//!
//! Given a scanned [`TreeNode`](sizemap_core::TreeNode), [`generate`]
//! ranks every node by size and writes a small shortcut file for each of
//! the top N, so an operator can jump straight to what is using space.

mod format;
mod generate;

pub use format::{ShortcutFormat, file_url};
pub use generate::{
    FILES_DIR, FOLDERS_DIR, ShortcutConfig, ShortcutError, ShortcutSummary, generate,
    shortcut_file_name,
};
