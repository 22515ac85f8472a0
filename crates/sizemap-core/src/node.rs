//! Size tree node types.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize, Serializer};

/// How a directory's size was obtained.
///
/// Kept in memory only; the serialized report does not distinguish
/// enumerated directories from estimated ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeOrigin {
    /// Sum of the enumerated children.
    #[default]
    Enumerated,
    /// Depth cutoff reached; size came from the estimator.
    DepthLimit,
    /// Listing was refused; size came from the estimator.
    PermissionDenied,
    /// Listing failed for another reason; size is zero.
    ReadError,
}

impl SizeOrigin {
    /// Whether the size came from the estimator rather than from children.
    pub fn is_estimated(&self) -> bool {
        matches!(self, SizeOrigin::DepthLimit | SizeOrigin::PermissionDenied)
    }
}

/// Type of a size tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// Regular file (or anything that is neither a directory nor a link).
    #[serde(rename = "file")]
    File,
    /// Directory.
    #[serde(rename = "dir")]
    Directory {
        /// Children, sorted by size descending. Empty when the directory
        /// was not enumerated.
        children: Vec<TreeNode>,
        #[serde(skip, default)]
        origin: SizeOrigin,
    },
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory { .. })
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }

    /// Label used in reports and shortcut folders.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Directory { .. } => "dir",
        }
    }
}

/// A single file or directory in the size tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Base name of the path (full path for roots such as `/`).
    pub name: CompactString,

    /// Absolute path.
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,

    /// Size in bytes (aggregate for directories).
    pub size: u64,

    /// Node type and, for directories, children.
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl TreeNode {
    /// Create a file node.
    pub fn file(name: impl Into<CompactString>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size,
            kind: NodeKind::File,
        }
    }

    /// Create an enumerated directory node. The size is the sum of the
    /// children and the children are sorted by size descending.
    pub fn directory(
        name: impl Into<CompactString>,
        path: impl Into<PathBuf>,
        mut children: Vec<TreeNode>,
    ) -> Self {
        children.sort_by(|a, b| b.size.cmp(&a.size));
        let size = children.iter().map(|c| c.size).sum();
        Self {
            name: name.into(),
            path: path.into(),
            size,
            kind: NodeKind::Directory {
                children,
                origin: SizeOrigin::Enumerated,
            },
        }
    }

    /// Create a directory node whose children were not enumerated.
    pub fn unexpanded(
        name: impl Into<CompactString>,
        path: impl Into<PathBuf>,
        size: u64,
        origin: SizeOrigin,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size,
            kind: NodeKind::Directory {
                children: Vec::new(),
                origin,
            },
        }
    }

    /// Display name for a path: its final component, or the whole path
    /// when there is none.
    pub fn name_for(path: &Path) -> CompactString {
        match path.file_name() {
            Some(name) if !name.is_empty() => CompactString::new(name.to_string_lossy()),
            _ => CompactString::new(path.to_string_lossy()),
        }
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Children of a directory; empty for files.
    pub fn children(&self) -> &[TreeNode] {
        match &self.kind {
            NodeKind::Directory { children, .. } => children,
            NodeKind::File => &[],
        }
    }

    /// How the size of a directory was obtained. `None` for files.
    pub fn origin(&self) -> Option<SizeOrigin> {
        match &self.kind {
            NodeKind::Directory { origin, .. } => Some(*origin),
            NodeKind::File => None,
        }
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Number of file nodes in this subtree (1 for a file).
    pub fn file_count(&self) -> u64 {
        match &self.kind {
            NodeKind::File => 1,
            NodeKind::Directory { children, .. } => children.iter().map(|c| c.file_count()).sum(),
        }
    }

    /// Number of directory nodes below this one.
    pub fn dir_count(&self) -> u64 {
        self.children()
            .iter()
            .filter(|c| c.is_dir())
            .map(|c| c.dir_count() + 1)
            .sum()
    }

    /// Sort children by size in descending order, recursively.
    pub fn sort_children_by_size(&mut self) {
        if let NodeKind::Directory { children, .. } = &mut self.kind {
            children.sort_by(|a, b| b.size.cmp(&a.size));
            for child in children {
                child.sort_children_by_size();
            }
        }
    }
}

fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}
