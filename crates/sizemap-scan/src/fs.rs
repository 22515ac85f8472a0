//! Filesystem access behind a trait, with explicit outcomes.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What a directory entry is, without following links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// Sockets, devices, FIFOs. Sized like files.
    Other,
}

impl From<fs::FileType> for EntryKind {
    fn from(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone)]
pub struct DirEntryInfo {
    pub name: OsString,
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl DirEntryInfo {
    /// Names starting with a dot are hidden.
    pub fn is_hidden(&self) -> bool {
        self.name.as_encoded_bytes().starts_with(b".")
    }
}

/// Outcome of listing a directory.
#[derive(Debug)]
pub enum Listing {
    /// The directory was read. Individual entries may still have failed.
    Entries(Vec<io::Result<DirEntryInfo>>),
    /// Listing was refused; the caller should estimate instead.
    PermissionDenied,
    /// Listing failed for another reason.
    Failed(io::Error),
}

/// The filesystem operations the walker needs.
pub trait FileSystem {
    /// Absolute form of `path` with links resolved.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Whether the path, after following links, is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Length in bytes, or `None` if it cannot be read.
    fn file_len(&self, path: &Path) -> Option<u64>;

    /// List the entries of a directory.
    fn list(&self, path: &Path) -> Listing;
}

/// `FileSystem` backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl FileSystem for StdFs {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn file_len(&self, path: &Path) -> Option<u64> {
        fs::metadata(path).ok().map(|m| m.len())
    }

    fn list(&self, path: &Path) -> Listing {
        let read_dir = match fs::read_dir(path) {
            Ok(rd) => rd,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                return Listing::PermissionDenied;
            }
            Err(err) => return Listing::Failed(err),
        };

        let entries = read_dir
            .map(|entry| {
                let entry = entry?;
                let kind = EntryKind::from(entry.file_type()?);
                Ok(DirEntryInfo {
                    name: entry.file_name(),
                    path: entry.path(),
                    kind,
                })
            })
            .collect();

        Listing::Entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hidden_detection() {
        let entry = DirEntryInfo {
            name: ".cache".into(),
            path: PathBuf::from("/home/u/.cache"),
            kind: EntryKind::Directory,
        };
        assert!(entry.is_hidden());

        let entry = DirEntryInfo {
            name: "cache".into(),
            path: PathBuf::from("/home/u/cache"),
            kind: EntryKind::Directory,
        };
        assert!(!entry.is_hidden());
    }

    #[test]
    fn test_std_fs_listing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("file.txt"), "hello").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();

        let Listing::Entries(entries) = StdFs.list(temp.path()) else {
            panic!("expected entries");
        };
        let mut entries: Vec<_> = entries.into_iter().map(Result::unwrap).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].kind, EntryKind::Directory);
        assert_eq!(StdFs.file_len(&entries[0].path), Some(5));
    }

    #[test]
    fn test_std_fs_missing_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        assert!(matches!(StdFs.list(&missing), Listing::Failed(_)));
        assert_eq!(StdFs.file_len(&missing), None);
        assert!(!StdFs.is_file(&missing));
    }

    #[cfg(unix)]
    #[test]
    fn test_std_fs_symlink_not_followed() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("target")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("target"), temp.path().join("link")).unwrap();

        let Listing::Entries(entries) = StdFs.list(temp.path()) else {
            panic!("expected entries");
        };
        let link = entries
            .into_iter()
            .map(Result::unwrap)
            .find(|e| e.name.to_str() == Some("link"))
            .unwrap();
        assert_eq!(link.kind, EntryKind::Symlink);
    }
}
