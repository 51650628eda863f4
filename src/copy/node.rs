//! Classification of walk entries into the node kinds a tree copy handles.

use std::fs::{self, FileType};
use std::os::unix::fs::{FileTypeExt, PermissionsExt};
use std::path::{Path, PathBuf};
use walkdir::DirEntry;

use crate::error::CopyError;

/// Permission bits carried over to the copy (rwx plus setuid/setgid/sticky).
const MODE_MASK: u32 = 0o7777;

/// One entry met during a tree walk, with its path relative to the walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilesystemNode {
    Directory { relative: PathBuf, mode: u32 },
    RegularFile { relative: PathBuf, mode: u32 },
    Symlink { relative: PathBuf, target: PathBuf },
}

impl FilesystemNode {
    /// Classify a walk entry. Devices, sockets and FIFOs are rejected here.
    pub fn from_entry(root: &Path, entry: &DirEntry) -> Result<Self, CopyError> {
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            let target =
                fs::read_link(path).map_err(|e| CopyError::io("read symlink", path, e))?;
            return Ok(Self::Symlink { relative, target });
        }
        if !file_type.is_dir() && !file_type.is_file() {
            return Err(CopyError::UnsupportedNodeType {
                path: path.to_path_buf(),
                kind: node_kind_name(&file_type),
            });
        }

        let metadata = entry.metadata().map_err(|e| CopyError::Walk {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mode = metadata.permissions().mode() & MODE_MASK;
        if file_type.is_dir() {
            Ok(Self::Directory { relative, mode })
        } else {
            Ok(Self::RegularFile { relative, mode })
        }
    }

    pub fn relative(&self) -> &Path {
        match self {
            Self::Directory { relative, .. }
            | Self::RegularFile { relative, .. }
            | Self::Symlink { relative, .. } => relative,
        }
    }
}

/// Human-readable name of a file type, for error messages.
pub fn node_kind_name(file_type: &FileType) -> &'static str {
    if file_type.is_dir() {
        "directory"
    } else if file_type.is_file() {
        "regular file"
    } else if file_type.is_symlink() {
        "symlink"
    } else if file_type.is_fifo() {
        "fifo"
    } else if file_type.is_socket() {
        "socket"
    } else if file_type.is_block_device() {
        "block device"
    } else if file_type.is_char_device() {
        "character device"
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use walkdir::WalkDir;

    fn entries(root: &Path) -> Vec<FilesystemNode> {
        WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| FilesystemNode::from_entry(root, &entry.unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_classifies_nodes_with_relative_paths() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("dir")).unwrap();
        fs::write(root.join("dir/file"), "x").unwrap();
        fs::set_permissions(root.join("dir/file"), fs::Permissions::from_mode(0o640)).unwrap();
        std::os::unix::fs::symlink("dir/file", root.join("link")).unwrap();

        let nodes = entries(&root);

        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].relative(), Path::new(""));
        assert!(matches!(nodes[0], FilesystemNode::Directory { .. }));
        assert_eq!(nodes[1].relative(), Path::new("dir"));
        assert!(matches!(nodes[1], FilesystemNode::Directory { .. }));
        assert_eq!(
            nodes[2],
            FilesystemNode::RegularFile {
                relative: PathBuf::from("dir/file"),
                mode: 0o640,
            }
        );
        assert_eq!(
            nodes[3],
            FilesystemNode::Symlink {
                relative: PathBuf::from("link"),
                target: PathBuf::from("dir/file"),
            }
        );
    }

    #[test]
    fn test_kind_names() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f");
        fs::write(&file, "").unwrap();

        let dir_type = fs::symlink_metadata(temp.path()).unwrap().file_type();
        let file_type = fs::symlink_metadata(&file).unwrap().file_type();
        let null_type = fs::symlink_metadata("/dev/null").unwrap().file_type();

        assert_eq!(node_kind_name(&dir_type), "directory");
        assert_eq!(node_kind_name(&file_type), "regular file");
        assert_eq!(node_kind_name(&null_type), "character device");
    }
}
