//! Recursive tree copy for assets.
//!
//! Walks a source directory (or a single file) in pre-order and replicates
//! it under a destination path:
//! - Directories (permission bits preserved)
//! - Regular files (bytes streamed, permission bits preserved)
//! - Symbolic links (literal target preserved, never followed or rewritten)
//!
//! Any other node kind aborts the copy. Nothing is rolled back: nodes copied
//! before a failure stay on disk.

mod node;

pub use node::{node_kind_name, FilesystemNode};

use serde::Serialize;
use std::fs::{self, File, Permissions};
use std::io;
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::CopyError;

/// Owner bits kept on while a directory's children are being created.
const OWNER_RWX: u32 = 0o700;

/// Counters for one tree copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyStats {
    pub directories: u64,
    pub files: u64,
    pub symlinks: u64,
    pub bytes: u64,
}

impl CopyStats {
    /// Total number of nodes created.
    pub fn nodes(&self) -> u64 {
        self.directories + self.files + self.symlinks
    }

    pub fn merge(&mut self, other: &CopyStats) {
        self.directories += other.directories;
        self.files += other.files;
        self.symlinks += other.symlinks;
        self.bytes += other.bytes;
    }
}

/// Copy `source` to `dest`.
///
/// `dest` itself is created from the root node, so it must not exist yet when
/// `source` is a directory. When `source` is a regular file, `dest` is the
/// file path and an existing file there is truncated.
///
/// Directory modes are applied after the walk, deepest first, so read-only
/// source directories can still be populated.
///
/// # Example
///
/// ```rust,ignore
/// use rootfs_assets::copy_tree;
/// use std::path::Path;
///
/// let stats = copy_tree(Path::new("/home/user/build/app"), Path::new("/tmp/rootfs/opt/app"))?;
/// println!("copied {} nodes", stats.nodes());
/// ```
pub fn copy_tree(source: &Path, dest: &Path) -> Result<CopyStats, CopyError> {
    let mut stats = CopyStats::default();
    let mut dir_modes: Vec<(PathBuf, u32)> = Vec::new();

    let walked = copy_entries(source, dest, &mut stats, &mut dir_modes);
    // Directories created before an abort get their exact modes too.
    let restored = restore_dir_modes(&dir_modes);
    walked?;
    restored?;

    Ok(stats)
}

fn copy_entries(
    source: &Path,
    dest: &Path,
    stats: &mut CopyStats,
    dir_modes: &mut Vec<(PathBuf, u32)>,
) -> Result<(), CopyError> {
    let walker = WalkDir::new(source)
        .follow_links(false)
        .follow_root_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|err| CopyError::Walk {
            path: err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| source.to_path_buf()),
            source: err,
        })?;
        let node = FilesystemNode::from_entry(source, &entry)?;
        let target = target_path(dest, node.relative());
        copy_node(entry.path(), &target, &node, stats, dir_modes)?;
    }
    Ok(())
}

/// Apply recorded directory modes, deepest first.
fn restore_dir_modes(dir_modes: &[(PathBuf, u32)]) -> Result<(), CopyError> {
    for (path, mode) in dir_modes.iter().rev() {
        fs::set_permissions(path, Permissions::from_mode(*mode))
            .map_err(|e| CopyError::io("set permissions on", path, e))?;
    }
    Ok(())
}

fn target_path(dest: &Path, relative: &Path) -> PathBuf {
    if relative.as_os_str().is_empty() {
        dest.to_path_buf()
    } else {
        dest.join(relative)
    }
}

fn copy_node(
    src: &Path,
    target: &Path,
    node: &FilesystemNode,
    stats: &mut CopyStats,
    dir_modes: &mut Vec<(PathBuf, u32)>,
) -> Result<(), CopyError> {
    match node {
        FilesystemNode::Directory { mode, .. } => {
            fs::DirBuilder::new()
                .mode(mode | OWNER_RWX)
                .create(target)
                .map_err(|e| CopyError::io("create directory", target, e))?;
            dir_modes.push((target.to_path_buf(), *mode));
            stats.directories += 1;
        }
        FilesystemNode::RegularFile { mode, .. } => {
            stats.bytes += copy_regular_file(src, target, *mode)?;
            stats.files += 1;
        }
        FilesystemNode::Symlink { target: link, .. } => {
            std::os::unix::fs::symlink(link, target)
                .map_err(|e| CopyError::io("create symlink", target, e))?;
            stats.symlinks += 1;
        }
    }
    tracing::debug!(node = %node.relative().display(), dest = %target.display(), "copied");
    Ok(())
}

/// Stream one file. Both handles drop on every return path.
fn copy_regular_file(src: &Path, dst: &Path, mode: u32) -> Result<u64, CopyError> {
    let mut reader = File::open(src).map_err(|e| CopyError::io("open", src, e))?;
    let mut writer = File::create(dst).map_err(|e| CopyError::io("create", dst, e))?;
    let bytes = io::copy(&mut reader, &mut writer).map_err(|e| CopyError::io("copy", src, e))?;
    writer
        .set_permissions(Permissions::from_mode(mode))
        .map_err(|e| CopyError::io("set permissions on", dst, e))?;
    Ok(bytes)
}
