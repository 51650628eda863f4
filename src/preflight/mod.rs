//! Preflight checks run before any asset is touched.
//!
//! # Example
//!
//! ```rust,ignore
//! use rootfs_assets::preflight::check_rootfs;
//! use std::path::Path;
//!
//! check_rootfs(Path::new("/tmp/rootfs"))?;
//! ```

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Check that `rootfs` exists and is a directory.
///
/// Symlinks are followed, so a link to a directory passes. The rootfs is
/// never created here.
pub fn check_rootfs(rootfs: &Path) -> Result<()> {
    if !rootfs.exists() {
        bail!(
            "Rootfs '{}' does not exist (create it before injecting assets)",
            rootfs.display()
        );
    }

    let metadata = fs::metadata(rootfs)
        .with_context(|| format!("reading rootfs metadata '{}'", rootfs.display()))?;
    if !metadata.is_dir() {
        bail!("Rootfs '{}' is not a directory", rootfs.display());
    }

    Ok(())
}
