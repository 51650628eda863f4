//! Per-asset orchestration: parse, resolve, validate, create parents, copy.

use serde::Serialize;
use std::fs::DirBuilder;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Component, Path, PathBuf};

use crate::asset::placeholders::PlaceholderMapping;
use crate::asset::spec::AssetSpec;
use crate::asset::validate::validate_asset;
use crate::copy::{copy_tree, CopyStats};
use crate::error::AssetError;

/// Mode for intermediate directories created under the rootfs.
const PARENT_DIR_MODE: u32 = 0o755;

/// One asset that made it into the rootfs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedAsset {
    /// The raw spec as given by the caller.
    pub spec: String,
    /// Where the asset landed, rootfs included.
    pub dest: PathBuf,
    /// Resolved host path the asset was copied from.
    pub source: PathBuf,
    pub stats: CopyStats,
}

/// Copy every asset into `rootfs`, in order, stopping at the first failure.
///
/// Assets already copied when a later one fails stay on disk. `rootfs` is
/// expected to exist; only the parents of each destination are created.
///
/// # Example
///
/// ```rust,ignore
/// use rootfs_assets::{prepare_assets, PlaceholderMapping};
/// use std::path::Path;
///
/// let mut mapping = PlaceholderMapping::new();
/// mapping.insert("${VERSION}", "1.2.3");
/// prepare_assets(
///     &["/opt/app:/home/user/build/${VERSION}/app"],
///     Path::new("/tmp/rootfs"),
///     &mapping,
/// )?;
/// ```
pub fn prepare_assets<S: AsRef<str>>(
    specs: &[S],
    rootfs: &Path,
    mapping: &PlaceholderMapping,
) -> Result<Vec<PreparedAsset>, AssetError> {
    let mut prepared = Vec::with_capacity(specs.len());
    for raw in specs {
        prepared.push(prepare_asset(raw.as_ref(), rootfs, mapping)?);
    }
    Ok(prepared)
}

/// Prepare a single asset spec. See [`prepare_assets`].
pub fn prepare_asset(
    raw: &str,
    rootfs: &Path,
    mapping: &PlaceholderMapping,
) -> Result<PreparedAsset, AssetError> {
    let spec = AssetSpec::parse(raw)?;
    let resolved = spec.resolve(mapping);
    validate_asset(&resolved.dest, &resolved.source).map_err(|source| AssetError::Invalid {
        spec: raw.to_string(),
        source,
    })?;

    let relative = rootfs_relative(Path::new(&resolved.dest));
    let dest = rootfs.join(&relative);
    let parent = match relative.parent() {
        Some(parent) => rootfs.join(parent),
        None => rootfs.to_path_buf(),
    };
    DirBuilder::new()
        .recursive(true)
        .mode(PARENT_DIR_MODE)
        .create(&parent)
        .map_err(|source| AssetError::DirectoryCreationFailed {
            spec: raw.to_string(),
            path: parent.clone(),
            source,
        })?;

    tracing::info!(spec = raw, dest = %dest.display(), "copying asset");
    let source = PathBuf::from(resolved.source);
    let stats = copy_tree(&source, &dest).map_err(|source| AssetError::CopyFailed {
        spec: raw.to_string(),
        source,
    })?;

    Ok(PreparedAsset {
        spec: raw.to_string(),
        dest,
        source,
        stats,
    })
}

/// Turn an absolute in-image path into one relative to the rootfs.
///
/// `..` is resolved lexically and never climbs above the rootfs, the same
/// way `/..` is `/` inside the image.
fn rootfs_relative(dest: &Path) -> PathBuf {
    let mut relative = PathBuf::new();
    for component in dest.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::ParentDir => {
                relative.pop();
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    relative
}
