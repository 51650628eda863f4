//! Inject host-provided files and directories into an image root filesystem.
//!
//! Each asset is a `<dest>:<source>` string. Both sides may carry
//! placeholder tokens that are substituted before the pair is validated and
//! copied:
//!
//! - **Placeholders** - ordered literal token substitution ([`resolve`])
//! - **Validation** - absolute paths, source is a file or directory
//! - **Tree copy** - directories, regular files and symlinks with their modes
//! - **Preparation** - per-asset orchestration under a rootfs
//!
//! The crate is Unix-only: modes, symlinks and node kinds go through
//! `std::os::unix`.
//!
//! # Example
//!
//! ```rust,ignore
//! use rootfs_assets::{prepare_assets, PlaceholderMapping};
//! use std::path::Path;
//!
//! let mut mapping = PlaceholderMapping::new();
//! mapping.insert("${VERSION}", "1.2.3");
//!
//! let prepared = prepare_assets(
//!     &["/opt/app:/home/user/build/${VERSION}/app"],
//!     Path::new("/tmp/rootfs"),
//!     &mapping,
//! )?;
//! for asset in &prepared {
//!     println!("{} -> {}", asset.source.display(), asset.dest.display());
//! }
//! ```

pub mod asset;
pub mod config;
pub mod copy;
pub mod error;
pub mod preflight;
pub mod report;

pub use asset::{
    join_spec, prepare_asset, prepare_assets, resolve, validate_asset, AssetSpec,
    PlaceholderMapping, PreparedAsset, ResolvedAsset, LIST_SEPARATOR,
};
pub use config::AssetManifest;
pub use copy::{copy_tree, CopyStats, FilesystemNode};
pub use error::{AssetError, CopyError, ErrorKind, ValidationError};
pub use preflight::check_rootfs;
pub use report::write_report;
