//! Asset specifications and their preparation into a rootfs.
//!
//! - [`spec`] - `<dest><SEP><source>` parsing
//! - [`placeholders`] - ordered placeholder substitution
//! - [`validate`] - checks on the resolved pair
//! - [`prepare`] - the per-asset pipeline

pub mod placeholders;
pub mod prepare;
pub mod spec;
pub mod validate;

pub use placeholders::{resolve, PlaceholderMapping};
pub use prepare::{prepare_asset, prepare_assets, PreparedAsset};
pub use spec::{join_spec, AssetSpec, ResolvedAsset, LIST_SEPARATOR};
pub use validate::validate_asset;
