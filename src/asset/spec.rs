//! Raw `<dest>:<source>` asset specifications.

use crate::asset::placeholders::{resolve, PlaceholderMapping};
use crate::error::AssetError;

/// Unix path-list separator used between the two halves of a spec.
pub const LIST_SEPARATOR: char = ':';

/// A parsed, not yet resolved, asset specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSpec<'a> {
    pub raw: &'a str,
    /// Path inside the rootfs.
    pub dest: &'a str,
    /// Path on the host.
    pub source: &'a str,
}

/// An asset after placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub dest: String,
    pub source: String,
}

impl<'a> AssetSpec<'a> {
    /// Split `raw` on [`LIST_SEPARATOR`]; anything but two parts is malformed.
    pub fn parse(raw: &'a str) -> Result<Self, AssetError> {
        let malformed = || AssetError::MalformedAssetSpec {
            spec: raw.to_string(),
            separator: LIST_SEPARATOR,
        };
        if raw.is_empty() {
            return Err(malformed());
        }

        let mut parts = raw.split(LIST_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(dest), Some(source), None) => Ok(Self { raw, dest, source }),
            _ => Err(malformed()),
        }
    }

    pub fn resolve(&self, mapping: &PlaceholderMapping) -> ResolvedAsset {
        ResolvedAsset {
            dest: resolve(self.dest, mapping),
            source: resolve(self.source, mapping),
        }
    }
}

/// Build a raw spec string from its two halves.
pub fn join_spec(dest: &str, source: &str) -> String {
    format!("{dest}{LIST_SEPARATOR}{source}")
}
