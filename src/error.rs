//! Error types for asset preparation.
//!
//! Library code returns these typed errors; the binary, manifest loader and
//! preflight checks wrap them in `anyhow` with extra context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Flattened classification of an [`AssetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedAssetSpec,
    InvalidDestPath,
    InvalidSourcePath,
    SourceNotFound,
    UnsupportedSourceType,
    DirectoryCreationFailed,
    CopyFailed,
}

/// Failure while checking a resolved asset pair.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("wrong rootfs asset '{0}': rootfs asset has to be an absolute path")]
    InvalidDestPath(String),

    #[error("wrong local asset '{0}': local asset has to be an absolute path")]
    InvalidSourcePath(String),

    #[error("error stating '{path}'")]
    SourceNotFound {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The local asset is neither a regular file nor a directory. Symlinks
    /// at the root of an asset land here too.
    #[error("can't handle local asset '{path}': not a file, not a dir ({kind})")]
    UnsupportedSourceType { path: String, kind: &'static str },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDestPath(_) => ErrorKind::InvalidDestPath,
            Self::InvalidSourcePath(_) => ErrorKind::InvalidSourcePath,
            Self::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            Self::UnsupportedSourceType { .. } => ErrorKind::UnsupportedSourceType,
        }
    }
}

/// Failure inside a single tree copy.
#[derive(Error, Debug)]
pub enum CopyError {
    #[error(
        "unsupported node '{}' ({kind}) in assets, only regular files, directories and symlinks are supported",
        path.display()
    )]
    UnsupportedNodeType { path: PathBuf, kind: &'static str },

    #[error("failed to walk '{}'", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to {op} '{}'", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CopyError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// True when the copy stopped on a device, socket or FIFO.
    pub fn is_unsupported_node(&self) -> bool {
        matches!(self, Self::UnsupportedNodeType { .. })
    }
}

/// Failure of one asset in [`crate::prepare_assets`]; always names the raw spec.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("malformed asset option '{spec}': expected two absolute paths separated with '{separator}'")]
    MalformedAssetSpec { spec: String, separator: char },

    #[error("invalid asset '{spec}'")]
    Invalid {
        spec: String,
        #[source]
        source: ValidationError,
    },

    #[error("failed to create directory tree '{}' for asset '{spec}'", path.display())]
    DirectoryCreationFailed {
        spec: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy assets for '{spec}'")]
    CopyFailed {
        spec: String,
        #[source]
        source: CopyError,
    },
}

impl AssetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedAssetSpec { .. } => ErrorKind::MalformedAssetSpec,
            Self::Invalid { source, .. } => source.kind(),
            Self::DirectoryCreationFailed { .. } => ErrorKind::DirectoryCreationFailed,
            Self::CopyFailed { .. } => ErrorKind::CopyFailed,
        }
    }

    /// The raw asset spec that failed.
    pub fn spec(&self) -> &str {
        match self {
            Self::MalformedAssetSpec { spec, .. }
            | Self::Invalid { spec, .. }
            | Self::DirectoryCreationFailed { spec, .. }
            | Self::CopyFailed { spec, .. } => spec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_malformed_display_names_separator() {
        let err = AssetError::MalformedAssetSpec {
            spec: "/opt/app".to_string(),
            separator: ':',
        };
        assert_eq!(
            err.to_string(),
            "malformed asset option '/opt/app': expected two absolute paths separated with ':'"
        );
        assert_eq!(err.kind(), ErrorKind::MalformedAssetSpec);
        assert_eq!(err.spec(), "/opt/app");
    }

    #[test]
    fn test_invalid_kind_is_flattened() {
        let err = AssetError::Invalid {
            spec: "a:b".to_string(),
            source: ValidationError::InvalidDestPath("a".to_string()),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidDestPath);
        assert_eq!(
            err.source().unwrap().to_string(),
            "wrong rootfs asset 'a': rootfs asset has to be an absolute path"
        );
    }

    #[test]
    fn test_copy_failed_keeps_cause() {
        let err = AssetError::CopyFailed {
            spec: "/x:/y".to_string(),
            source: CopyError::UnsupportedNodeType {
                path: PathBuf::from("/y/pipe"),
                kind: "fifo",
            },
        };
        assert_eq!(err.kind(), ErrorKind::CopyFailed);
        let cause = err.source().unwrap();
        assert!(cause.to_string().contains("/y/pipe"));
        assert!(cause.to_string().contains("fifo"));
    }
}
