//! Checks run on a resolved asset pair before anything is copied.

use std::fs;
use std::path::Path;

use crate::copy::node_kind_name;
use crate::error::ValidationError;

/// Validate a resolved asset. Rules run in order and the first failure wins:
/// both paths absolute, source exists, source is a regular file or directory.
///
/// The kind check does not follow symlinks, so a symlink as the root of an
/// asset is rejected even though nested ones are copied. A dangling one is
/// reported as missing.
pub fn validate_asset(dest: &str, source: &str) -> Result<(), ValidationError> {
    if !Path::new(dest).is_absolute() {
        return Err(ValidationError::InvalidDestPath(dest.to_string()));
    }
    if !Path::new(source).is_absolute() {
        return Err(ValidationError::InvalidSourcePath(source.to_string()));
    }

    let not_found = |source_err| ValidationError::SourceNotFound {
        path: source.to_string(),
        source: source_err,
    };
    fs::metadata(source).map_err(not_found)?;
    let file_type = fs::symlink_metadata(source).map_err(not_found)?.file_type();
    if file_type.is_dir() || file_type.is_file() {
        return Ok(());
    }
    Err(ValidationError::UnsupportedSourceType {
        path: source.to_string(),
        kind: node_kind_name(&file_type),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_accepts_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        validate_asset("/opt/dir", temp.path().to_str().unwrap()).unwrap();
        validate_asset("/opt/file", file.to_str().unwrap()).unwrap();
    }

    #[test]
    fn test_relative_dest_checked_first() {
        let err = validate_asset("opt/app", "relative/too").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDestPath);
    }

    #[test]
    fn test_relative_source_rejected() {
        let err = validate_asset("/opt/app", "build/app").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSourcePath);
    }

    #[test]
    fn test_empty_paths_are_not_absolute() {
        assert_eq!(
            validate_asset("", "/src").unwrap_err().kind(),
            ErrorKind::InvalidDestPath
        );
        assert_eq!(
            validate_asset("/dst", "").unwrap_err().kind(),
            ErrorKind::InvalidSourcePath
        );
    }

    #[test]
    fn test_missing_source() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let err = validate_asset("/opt/app", missing.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceNotFound);
        match err {
            ValidationError::SourceNotFound { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_symlink_root_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("real")).unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink("real", &link).unwrap();

        let err = validate_asset("/opt/app", link.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedSourceType);
        assert!(err.to_string().contains("symlink"));
    }

    #[test]
    fn test_fifo_rejected() {
        let temp = TempDir::new().unwrap();
        let fifo = temp.path().join("pipe");
        let c_path = std::ffi::CString::new(fifo.to_str().unwrap()).unwrap();
        assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o644) }, 0);

        let err = validate_asset("/opt/pipe", fifo.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedSourceType);
    }

    #[test]
    fn test_dangling_symlink_root_is_missing() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("dangling");
        std::os::unix::fs::symlink("gone", &link).unwrap();

        let err = validate_asset("/opt/app", link.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceNotFound);
    }
}
