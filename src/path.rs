// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Validation of model and resource paths before they are handed to the agent.
//!
//! The agent opens these files with its own privileges, so the client only
//! forwards absolute paths naming an existing regular file. Symbolic links
//! are refused outright: the target could be swapped after validation.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::ErrorCode;

/// Token replaced by the application's writable data directory.
pub const APP_RW_PATH_TOKEN: &str = "@APP_RW_PATH@";
/// Token replaced by the application's read-only resource directory.
pub const APP_RO_PATH_TOKEN: &str = "@APP_RO_PATH@";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("The parameter 'path' is empty. It should be a valid string.")]
    Empty,

    #[error("Failed to get the information of given path '{0}'")]
    ParentInaccessible(PathBuf),

    #[error("Given path '{0}' is not absolute")]
    NotAbsolute(PathBuf),

    #[error("Given path '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("Given path '{0}' is a symbolic link")]
    SymbolicLink(PathBuf),

    #[error("Given path '{0}' is not a regular file")]
    NotRegularFile(PathBuf),
}

impl PathError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ParentInaccessible(_) => ErrorCode::PermissionDenied,
            _ => ErrorCode::InvalidParameter,
        }
    }
}

/// Check that `path` is an absolute path to an existing regular file that is
/// not a symbolic link.
pub fn check_path(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let target = Path::new(path);
    let dir = if target.is_dir() {
        target
    } else {
        match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };

    if std::fs::metadata(dir).is_err() {
        return Err(PathError::ParentInaccessible(target.to_path_buf()));
    }

    if !target.is_absolute() {
        return Err(PathError::NotAbsolute(target.to_path_buf()));
    }

    let meta = std::fs::symlink_metadata(target)
        .map_err(|_| PathError::NotFound(target.to_path_buf()))?;

    if meta.file_type().is_symlink() {
        return Err(PathError::SymbolicLink(target.to_path_buf()));
    }

    if !meta.is_file() {
        return Err(PathError::NotRegularFile(target.to_path_buf()));
    }

    Ok(())
}

/// Values for the predefined path tokens an application may use when
/// registering assets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredefinedEntities {
    pub app_rw_path: Option<String>,
    pub app_ro_path: Option<String>,
}

impl PredefinedEntities {
    /// Substitute every configured token in `path`. Unconfigured tokens are
    /// left in place.
    pub fn convert(&self, path: &str) -> String {
        let mut converted = path.to_string();
        if let Some(rw) = &self.app_rw_path {
            converted = converted.replace(APP_RW_PATH_TOKEN, rw);
        }
        if let Some(ro) = &self.app_ro_path {
            converted = converted.replace(APP_RO_PATH_TOKEN, ro);
        }
        converted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_empty_path_rejected() {
        assert_eq!(check_path(""), Err(PathError::Empty));
    }

    #[test]
    fn test_relative_path_rejected() {
        let err = check_path("model.bin").unwrap_err();
        assert!(matches!(err, PathError::NotAbsolute(_)));
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
    }

    #[test]
    fn test_missing_parent_is_permission_error() {
        let err = check_path("/definitely/not/here/model.bin").unwrap_err();
        assert!(matches!(err, PathError::ParentInaccessible(_)));
        assert_eq!(err.code(), ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_missing_file_in_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.bin");
        let err = check_path(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, PathError::NotFound(_)));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_path(dir.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, PathError::NotRegularFile(_)));
    }

    #[test]
    fn test_regular_file_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.tflite");
        fs::write(&path, b"weights").unwrap();
        assert!(check_path(path.to_str().unwrap()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.bin");
        let link = dir.path().join("link.bin");
        fs::write(&real, b"weights").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let err = check_path(link.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, PathError::SymbolicLink(_)));
    }

    #[test]
    fn test_convert_predefined_entities() {
        let entities = PredefinedEntities {
            app_rw_path: Some("/opt/app/data".into()),
            app_ro_path: Some("/opt/app/res".into()),
        };
        assert_eq!(entities.convert("@APP_RW_PATH@/m.bin"), "/opt/app/data/m.bin");
        assert_eq!(entities.convert("@APP_RO_PATH@/m.bin"), "/opt/app/res/m.bin");
        assert_eq!(entities.convert("/plain/m.bin"), "/plain/m.bin");
    }

    #[test]
    fn test_unconfigured_entity_left_in_place() {
        let entities = PredefinedEntities::default();
        assert_eq!(entities.convert("@APP_RW_PATH@/m.bin"), "@APP_RW_PATH@/m.bin");
    }
}
