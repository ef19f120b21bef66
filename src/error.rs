// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the service client.
//!
//! Every failure is returned as a value. Local precondition failures are
//! raised before any remote call; remote status codes pass through unchanged.

use thiserror::Error;

use crate::agent::AgentError;
use crate::path::PathError;

/// Numeric status codes, errno-style, as seen by C callers and the CLI.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    None = 0,
    InvalidParameter = -22,
    PermissionDenied = -13,
    OutOfMemory = -12,
    TryAgain = -11,
    IoError = -5,
    TimedOut = -62,
    NotSupported = -95,
    Unknown = -1,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Errors returned by every public service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Machine learning service feature is not supported")]
    NotSupported,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    InvalidPath(#[from] PathError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    #[error("Remote call failed: {0}")]
    Remote(#[from] AgentError),

    #[error("Failed to decode agent response: {0}")]
    Decode(String),

    #[error("Output slot '{0}' is already set; pass an empty slot")]
    OutputSlotOccupied(&'static str),
}

impl ServiceError {
    /// Status code for this error. Remote codes are returned verbatim.
    pub fn code(&self) -> i32 {
        match self {
            Self::NotSupported => ErrorCode::NotSupported.as_i32(),
            Self::InvalidArgument(_) | Self::Decode(_) | Self::OutputSlotOccupied(_) => {
                ErrorCode::InvalidParameter.as_i32()
            }
            Self::InvalidPath(e) => e.code().as_i32(),
            Self::PermissionDenied(_) => ErrorCode::PermissionDenied.as_i32(),
            Self::OutOfMemory(_) => ErrorCode::OutOfMemory.as_i32(),
            Self::Remote(e) => e.code(),
        }
    }

    /// True when the failure happened before any remote call was attempted.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Remote(_))
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<std::collections::TryReserveError> for ServiceError {
    fn from(e: std::collections::TryReserveError) -> Self {
        Self::OutOfMemory(e.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_codes() {
        assert_eq!(ServiceError::NotSupported.code(), -95);
        assert_eq!(ServiceError::invalid("x").code(), -22);
        assert_eq!(ServiceError::Decode("x".into()).code(), -22);
        assert_eq!(ServiceError::PermissionDenied("x".into()).code(), -13);
        assert_eq!(ServiceError::OutOfMemory("x".into()).code(), -12);
    }

    #[test]
    fn test_remote_code_passes_through() {
        let err = ServiceError::from(AgentError::Status {
            code: -1234,
            message: "no such model".into(),
        });
        assert_eq!(err.code(), -1234);
        assert!(!err.is_local());
        assert!(err.to_string().contains("no such model"));
    }

    #[test]
    fn test_path_error_codes() {
        let denied = ServiceError::from(PathError::ParentInaccessible("/x/y".into()));
        assert_eq!(denied.code(), ErrorCode::PermissionDenied.as_i32());

        let symlink = ServiceError::from(PathError::SymbolicLink("/x".into()));
        assert_eq!(symlink.code(), ErrorCode::InvalidParameter.as_i32());
        assert!(symlink.is_local());
    }
}
