// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Call surface of the machine-learning service agent.
//!
//! The agent owns every pipeline, model and resource. The client reaches it
//! only through the synchronous calls of [`AgentTransport`], each of which
//! either succeeds with its output or fails with a status code.

mod dispatch;
mod ipc;
mod memory;
pub mod protocol;

pub use dispatch::{dispatch, dispatch_frame};
pub use ipc::{IpcAgent, IpcAgentConfig};
pub use memory::InMemoryAgent;
pub use protocol::ProtocolError;

use thiserror::Error;

use crate::error::ErrorCode;

/// Agent-side identifier of a launched pipeline instance. `0` means unbound.
pub type PipelineId = i64;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("agent returned status {code}: {message}")]
    Status { code: i32, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("call '{0}' timed out")]
    Timeout(&'static str),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("invalid reply to '{method}': {detail}")]
    InvalidReply { method: &'static str, detail: String },
}

impl AgentError {
    pub fn status(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Status { code: code.as_i32(), message: message.into() }
    }

    /// Status code for this failure. Agent codes are not reinterpreted.
    pub fn code(&self) -> i32 {
        match self {
            Self::Status { code, .. } => *code,
            Self::Timeout(_) => ErrorCode::TimedOut.as_i32(),
            Self::Transport(_) | Self::Protocol(_) | Self::InvalidReply { .. } => {
                ErrorCode::IoError.as_i32()
            }
        }
    }
}

/// Arguments of a model registration call.
#[derive(Debug, Clone, Copy)]
pub struct ModelRegistration<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub activate: bool,
    pub description: &'a str,
    pub app_info: &'a str,
}

/// Arguments of a resource add call.
#[derive(Debug, Clone, Copy)]
pub struct ResourceRegistration<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub description: &'a str,
    pub app_info: &'a str,
}

/// Synchronous call/response access to the agent.
///
/// Implementations own any timeout policy. Callers serialize nothing: a
/// transport must tolerate concurrent calls from different handles.
pub trait AgentTransport: Send + Sync {
    fn pipeline_set_description(&self, name: &str, description: &str) -> Result<(), AgentError>;
    fn pipeline_get_description(&self, name: &str) -> Result<String, AgentError>;
    fn pipeline_delete(&self, name: &str) -> Result<(), AgentError>;
    fn pipeline_launch(&self, name: &str) -> Result<PipelineId, AgentError>;
    fn pipeline_get_state(&self, id: PipelineId) -> Result<i32, AgentError>;
    fn pipeline_destroy(&self, id: PipelineId) -> Result<(), AgentError>;

    /// Returns the version number the agent assigned.
    fn model_register(&self, registration: &ModelRegistration<'_>) -> Result<u32, AgentError>;
    fn model_update_description(
        &self,
        name: &str,
        version: u32,
        description: &str,
    ) -> Result<(), AgentError>;
    fn model_activate(&self, name: &str, version: u32) -> Result<(), AgentError>;
    fn model_get(&self, name: &str, version: u32) -> Result<String, AgentError>;
    fn model_get_activated(&self, name: &str) -> Result<String, AgentError>;
    fn model_get_all(&self, name: &str) -> Result<String, AgentError>;
    fn model_delete(&self, name: &str, version: u32, force: bool) -> Result<(), AgentError>;

    fn resource_add(&self, registration: &ResourceRegistration<'_>) -> Result<(), AgentError>;
    fn resource_delete(&self, name: &str) -> Result<(), AgentError>;
    fn resource_get(&self, name: &str) -> Result<String, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AgentError::status(ErrorCode::PermissionDenied, "x").code(), -13);
        assert_eq!(AgentError::Timeout("model_get").code(), ErrorCode::TimedOut.as_i32());
        let io = AgentError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.code(), ErrorCode::IoError.as_i32());
    }
}
