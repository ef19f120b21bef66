// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Wire format for the IPC transport.
//!
//! Each message is a 4-byte little-endian length followed by a JSON body.
//!
//! # Security
//! - Frame size limits prevent memory exhaustion from a misbehaving agent
//! - Size is checked BEFORE the body is read or parsed

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::PipelineId;

/// Default ceiling for a single frame body.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024; // 16 MiB

/// Length prefix size in bytes.
pub const FRAME_HEADER_LEN: usize = 4;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    #[error("Reply id {got} does not match request id {expected}")]
    RequestMismatch { expected: u64, got: u64 },
}

/// Correlates a reply with its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

/// One remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum AgentRequest {
    PipelineSetDescription { name: String, description: String },
    PipelineGetDescription { name: String },
    PipelineDelete { name: String },
    PipelineLaunch { name: String },
    PipelineGetState { id: PipelineId },
    PipelineDestroy { id: PipelineId },
    ModelRegister {
        name: String,
        path: String,
        activate: bool,
        description: String,
        app_info: String,
    },
    ModelUpdateDescription { name: String, version: u32, description: String },
    ModelActivate { name: String, version: u32 },
    ModelGet { name: String, version: u32 },
    ModelGetActivated { name: String },
    ModelGetAll { name: String },
    ModelDelete { name: String, version: u32, force: bool },
    ResourceAdd {
        name: String,
        path: String,
        description: String,
        app_info: String,
    },
    ResourceDelete { name: String },
    ResourceGet { name: String },
}

impl AgentRequest {
    /// Method name used in logs and metrics.
    pub fn method(&self) -> &'static str {
        match self {
            Self::PipelineSetDescription { .. } => "pipeline_set_description",
            Self::PipelineGetDescription { .. } => "pipeline_get_description",
            Self::PipelineDelete { .. } => "pipeline_delete",
            Self::PipelineLaunch { .. } => "pipeline_launch",
            Self::PipelineGetState { .. } => "pipeline_get_state",
            Self::PipelineDestroy { .. } => "pipeline_destroy",
            Self::ModelRegister { .. } => "model_register",
            Self::ModelUpdateDescription { .. } => "model_update_description",
            Self::ModelActivate { .. } => "model_activate",
            Self::ModelGet { .. } => "model_get",
            Self::ModelGetActivated { .. } => "model_get_activated",
            Self::ModelGetAll { .. } => "model_get_all",
            Self::ModelDelete { .. } => "model_delete",
            Self::ResourceAdd { .. } => "resource_add",
            Self::ResourceDelete { .. } => "resource_delete",
            Self::ResourceGet { .. } => "resource_get",
        }
    }
}

/// Outcome of one remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentReply {
    Done,
    Description { description: String },
    Launched { id: PipelineId },
    State { state: i32 },
    Version { version: u32 },
    Json { json: String },
    Error { code: i32, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestFrame {
    pub request_id: RequestId,
    pub request: AgentRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyFrame {
    pub request_id: RequestId,
    pub reply: AgentReply,
}

/// Serialize `message` and prepend its length.
pub fn encode_frame<T: Serialize>(message: &T, max: usize) -> Result<Vec<u8>, ProtocolError> {
    let body = serde_json::to_vec(message)?;
    if body.len() > max {
        return Err(ProtocolError::FrameTooLarge { size: body.len(), max });
    }
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Body length announced by a frame header, checked against `max`.
pub fn frame_len(header: [u8; FRAME_HEADER_LEN], max: usize) -> Result<usize, ProtocolError> {
    let size = u32::from_le_bytes(header) as usize;
    if size > max {
        return Err(ProtocolError::FrameTooLarge { size, max });
    }
    Ok(size)
}

/// Parse a frame body (without its header).
pub fn decode_body<T: for<'de> Deserialize<'de>>(
    body: &[u8],
    max: usize,
) -> Result<T, ProtocolError> {
    if body.len() > max {
        return Err(ProtocolError::FrameTooLarge { size: body.len(), max });
    }
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_header_carries_body_length() {
        let frame = RequestFrame {
            request_id: RequestId(7),
            request: AgentRequest::PipelineLaunch { name: "cam".into() },
        };
        let bytes = encode_frame(&frame, DEFAULT_MAX_FRAME_SIZE).unwrap();
        let mut header = [0u8; FRAME_HEADER_LEN];
        header.copy_from_slice(&bytes[..FRAME_HEADER_LEN]);
        let len = frame_len(header, DEFAULT_MAX_FRAME_SIZE).unwrap();
        assert_eq!(len, bytes.len() - FRAME_HEADER_LEN);

        let decoded: RequestFrame =
            decode_body(&bytes[FRAME_HEADER_LEN..], DEFAULT_MAX_FRAME_SIZE).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_request_tagged_by_method() {
        let req = AgentRequest::ModelActivate { name: "a".into(), version: 2 };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["method"], "model_activate");
        assert_eq!(value["version"], 2);
        assert_eq!(req.method(), "model_activate");
    }

    #[test]
    fn test_error_reply_shape() {
        let reply: AgentReply =
            serde_json::from_str(r#"{"type": "error", "code": -22, "message": "bad"}"#).unwrap();
        assert_eq!(reply, AgentReply::Error { code: -22, message: "bad".into() });
    }

    #[test]
    fn test_oversized_header_rejected() {
        let header = (1024u32).to_le_bytes();
        assert!(matches!(
            frame_len(header, 512),
            Err(ProtocolError::FrameTooLarge { size: 1024, max: 512 })
        ));
    }

    #[test]
    fn test_encode_respects_limit() {
        let reply = AgentReply::Json { json: "x".repeat(100) };
        assert!(matches!(encode_frame(&reply, 16), Err(ProtocolError::FrameTooLarge { .. })));
    }
}
