// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Local-socket transport to the agent.
//!
//! Every call opens a connection, writes one request frame and reads one
//! reply frame. The async round trip runs on a private current-thread runtime
//! so the public surface stays synchronous, including when it is called from
//! inside another tokio runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use interprocess::local_socket::tokio::{prelude::*, Stream};
use interprocess::local_socket::{GenericFilePath, ToFsName};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::runtime::{Handle, Runtime as TokioRuntime};
use tokio::time::error::Elapsed;
use tracing::{debug, warn};

use super::protocol::{
    decode_body, encode_frame, frame_len, AgentReply, AgentRequest, ProtocolError, ReplyFrame,
    RequestFrame, RequestId, DEFAULT_MAX_FRAME_SIZE, FRAME_HEADER_LEN,
};
use super::{AgentError, AgentTransport, ModelRegistration, PipelineId, ResourceRegistration};

type TimedReply = Result<Result<ReplyFrame, AgentError>, Elapsed>;

/// Configuration for the IPC transport.
#[derive(Debug, Clone)]
pub struct IpcAgentConfig {
    pub socket_path: String,
    pub call_timeout: Duration,
    pub max_frame_size: usize,
}

impl Default for IpcAgentConfig {
    fn default() -> Self {
        Self {
            socket_path: crate::config::DEFAULT_SOCKET_PATH.to_string(),
            call_timeout: Duration::from_secs(10),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

/// Agent reached over a named pipe or Unix socket.
pub struct IpcAgent {
    config: IpcAgentConfig,
    tokio: TokioRuntime,
    next_id: AtomicU64,
}

impl IpcAgent {
    pub fn new(config: IpcAgentConfig) -> Result<Self, AgentError> {
        let tokio = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            config,
            tokio,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn socket_path(&self) -> &str {
        &self.config.socket_path
    }

    fn call(&self, request: AgentRequest) -> Result<AgentReply, AgentError> {
        let method = request.method();
        let request_id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let frame = encode_frame(
            &RequestFrame { request_id, request },
            self.config.max_frame_size,
        )?;

        debug!(method, request_id = request_id.0, "agent call");
        let reply = match self.block_on_round_trip(&frame)? {
            Ok(result) => result?,
            Err(_) => {
                warn!(method, "agent call timed out after {:?}", self.config.call_timeout);
                return Err(AgentError::Timeout(method));
            }
        };

        if reply.request_id != request_id {
            return Err(ProtocolError::RequestMismatch {
                expected: request_id.0,
                got: reply.request_id.0,
            }
            .into());
        }

        match reply.reply {
            AgentReply::Error { code, message } => Err(AgentError::Status { code, message }),
            other => Ok(other),
        }
    }

    /// Drive one timed round trip on the private runtime.
    ///
    /// A runtime cannot be entered from a thread that already drives one, so
    /// callers inside async code get the round trip on a scoped helper thread.
    fn block_on_round_trip(&self, frame: &[u8]) -> Result<TimedReply, AgentError> {
        let run = || {
            self.tokio.block_on(async {
                tokio::time::timeout(self.config.call_timeout, self.round_trip(frame)).await
            })
        };

        if Handle::try_current().is_err() {
            return Ok(run());
        }

        debug!("caller is inside a tokio runtime, running agent call on a helper thread");
        std::thread::scope(|scope| {
            std::thread::Builder::new()
                .name("ml-service-ipc".into())
                .spawn_scoped(scope, run)?
                .join()
                .map_err(|_| {
                    AgentError::Transport(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "agent call thread panicked",
                    ))
                })
        })
    }

    async fn round_trip(&self, frame: &[u8]) -> Result<ReplyFrame, AgentError> {
        let name = self
            .config
            .socket_path
            .as_str()
            .to_fs_name::<GenericFilePath>()?;
        let mut stream = Stream::connect(name).await?;

        stream.write_all(frame).await?;
        stream.flush().await?;

        let mut header = [0u8; FRAME_HEADER_LEN];
        stream.read_exact(&mut header).await?;
        let len = frame_len(header, self.config.max_frame_size)?;

        let mut body = vec![0u8; len];
        stream.read_exact(&mut body).await?;
        Ok(decode_body(&body, self.config.max_frame_size)?)
    }
}

fn unexpected(method: &'static str, reply: AgentReply) -> AgentError {
    AgentError::InvalidReply { method, detail: format!("unexpected reply {:?}", reply) }
}

fn expect_done(method: &'static str, reply: AgentReply) -> Result<(), AgentError> {
    match reply {
        AgentReply::Done => Ok(()),
        other => Err(unexpected(method, other)),
    }
}

fn expect_json(method: &'static str, reply: AgentReply) -> Result<String, AgentError> {
    match reply {
        AgentReply::Json { json } => Ok(json),
        other => Err(unexpected(method, other)),
    }
}

impl AgentTransport for IpcAgent {
    fn pipeline_set_description(&self, name: &str, description: &str) -> Result<(), AgentError> {
        let reply = self.call(AgentRequest::PipelineSetDescription {
            name: name.to_string(),
            description: description.to_string(),
        })?;
        expect_done("pipeline_set_description", reply)
    }

    fn pipeline_get_description(&self, name: &str) -> Result<String, AgentError> {
        match self.call(AgentRequest::PipelineGetDescription { name: name.to_string() })? {
            AgentReply::Description { description } => Ok(description),
            other => Err(unexpected("pipeline_get_description", other)),
        }
    }

    fn pipeline_delete(&self, name: &str) -> Result<(), AgentError> {
        let reply = self.call(AgentRequest::PipelineDelete { name: name.to_string() })?;
        expect_done("pipeline_delete", reply)
    }

    fn pipeline_launch(&self, name: &str) -> Result<PipelineId, AgentError> {
        match self.call(AgentRequest::PipelineLaunch { name: name.to_string() })? {
            AgentReply::Launched { id } => Ok(id),
            other => Err(unexpected("pipeline_launch", other)),
        }
    }

    fn pipeline_get_state(&self, id: PipelineId) -> Result<i32, AgentError> {
        match self.call(AgentRequest::PipelineGetState { id })? {
            AgentReply::State { state } => Ok(state),
            other => Err(unexpected("pipeline_get_state", other)),
        }
    }

    fn pipeline_destroy(&self, id: PipelineId) -> Result<(), AgentError> {
        let reply = self.call(AgentRequest::PipelineDestroy { id })?;
        expect_done("pipeline_destroy", reply)
    }

    fn model_register(&self, registration: &ModelRegistration<'_>) -> Result<u32, AgentError> {
        let request = AgentRequest::ModelRegister {
            name: registration.name.to_string(),
            path: registration.path.to_string(),
            activate: registration.activate,
            description: registration.description.to_string(),
            app_info: registration.app_info.to_string(),
        };
        match self.call(request)? {
            AgentReply::Version { version } => Ok(version),
            other => Err(unexpected("model_register", other)),
        }
    }

    fn model_update_description(
        &self,
        name: &str,
        version: u32,
        description: &str,
    ) -> Result<(), AgentError> {
        let reply = self.call(AgentRequest::ModelUpdateDescription {
            name: name.to_string(),
            version,
            description: description.to_string(),
        })?;
        expect_done("model_update_description", reply)
    }

    fn model_activate(&self, name: &str, version: u32) -> Result<(), AgentError> {
        let reply = self.call(AgentRequest::ModelActivate { name: name.to_string(), version })?;
        expect_done("model_activate", reply)
    }

    fn model_get(&self, name: &str, version: u32) -> Result<String, AgentError> {
        let reply = self.call(AgentRequest::ModelGet { name: name.to_string(), version })?;
        expect_json("model_get", reply)
    }

    fn model_get_activated(&self, name: &str) -> Result<String, AgentError> {
        let reply = self.call(AgentRequest::ModelGetActivated { name: name.to_string() })?;
        expect_json("model_get_activated", reply)
    }

    fn model_get_all(&self, name: &str) -> Result<String, AgentError> {
        let reply = self.call(AgentRequest::ModelGetAll { name: name.to_string() })?;
        expect_json("model_get_all", reply)
    }

    fn model_delete(&self, name: &str, version: u32, force: bool) -> Result<(), AgentError> {
        let reply = self.call(AgentRequest::ModelDelete {
            name: name.to_string(),
            version,
            force,
        })?;
        expect_done("model_delete", reply)
    }

    fn resource_add(&self, registration: &ResourceRegistration<'_>) -> Result<(), AgentError> {
        let reply = self.call(AgentRequest::ResourceAdd {
            name: registration.name.to_string(),
            path: registration.path.to_string(),
            description: registration.description.to_string(),
            app_info: registration.app_info.to_string(),
        })?;
        expect_done("resource_add", reply)
    }

    fn resource_delete(&self, name: &str) -> Result<(), AgentError> {
        let reply = self.call(AgentRequest::ResourceDelete { name: name.to_string() })?;
        expect_done("resource_delete", reply)
    }

    fn resource_get(&self, name: &str) -> Result<String, AgentError> {
        let reply = self.call(AgentRequest::ResourceGet { name: name.to_string() })?;
        expect_json("resource_get", reply)
    }
}
