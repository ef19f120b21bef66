// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pipeline operations.
//!
//! Descriptions are stored by name on the agent. Launching binds a handle to
//! a running instance; the client never caches or validates instance state.

use std::sync::Arc;

use tracing::{error, warn};

use super::handle::{ServiceHandle, ServicePrivate};
use super::{observe, require_name, MlService};
use crate::agent::{AgentError, AgentTransport, PipelineId};
use crate::error::{ServiceError, ServiceResult};
use crate::telemetry::{CallSpan, SpanExt};

/// Run state of a remote pipeline as reported by the agent.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Unknown = 0,
    Null = 1,
    Ready = 2,
    Paused = 3,
    Playing = 4,
}

impl PipelineState {
    /// Translate the agent's integer state. Unrecognized values map to
    /// `Unknown`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Null,
            2 => Self::Ready,
            3 => Self::Paused,
            4 => Self::Playing,
            0 => Self::Unknown,
            other => {
                warn!("Agent reported unknown pipeline state {}", other);
                Self::Unknown
            }
        }
    }
}

/// Private state of a pipeline handle.
pub(crate) struct PipelineServer {
    id: PipelineId,
    name: String,
}

impl PipelineServer {
    fn unbound(name: &str) -> Self {
        Self { id: 0, name: name.to_string() }
    }

    pub(crate) fn id(&self) -> PipelineId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.id > 0
    }
}

/// Release a pipeline's private state, destroying the remote instance first
/// if one was bound. The state is dropped on every path.
pub(crate) fn release(agent: &dyn AgentTransport, server: PipelineServer) -> ServiceResult<()> {
    if !server.is_bound() {
        return Ok(());
    }

    let result = observe("pipeline_destroy", agent.pipeline_destroy(server.id));
    if result.is_err() {
        error!(
            "Failed to destroy pipeline '{}' (id {}); local state released anyway.",
            server.name, server.id
        );
    }
    result
}

impl MlService {
    /// Store `description` as the pipeline named `name`.
    pub fn pipeline_set_description(&self, name: &str, description: &str) -> ServiceResult<()> {
        self.check_feature()?;
        require_name(name, "name")?;
        require_name(description, "pipeline_desc")?;

        let span = CallSpan::new("pipeline_set_description", name);
        let result = self.remote(
            "pipeline_set_description",
            self.agent.pipeline_set_description(name, description),
        );
        span.record_result(&result);
        result
    }

    /// Fetch the description stored for the pipeline named `name`.
    pub fn pipeline_get_description(&self, name: &str) -> ServiceResult<String> {
        self.check_feature()?;
        require_name(name, "name")?;

        self.remote(
            "pipeline_get_description",
            self.agent.pipeline_get_description(name),
        )
    }

    pub fn pipeline_delete(&self, name: &str) -> ServiceResult<()> {
        self.check_feature()?;
        require_name(name, "name")?;

        self.remote("pipeline_delete", self.agent.pipeline_delete(name))
    }

    /// Launch the pipeline named `name` and return a handle bound to the
    /// running instance.
    pub fn pipeline_launch(&self, name: &str) -> ServiceResult<ServiceHandle> {
        self.check_feature()?;
        require_name(name, "name")?;

        let span = CallSpan::new("pipeline_launch", name);
        let mut handle = ServiceHandle::open(
            Arc::clone(&self.agent),
            ServicePrivate::Pipeline(PipelineServer::unbound(name)),
        );

        // On any failure below the unbound handle is dropped without a remote call.
        let result = self
            .remote("pipeline_launch", self.agent.pipeline_launch(name))
            .and_then(|id| {
                if id <= 0 {
                    return Err(AgentError::InvalidReply {
                        method: "pipeline_launch",
                        detail: format!("agent returned unbound pipeline id {}", id),
                    }
                    .into());
                }
                Ok(id)
            });
        span.record_result(&result);
        let id = result?;

        if let Some(ServicePrivate::Pipeline(server)) = handle.private_mut() {
            server.id = id;
        }
        Ok(handle)
    }

    /// Query the agent for the current state of a launched pipeline.
    ///
    /// The query goes to the agent that launched `handle`, which owns the
    /// pipeline id; `self` contributes only its feature gate.
    pub fn pipeline_get_state(&self, handle: &ServiceHandle) -> ServiceResult<PipelineState> {
        self.check_feature()?;

        let server = handle.private()?.as_pipeline().ok_or_else(|| {
            ServiceError::invalid("The parameter, 'handle' is not a pipeline handle.")
        })?;
        if !server.is_bound() {
            return Err(ServiceError::invalid(
                "The pipeline handle is not bound to a remote pipeline.",
            ));
        }

        let raw = observe(
            "pipeline_get_state",
            handle.agent().pipeline_get_state(server.id()),
        )?;
        Ok(PipelineState::from_raw(raw))
    }
}
