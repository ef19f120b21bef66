// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Agent-side request dispatch.
//!
//! Maps one decoded [`AgentRequest`] onto an [`AgentTransport`] backend and
//! turns the outcome into a reply. Lets any backend, the in-memory agent
//! included, answer IPC frames.

use super::protocol::{AgentReply, AgentRequest, ReplyFrame, RequestFrame};
use super::{AgentError, AgentTransport, ModelRegistration, ResourceRegistration};

fn reply_or_error<T>(result: Result<T, AgentError>, ok: impl FnOnce(T) -> AgentReply) -> AgentReply {
    match result {
        Ok(value) => ok(value),
        Err(AgentError::Status { code, message }) => AgentReply::Error { code, message },
        Err(e) => AgentReply::Error { code: e.code(), message: e.to_string() },
    }
}

fn done(result: Result<(), AgentError>) -> AgentReply {
    reply_or_error(result, |()| AgentReply::Done)
}

fn json(result: Result<String, AgentError>) -> AgentReply {
    reply_or_error(result, |json| AgentReply::Json { json })
}

/// Execute `request` against `backend`.
pub fn dispatch(backend: &dyn AgentTransport, request: AgentRequest) -> AgentReply {
    match request {
        AgentRequest::PipelineSetDescription { name, description } => {
            done(backend.pipeline_set_description(&name, &description))
        }
        AgentRequest::PipelineGetDescription { name } => reply_or_error(
            backend.pipeline_get_description(&name),
            |description| AgentReply::Description { description },
        ),
        AgentRequest::PipelineDelete { name } => done(backend.pipeline_delete(&name)),
        AgentRequest::PipelineLaunch { name } => {
            reply_or_error(backend.pipeline_launch(&name), |id| AgentReply::Launched { id })
        }
        AgentRequest::PipelineGetState { id } => {
            reply_or_error(backend.pipeline_get_state(id), |state| AgentReply::State { state })
        }
        AgentRequest::PipelineDestroy { id } => done(backend.pipeline_destroy(id)),
        AgentRequest::ModelRegister { name, path, activate, description, app_info } => {
            let registration = ModelRegistration {
                name: &name,
                path: &path,
                activate,
                description: &description,
                app_info: &app_info,
            };
            reply_or_error(backend.model_register(&registration), |version| {
                AgentReply::Version { version }
            })
        }
        AgentRequest::ModelUpdateDescription { name, version, description } => {
            done(backend.model_update_description(&name, version, &description))
        }
        AgentRequest::ModelActivate { name, version } => {
            done(backend.model_activate(&name, version))
        }
        AgentRequest::ModelGet { name, version } => json(backend.model_get(&name, version)),
        AgentRequest::ModelGetActivated { name } => json(backend.model_get_activated(&name)),
        AgentRequest::ModelGetAll { name } => json(backend.model_get_all(&name)),
        AgentRequest::ModelDelete { name, version, force } => {
            done(backend.model_delete(&name, version, force))
        }
        AgentRequest::ResourceAdd { name, path, description, app_info } => {
            let registration = ResourceRegistration {
                name: &name,
                path: &path,
                description: &description,
                app_info: &app_info,
            };
            done(backend.resource_add(&registration))
        }
        AgentRequest::ResourceDelete { name } => done(backend.resource_delete(&name)),
        AgentRequest::ResourceGet { name } => json(backend.resource_get(&name)),
    }
}

/// Answer one request frame, echoing its request id.
pub fn dispatch_frame(backend: &dyn AgentTransport, frame: RequestFrame) -> ReplyFrame {
    ReplyFrame {
        request_id: frame.request_id,
        reply: dispatch(backend, frame.request),
    }
}
