// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Service handles and their kind-specific private state.
//!
//! A handle is only handed out once its private state exists and the remote
//! create call succeeded. Release frees local state exactly once, after
//! attempting to destroy the remote instance.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use super::pipeline::{self, PipelineServer};
use crate::agent::AgentTransport;
use crate::error::{ServiceError, ServiceResult};

/// Kind of session a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ServiceKind {
    /// A launched pipeline owned by the agent.
    Pipeline,
}

/// Private state, one variant per kind.
pub(crate) enum ServicePrivate {
    Pipeline(PipelineServer),
}

impl ServicePrivate {
    fn kind(&self) -> ServiceKind {
        match self {
            Self::Pipeline(_) => ServiceKind::Pipeline,
        }
    }

    pub(crate) fn as_pipeline(&self) -> Option<&PipelineServer> {
        match self {
            Self::Pipeline(server) => Some(server),
        }
    }

    fn release(self, agent: &dyn AgentTransport) -> ServiceResult<()> {
        match self {
            Self::Pipeline(server) => pipeline::release(agent, server),
        }
    }
}

/// Caller-owned reference to one active service session.
///
/// Dropping an open handle releases it; call [`destroy`](Self::destroy) to
/// observe a remote release failure.
pub struct ServiceHandle {
    kind: ServiceKind,
    private: Option<ServicePrivate>,
    agent: Arc<dyn AgentTransport>,
}

impl ServiceHandle {
    pub(crate) fn open(agent: Arc<dyn AgentTransport>, private: ServicePrivate) -> Self {
        Self {
            kind: private.kind(),
            private: Some(private),
            agent,
        }
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// True until the handle has been destroyed.
    pub fn is_valid(&self) -> bool {
        self.private.is_some()
    }

    pub(crate) fn private(&self) -> ServiceResult<&ServicePrivate> {
        self.private.as_ref().ok_or_else(|| {
            ServiceError::invalid(
                "The parameter, 'handle' is invalid. It should be a valid service handle.",
            )
        })
    }

    pub(crate) fn private_mut(&mut self) -> Option<&mut ServicePrivate> {
        self.private.as_mut()
    }

    pub(crate) fn agent(&self) -> &Arc<dyn AgentTransport> {
        &self.agent
    }

    /// Logical name of the entity this handle is bound to.
    pub fn name(&self) -> Option<&str> {
        self.private
            .as_ref()
            .and_then(ServicePrivate::as_pipeline)
            .map(PipelineServer::name)
    }

    /// Release the handle.
    ///
    /// The remote instance is destroyed first; local state is freed whether
    /// or not that succeeds, and the remote error is returned. Calling this on
    /// a released handle is a no-op.
    pub fn destroy(&mut self) -> ServiceResult<()> {
        match self.private.take() {
            Some(private) => private.release(self.agent.as_ref()),
            None => Ok(()),
        }
    }
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        if let Err(e) = self.destroy() {
            warn!("Failed to release {:?} handle on drop: {}", self.kind, e);
        }
    }
}

impl fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("kind", &self.kind)
            .field("valid", &self.is_valid())
            .field("name", &self.name())
            .finish()
    }
}
