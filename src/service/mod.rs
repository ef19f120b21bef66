// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Public service API: pipelines, models and resources held by the agent.
//!
//! Every operation checks the feature gate, validates its arguments locally,
//! then issues at most one remote call. Local validation failures never
//! reach the agent.

mod handle;
mod model;
mod pipeline;
mod resource;

pub use handle::{ServiceHandle, ServiceKind};
pub use pipeline::PipelineState;

use std::sync::Arc;

use tracing::error;

use crate::agent::{AgentError, AgentTransport, IpcAgent};
use crate::config::{FeatureGate, ServiceConfig};
use crate::error::{ServiceError, ServiceResult};
use crate::identity::{EnvIdentity, IdentityProvider, NoIdentity};
use crate::path::PredefinedEntities;
use crate::telemetry::record_agent_call;

/// Entry point for all service operations.
pub struct MlService {
    feature: FeatureGate,
    agent: Arc<dyn AgentTransport>,
    identity: Arc<dyn IdentityProvider>,
    entities: PredefinedEntities,
}

impl MlService {
    /// Service over `agent` with the feature enabled, no identity and no
    /// predefined entities.
    pub fn new(agent: Arc<dyn AgentTransport>) -> Self {
        Self {
            feature: FeatureGate::Supported,
            agent,
            identity: Arc::new(NoIdentity),
            entities: PredefinedEntities::default(),
        }
    }

    /// Service talking to the agent over IPC as described by `config`.
    pub fn from_config(config: &ServiceConfig) -> ServiceResult<Self> {
        let agent = IpcAgent::new(config.ipc.clone())?;
        Ok(Self::new(Arc::new(agent))
            .with_feature(config.feature)
            .with_identity(Arc::new(EnvIdentity))
            .with_entities(config.entities.clone()))
    }

    pub fn with_feature(mut self, feature: FeatureGate) -> Self {
        self.feature = feature;
        self
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_entities(mut self, entities: PredefinedEntities) -> Self {
        self.entities = entities;
        self
    }

    pub fn feature(&self) -> FeatureGate {
        self.feature
    }

    pub fn agent(&self) -> &Arc<dyn AgentTransport> {
        &self.agent
    }

    fn check_feature(&self) -> ServiceResult<()> {
        if self.feature.is_supported() {
            Ok(())
        } else {
            Err(ServiceError::NotSupported)
        }
    }

    /// Record the outcome of a remote call and lift its error.
    fn remote<T>(&self, method: &'static str, result: Result<T, AgentError>) -> ServiceResult<T> {
        observe(method, result)
    }

    /// Remote query returning a JSON document. An empty document is a failure.
    fn query(&self, method: &'static str, result: Result<String, AgentError>) -> ServiceResult<String> {
        let json = self.remote(method, result)?;
        if json.is_empty() {
            error!("Failed to invoke the method {}: empty response.", method);
            return Err(AgentError::InvalidReply {
                method,
                detail: "empty response".into(),
            }
            .into());
        }
        Ok(json)
    }
}

pub(crate) fn observe<T>(method: &'static str, result: Result<T, AgentError>) -> ServiceResult<T> {
    record_agent_call(method, result.is_ok());
    result.map_err(|e| {
        error!("Failed to invoke the method {}: {}", method, e);
        ServiceError::Remote(e)
    })
}

fn require_name(name: &str, what: &str) -> ServiceResult<()> {
    if name.is_empty() {
        return Err(ServiceError::invalid(format!(
            "The parameter, '{}' is empty. It should be a valid string.",
            what
        )));
    }
    Ok(())
}

fn require_version(version: u32) -> ServiceResult<()> {
    if version == 0 {
        return Err(ServiceError::invalid(
            "The parameter, 'version' is 0. It should be a valid unsigned int.",
        ));
    }
    Ok(())
}
