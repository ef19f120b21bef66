// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Model registry operations.
//!
//! Versions are assigned by the agent; version `0` means "unspecified" and is
//! refused wherever a concrete version is required.

use tracing::error;

use super::{require_name, require_version, MlService};
use crate::agent::{AgentError, ModelRegistration};
use crate::decode::{decode_information, decode_information_list};
use crate::error::ServiceResult;
use crate::identity::app_info_document;
use crate::information::{Information, InformationList};
use crate::path::check_path;
use crate::telemetry::{CallSpan, SpanExt};

impl MlService {
    /// Register the model file at `path` under `name` and return the version
    /// the agent assigned.
    pub fn model_register(
        &self,
        name: &str,
        path: &str,
        activate: bool,
        description: Option<&str>,
    ) -> ServiceResult<u32> {
        self.check_feature()?;
        require_name(name, "name")?;

        let converted = self.entities.convert(path);
        check_path(&converted).map_err(|e| {
            error!("Model path rejected: {}", e);
            e
        })?;

        let app_info = app_info_document(self.identity.as_ref());
        let registration = ModelRegistration {
            name,
            path: &converted,
            activate,
            description: description.unwrap_or(""),
            app_info: &app_info,
        };

        let span = CallSpan::new("model_register", name);
        let result = self
            .remote("model_register", self.agent.model_register(&registration))
            .and_then(|version| {
                if version == 0 {
                    return Err(AgentError::InvalidReply {
                        method: "model_register",
                        detail: "agent assigned version 0".into(),
                    }
                    .into());
                }
                Ok(version)
            });
        span.record_result(&result);
        result
    }

    /// Replace the description of one registered version. An empty
    /// description is refused.
    pub fn model_update_description(
        &self,
        name: &str,
        version: u32,
        description: &str,
    ) -> ServiceResult<()> {
        self.check_feature()?;
        require_name(name, "name")?;
        require_version(version)?;
        require_name(description, "description")?;

        self.remote(
            "model_update_description",
            self.agent.model_update_description(name, version, description),
        )
    }

    /// Make `version` the active version of `name`.
    pub fn model_activate(&self, name: &str, version: u32) -> ServiceResult<()> {
        self.check_feature()?;
        require_name(name, "name")?;
        require_version(version)?;

        self.remote("model_activate", self.agent.model_activate(name, version))
    }

    /// Information about one registered version.
    pub fn model_get(&self, name: &str, version: u32) -> ServiceResult<Information> {
        self.check_feature()?;
        require_name(name, "name")?;

        let json = self.query("model_get", self.agent.model_get(name, version))?;
        decode_information(&json)
    }

    /// Information about the active version.
    pub fn model_get_activated(&self, name: &str) -> ServiceResult<Information> {
        self.check_feature()?;
        require_name(name, "name")?;

        let json = self.query("model_get_activated", self.agent.model_get_activated(name))?;
        decode_information(&json)
    }

    /// Information about every registered version, in agent order.
    pub fn model_get_all(&self, name: &str) -> ServiceResult<InformationList> {
        self.check_feature()?;
        require_name(name, "name")?;

        let json = self.query("model_get_all", self.agent.model_get_all(name))?;
        decode_information_list(&json)
    }

    /// Delete one version, or every version when `version` is 0.
    pub fn model_delete(&self, name: &str, version: u32) -> ServiceResult<()> {
        self.check_feature()?;
        require_name(name, "name")?;

        self.remote("model_delete", self.agent.model_delete(name, version, false))
    }
}
