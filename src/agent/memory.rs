// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! In-process agent keeping all state in memory.
//!
//! Behaves like the daemon for every call in [`AgentTransport`]: pipelines
//! launch into READY, model versions are assigned per name starting at 1 and
//! never reused, at most one version per name is active. Call counts and
//! injected failures make it usable as a test double.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::{json, Value};

use super::{AgentError, AgentTransport, ModelRegistration, PipelineId, ResourceRegistration};
use crate::error::ErrorCode;
use crate::service::PipelineState;

struct ModelRecord {
    version: u32,
    active: bool,
    path: String,
    description: String,
    app_info: String,
}

impl ModelRecord {
    fn to_json(&self) -> Value {
        json!({
            "version": self.version.to_string(),
            "active": if self.active { "T" } else { "F" },
            "path": self.path,
            "description": self.description,
            "app_info": self.app_info,
        })
    }
}

struct ResourceRecord {
    path: String,
    description: String,
    app_info: String,
}

#[derive(Default)]
struct AgentState {
    descriptions: HashMap<String, String>,
    instances: HashMap<PipelineId, String>,
    next_pipeline_id: PipelineId,
    models: HashMap<String, Vec<ModelRecord>>,
    next_version: HashMap<String, u32>,
    resources: HashMap<String, Vec<ResourceRecord>>,
}

/// Thread-safe in-memory agent.
pub struct InMemoryAgent {
    state: Mutex<AgentState>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failures: Mutex<HashMap<&'static str, i32>>,
}

fn not_found(what: impl std::fmt::Display) -> AgentError {
    AgentError::status(ErrorCode::InvalidParameter, format!("{} not found", what))
}

impl InMemoryAgent {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AgentState { next_pipeline_id: 1, ..AgentState::default() }),
            calls: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Number of calls received for `method`, failed ones included.
    pub fn call_count(&self, method: &str) -> usize {
        self.calls.lock().get(method).copied().unwrap_or(0)
    }

    /// Total number of calls received.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    /// Make every call to `method` fail with `code` until cleared.
    pub fn fail_method(&self, method: &'static str, code: i32) {
        self.failures.lock().insert(method, code);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    /// Number of launched pipeline instances not yet destroyed.
    pub fn live_pipelines(&self) -> usize {
        self.state.lock().instances.len()
    }

    fn enter(&self, method: &'static str) -> Result<(), AgentError> {
        *self.calls.lock().entry(method).or_insert(0) += 1;
        match self.failures.lock().get(method) {
            Some(&code) => Err(AgentError::Status {
                code,
                message: format!("injected failure for {}", method),
            }),
            None => Ok(()),
        }
    }
}

impl Default for InMemoryAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentTransport for InMemoryAgent {
    fn pipeline_set_description(&self, name: &str, description: &str) -> Result<(), AgentError> {
        self.enter("pipeline_set_description")?;
        self.state
            .lock()
            .descriptions
            .insert(name.to_string(), description.to_string());
        Ok(())
    }

    fn pipeline_get_description(&self, name: &str) -> Result<String, AgentError> {
        self.enter("pipeline_get_description")?;
        self.state
            .lock()
            .descriptions
            .get(name)
            .cloned()
            .ok_or_else(|| not_found(format!("pipeline '{}'", name)))
    }

    fn pipeline_delete(&self, name: &str) -> Result<(), AgentError> {
        self.enter("pipeline_delete")?;
        self.state
            .lock()
            .descriptions
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("pipeline '{}'", name)))
    }

    fn pipeline_launch(&self, name: &str) -> Result<PipelineId, AgentError> {
        self.enter("pipeline_launch")?;
        let mut state = self.state.lock();
        if !state.descriptions.contains_key(name) {
            return Err(not_found(format!("pipeline '{}'", name)));
        }
        let id = state.next_pipeline_id;
        state.next_pipeline_id += 1;
        state.instances.insert(id, name.to_string());
        Ok(id)
    }

    fn pipeline_get_state(&self, id: PipelineId) -> Result<i32, AgentError> {
        self.enter("pipeline_get_state")?;
        if self.state.lock().instances.contains_key(&id) {
            Ok(PipelineState::Ready as i32)
        } else {
            Err(not_found(format!("pipeline instance {}", id)))
        }
    }

    fn pipeline_destroy(&self, id: PipelineId) -> Result<(), AgentError> {
        self.enter("pipeline_destroy")?;
        self.state
            .lock()
            .instances
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("pipeline instance {}", id)))
    }

    fn model_register(&self, registration: &ModelRegistration<'_>) -> Result<u32, AgentError> {
        self.enter("model_register")?;
        let mut state = self.state.lock();

        let next = state
            .next_version
            .entry(registration.name.to_string())
            .or_insert(1);
        let version = *next;
        *next += 1;

        let records = state.models.entry(registration.name.to_string()).or_default();
        if registration.activate {
            records.iter_mut().for_each(|r| r.active = false);
        }
        records.push(ModelRecord {
            version,
            active: registration.activate,
            path: registration.path.to_string(),
            description: registration.description.to_string(),
            app_info: registration.app_info.to_string(),
        });
        Ok(version)
    }

    fn model_update_description(
        &self,
        name: &str,
        version: u32,
        description: &str,
    ) -> Result<(), AgentError> {
        self.enter("model_update_description")?;
        let mut state = self.state.lock();
        let record = state
            .models
            .get_mut(name)
            .and_then(|records| records.iter_mut().find(|r| r.version == version))
            .ok_or_else(|| not_found(format!("model '{}' version {}", name, version)))?;
        record.description = description.to_string();
        Ok(())
    }

    fn model_activate(&self, name: &str, version: u32) -> Result<(), AgentError> {
        self.enter("model_activate")?;
        let mut state = self.state.lock();
        let records = state
            .models
            .get_mut(name)
            .ok_or_else(|| not_found(format!("model '{}'", name)))?;
        if !records.iter().any(|r| r.version == version) {
            return Err(not_found(format!("model '{}' version {}", name, version)));
        }
        for record in records.iter_mut() {
            record.active = record.version == version;
        }
        Ok(())
    }

    fn model_get(&self, name: &str, version: u32) -> Result<String, AgentError> {
        self.enter("model_get")?;
        let state = self.state.lock();
        state
            .models
            .get(name)
            .and_then(|records| records.iter().find(|r| r.version == version))
            .map(|r| r.to_json().to_string())
            .ok_or_else(|| not_found(format!("model '{}' version {}", name, version)))
    }

    fn model_get_activated(&self, name: &str) -> Result<String, AgentError> {
        self.enter("model_get_activated")?;
        let state = self.state.lock();
        state
            .models
            .get(name)
            .and_then(|records| records.iter().find(|r| r.active))
            .map(|r| r.to_json().to_string())
            .ok_or_else(|| not_found(format!("active model '{}'", name)))
    }

    fn model_get_all(&self, name: &str) -> Result<String, AgentError> {
        self.enter("model_get_all")?;
        let state = self.state.lock();
        match state.models.get(name) {
            Some(records) if !records.is_empty() => {
                let all: Vec<Value> = records.iter().map(ModelRecord::to_json).collect();
                Ok(Value::Array(all).to_string())
            }
            _ => Err(not_found(format!("model '{}'", name))),
        }
    }

    fn model_delete(&self, name: &str, version: u32, _force: bool) -> Result<(), AgentError> {
        self.enter("model_delete")?;
        let mut state = self.state.lock();
        let records = state
            .models
            .get_mut(name)
            .ok_or_else(|| not_found(format!("model '{}'", name)))?;

        if version == 0 {
            records.clear();
        } else {
            let before = records.len();
            records.retain(|r| r.version != version);
            if records.len() == before {
                return Err(not_found(format!("model '{}' version {}", name, version)));
            }
        }

        if records.is_empty() {
            state.models.remove(name);
        }
        Ok(())
    }

    fn resource_add(&self, registration: &ResourceRegistration<'_>) -> Result<(), AgentError> {
        self.enter("resource_add")?;
        self.state
            .lock()
            .resources
            .entry(registration.name.to_string())
            .or_default()
            .push(ResourceRecord {
                path: registration.path.to_string(),
                description: registration.description.to_string(),
                app_info: registration.app_info.to_string(),
            });
        Ok(())
    }

    fn resource_delete(&self, name: &str) -> Result<(), AgentError> {
        self.enter("resource_delete")?;
        self.state
            .lock()
            .resources
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("resource '{}'", name)))
    }

    fn resource_get(&self, name: &str) -> Result<String, AgentError> {
        self.enter("resource_get")?;
        let state = self.state.lock();
        let records = state
            .resources
            .get(name)
            .ok_or_else(|| not_found(format!("resource '{}'", name)))?;
        let all: Vec<Value> = records
            .iter()
            .map(|r| {
                json!({
                    "name": name,
                    "path": r.path,
                    "description": r.description,
                    "app_info": r.app_info,
                })
            })
            .collect();
        Ok(Value::Array(all).to_string())
    }
}
