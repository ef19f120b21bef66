// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! ML Service Client Core
//!
//! Client side of the machine-learning service agent. Applications use it to
//! store pipeline descriptions, launch pipelines and register model files and
//! resources with a system agent that owns the actual inference work.
//!
//! # Layers
//!
//! - **Validation**: paths and names are checked locally before any remote
//!   call ([`path`], [`identity`]).
//! - **Transport**: every remote operation goes through one
//!   [`AgentTransport`](agent::AgentTransport) call, over IPC in production
//!   or in memory for embedding and tests ([`agent`]).
//! - **Service**: [`MlService`] exposes pipelines, models and resources and
//!   owns handle lifecycle ([`service`]).
//! - **Results**: agent JSON replies decode into [`Information`] records
//!   ([`decode`], [`information`]).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ml_service_core::agent::InMemoryAgent;
//! use ml_service_core::MlService;
//!
//! let service = MlService::new(Arc::new(InMemoryAgent::new()));
//! service.pipeline_set_description("cam", "videotestsrc ! fakesink").unwrap();
//! let mut handle = service.pipeline_launch("cam").unwrap();
//! assert!(service.pipeline_get_state(&handle).is_ok());
//! handle.destroy().unwrap();
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod decode;
pub mod error;
pub mod ffi;
pub mod hooks;
pub mod identity;
pub mod information;
pub mod path;
pub mod service;
pub mod telemetry;

pub use config::{FeatureGate, ServiceConfig};
pub use error::{ErrorCode, ServiceError, ServiceResult};
pub use information::{Information, InformationList};
pub use service::{MlService, PipelineState, ServiceHandle, ServiceKind};
