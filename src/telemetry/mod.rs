// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Telemetry for the service client.
//!
//! Provides structured logging, per-call spans and agent call counters.
//! The library never installs an exporter; the embedding process decides.

mod counters;
mod logging;
mod spans;

pub use counters::{record_agent_call, AGENT_CALLS_TOTAL, AGENT_FAILURES_TOTAL};
pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use spans::{CallSpan, SpanExt};
