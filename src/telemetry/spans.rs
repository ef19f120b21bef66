// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Span utilities and extension traits for service call tracing.

use tracing::{debug_span, Span};

/// Extension trait for adding context to spans.
pub trait SpanExt {
    /// Record the result of an operation into the span.
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }
}

/// Factory for service operation spans.
pub struct CallSpan;

impl CallSpan {
    /// Span for one public operation.
    ///
    /// - `operation`: public operation name, e.g. `model_register`
    /// - `target`: pipeline, model or resource name the call is about
    /// - `status` / `error.message`: filled by `SpanExt::record_result`
    pub fn new(operation: &'static str, target: &str) -> Span {
        debug_span!(
            "service_call",
            operation = operation,
            target = %target,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    }
}
