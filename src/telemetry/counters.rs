// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Agent call counters on the `metrics` facade.

/// Every remote call issued, labelled by method.
pub const AGENT_CALLS_TOTAL: &str = "ml_service_agent_calls_total";
/// Remote calls that returned a failure, labelled by method.
pub const AGENT_FAILURES_TOTAL: &str = "ml_service_agent_failures_total";

/// Count one remote call. No-op unless a recorder is installed.
pub fn record_agent_call(method: &'static str, ok: bool) {
    metrics::counter!(AGENT_CALLS_TOTAL, "method" => method).increment(1);
    if !ok {
        metrics::counter!(AGENT_FAILURES_TOTAL, "method" => method).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_recorder_is_noop() {
        record_agent_call("model_get", true);
        record_agent_call("model_get", false);
    }
}
