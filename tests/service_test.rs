//! End-to-end service scenarios against the in-memory agent.
//!
//! Covers pipeline round trips, model version assignment, local rejection
//! of invalid input and handle release semantics.

use std::fs;
use std::sync::Arc;

use ml_service_core::agent::{AgentError, InMemoryAgent};
use ml_service_core::path::PathError;
use ml_service_core::{FeatureGate, MlService, PipelineState, ServiceError};

fn service() -> (Arc<InMemoryAgent>, MlService) {
    let agent = Arc::new(InMemoryAgent::new());
    let service = MlService::new(agent.clone());
    (agent, service)
}

fn model_dir() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let models = dir.path().join("models");
    fs::create_dir(&models).unwrap();
    let file = models.join("a.bin");
    fs::write(&file, b"weights").unwrap();
    let path = file.to_str().unwrap().to_string();
    (dir, path)
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

#[test]
fn test_pipeline_description_roundtrip() {
    let (_agent, service) = service();
    let descriptions = [
        "videotestsrc ! fakesink",
        "v4l2src ! videoconvert ! tensor_converter ! tensor_filter framework=tflite model=/m.tflite ! tensor_sink",
        "appsrc name=in ! other/tensors,num_tensors=1 ! tensor_sink name=out",
    ];

    for (i, desc) in descriptions.iter().enumerate() {
        let name = format!("pipeline-{}", i);
        service.pipeline_set_description(&name, desc).unwrap();
        assert_eq!(service.pipeline_get_description(&name).unwrap(), *desc);
    }

    service.pipeline_set_description("pipeline-0", "fakesrc ! fakesink").unwrap();
    assert_eq!(
        service.pipeline_get_description("pipeline-0").unwrap(),
        "fakesrc ! fakesink"
    );
}

#[test]
fn test_pipeline_delete_then_get_fails_remotely() {
    let (_agent, service) = service();
    service.pipeline_set_description("cam", "videotestsrc ! fakesink").unwrap();
    service.pipeline_delete("cam").unwrap();

    let err = service.pipeline_get_description("cam").unwrap_err();
    assert!(matches!(err, ServiceError::Remote(AgentError::Status { .. })));
    assert!(!err.is_local());
}

#[test]
fn test_empty_arguments_never_reach_agent() {
    let (agent, service) = service();
    assert!(matches!(
        service.pipeline_set_description("", "fakesrc ! fakesink"),
        Err(ServiceError::InvalidArgument(_))
    ));
    assert!(matches!(
        service.pipeline_set_description("cam", ""),
        Err(ServiceError::InvalidArgument(_))
    ));
    assert!(service.pipeline_launch("").is_err());
    assert!(service.model_get_all("").is_err());
    assert!(service.resource_add("", "/tmp/x", None).is_err());
    assert_eq!(agent.total_calls(), 0);
}

#[test]
fn test_launch_returns_bound_handle_or_error() {
    let (agent, service) = service();

    // No description stored: the agent refuses and no handle escapes.
    assert!(service.pipeline_launch("cam").is_err());
    assert_eq!(agent.live_pipelines(), 0);

    service.pipeline_set_description("cam", "videotestsrc ! fakesink").unwrap();
    let handle = service.pipeline_launch("cam").unwrap();
    assert!(handle.is_valid());
    assert_eq!(service.pipeline_get_state(&handle).unwrap(), PipelineState::Ready);
}

#[test]
fn test_destroy_twice_is_noop() {
    let (agent, service) = service();
    service.pipeline_set_description("cam", "videotestsrc ! fakesink").unwrap();
    let mut handle = service.pipeline_launch("cam").unwrap();

    handle.destroy().unwrap();
    handle.destroy().unwrap();
    assert_eq!(agent.call_count("pipeline_destroy"), 1);
    assert_eq!(agent.live_pipelines(), 0);

    let err = service.pipeline_get_state(&handle).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
    assert_eq!(agent.call_count("pipeline_get_state"), 0);
}

#[test]
fn test_dropped_handle_destroys_remote_instance() {
    let (agent, service) = service();
    service.pipeline_set_description("cam", "videotestsrc ! fakesink").unwrap();
    {
        let _handle = service.pipeline_launch("cam").unwrap();
        assert_eq!(agent.live_pipelines(), 1);
    }
    assert_eq!(agent.live_pipelines(), 0);
}

#[test]
fn test_handles_are_independent() {
    let (agent, service) = service();
    service.pipeline_set_description("cam", "videotestsrc ! fakesink").unwrap();
    let mut first = service.pipeline_launch("cam").unwrap();
    let second = service.pipeline_launch("cam").unwrap();
    assert_eq!(agent.live_pipelines(), 2);

    first.destroy().unwrap();
    assert_eq!(service.pipeline_get_state(&second).unwrap(), PipelineState::Ready);
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[test]
fn test_register_scenario_versions_one_then_two() {
    let (_dir, path) = model_dir();
    let (_agent, service) = service();

    assert_eq!(service.model_register("a", &path, true, None).unwrap(), 1);
    assert_eq!(service.model_register("a", &path, true, None).unwrap(), 2);

    let active = service.model_get_activated("a").unwrap();
    assert_eq!(active.get("version"), Some("2"));
    assert_eq!(active.get("active"), Some("T"));
    assert_eq!(active.get("path"), Some(path.as_str()));

    let all = service.model_get_all("a").unwrap();
    assert_eq!(all.len(), 2);
    let versions: Vec<&str> = all.iter().filter_map(|i| i.get("version")).collect();
    assert_eq!(versions, vec!["1", "2"]);
}

#[test]
fn test_activate_and_update_description() {
    let (_dir, path) = model_dir();
    let (_agent, service) = service();
    service.model_register("a", &path, true, Some("first")).unwrap();
    service.model_register("a", &path, false, None).unwrap();

    service.model_activate("a", 2).unwrap();
    service.model_update_description("a", 2, "second").unwrap();

    let active = service.model_get_activated("a").unwrap();
    assert_eq!(active.get("version"), Some("2"));
    assert_eq!(active.get("description"), Some("second"));
    assert_eq!(service.model_get("a", 1).unwrap().get("active"), Some("F"));
}

#[test]
fn test_zero_version_rejected_locally() {
    let (agent, service) = service();
    assert!(matches!(service.model_activate("a", 0), Err(ServiceError::InvalidArgument(_))));
    assert!(matches!(
        service.model_update_description("a", 0, "x"),
        Err(ServiceError::InvalidArgument(_))
    ));
    assert_eq!(agent.call_count("model_activate"), 0);
    assert_eq!(agent.call_count("model_update_description"), 0);
}

#[test]
fn test_empty_description_update_rejected_locally() {
    let (_dir, path) = model_dir();
    let (agent, service) = service();
    service.model_register("a", &path, true, Some("orig")).unwrap();

    assert!(matches!(
        service.model_update_description("a", 1, ""),
        Err(ServiceError::InvalidArgument(_))
    ));
    assert_eq!(agent.call_count("model_update_description"), 0);
    assert_eq!(service.model_get("a", 1).unwrap().get("description"), Some("orig"));
}

#[test]
fn test_delete_all_versions_with_zero() {
    let (_dir, path) = model_dir();
    let (_agent, service) = service();
    service.model_register("a", &path, true, None).unwrap();
    service.model_register("a", &path, false, None).unwrap();

    service.model_delete("a", 0).unwrap();
    assert!(service.model_get_all("a").is_err());

    // Versions are never reused after deletion.
    assert_eq!(service.model_register("a", &path, true, None).unwrap(), 3);
}

#[test]
fn test_remote_codes_pass_through() {
    let (_dir, path) = model_dir();
    let (agent, service) = service();
    agent.fail_method("model_register", -1234);

    let err = service.model_register("a", &path, true, None).unwrap_err();
    assert_eq!(err.code(), -1234);
    assert_eq!(agent.call_count("model_register"), 1);
}

// ---------------------------------------------------------------------------
// Path validation through the registry
// ---------------------------------------------------------------------------

fn kind(e: &PathError) -> &'static str {
    match e {
        PathError::Empty => "empty",
        PathError::ParentInaccessible(_) => "parent",
        PathError::NotAbsolute(_) => "relative",
        PathError::NotFound(_) => "not-found",
        PathError::SymbolicLink(_) => "symlink",
        PathError::NotRegularFile(_) => "not-regular",
    }
}

#[test]
fn test_register_rejects_each_bad_path_distinctly() {
    let (dir, _path) = model_dir();
    let (agent, service) = service();
    let models = dir.path().join("models");

    let cases = [
        (String::new(), "empty"),
        (models.join("missing.bin").to_str().unwrap().to_string(), "not-found"),
        (models.to_str().unwrap().to_string(), "not-regular"),
        (dir.path().join("no-such-dir/a.bin").to_str().unwrap().to_string(), "parent"),
    ];

    for (path, expected) in cases {
        match service.model_register("a", &path, true, None) {
            Err(ServiceError::InvalidPath(e)) => assert_eq!(kind(&e), expected, "path '{}'", path),
            other => panic!("expected a path error for '{}', got {:?}", path, other),
        }
    }
    assert_eq!(agent.call_count("model_register"), 0);
}

#[cfg(unix)]
#[test]
fn test_register_rejects_symlink() {
    let (dir, path) = model_dir();
    let link = dir.path().join("models/link.bin");
    std::os::unix::fs::symlink(&path, &link).unwrap();

    let (agent, service) = service();
    let err = service
        .model_register("a", link.to_str().unwrap(), true, None)
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidPath(PathError::SymbolicLink(_))));
    assert_eq!(agent.total_calls(), 0);
}

// ---------------------------------------------------------------------------
// Feature gate
// ---------------------------------------------------------------------------

#[test]
fn test_feature_gate_per_instance() {
    let agent = Arc::new(InMemoryAgent::new());
    let disabled = MlService::new(agent.clone()).with_feature(FeatureGate::NotSupported);
    let enabled = MlService::new(agent.clone());

    let err = disabled.pipeline_get_description("cam").unwrap_err();
    assert_eq!(err.code(), -95);
    assert_eq!(agent.total_calls(), 0);

    assert!(enabled.pipeline_get_description("cam").is_err());
    assert_eq!(agent.total_calls(), 1);
}
