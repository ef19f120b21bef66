// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, defaults, validate.
//!
//! These commands read configuration directly from environment variables
//! or a TOML file without contacting the agent.

use std::path::Path;

use super::{EXIT_FAILURE, EXIT_OK};
use crate::config::{self, ServiceConfig};

/// Print effective config as key-value pairs to stdout.
pub fn run_show() {
    print_config(&config::load());
}

/// Print default config values (no env overrides) to stdout.
pub fn run_defaults() {
    print_config(&ServiceConfig::default());
}

/// Validate a config file, or the environment when `path` is `None`.
///
/// Returns 0 if valid, 1 on a parse error or any warning.
pub fn run_validate(path: Option<&str>) -> i32 {
    let cfg = match path {
        Some(p) => match config::load_file(Path::new(p)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                return EXIT_FAILURE;
            }
        },
        None => config::load(),
    };

    let warnings = validate(&cfg);
    for w in &warnings {
        eprintln!("WARNING: {}", w);
    }

    if warnings.is_empty() {
        println!("Configuration is valid.");
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

fn validate(cfg: &ServiceConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !cfg.feature.is_supported() {
        warnings.push("ML_SERVICE_FEATURE is off; every operation will fail".to_string());
    }
    if cfg.ipc.socket_path.is_empty() {
        warnings.push("ML_SERVICE_SOCKET_PATH is empty".to_string());
    }
    for (key, value) in [
        ("ML_SERVICE_APP_RW_PATH", &cfg.entities.app_rw_path),
        ("ML_SERVICE_APP_RO_PATH", &cfg.entities.app_ro_path),
    ] {
        if let Some(dir) = value {
            if !Path::new(dir).is_absolute() {
                warnings.push(format!("{} ({}) is not an absolute path", key, dir));
            }
        }
    }
    warnings
}

fn print_config(cfg: &ServiceConfig) {
    for (key, value) in cfg.effective() {
        println!("{}={}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureGate;

    #[test]
    fn test_defaults_validate_cleanly() {
        assert!(validate(&ServiceConfig::default()).is_empty());
    }

    #[test]
    fn test_validate_flags_problems() {
        let mut cfg = ServiceConfig::default();
        cfg.feature = FeatureGate::NotSupported;
        cfg.entities.app_rw_path = Some("relative/dir".into());
        let warnings = validate(&cfg);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[1].contains("ML_SERVICE_APP_RW_PATH"));
    }

    #[test]
    fn test_validate_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(&good, "socket_path = \"/tmp/agent.sock\"\n").unwrap();
        assert_eq!(run_validate(good.to_str()), EXIT_OK);

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "call_timeout_secs = \"soon\"\n").unwrap();
        assert_eq!(run_validate(bad.to_str()), EXIT_FAILURE);
    }

    #[test]
    fn test_show_smoke() {
        run_defaults();
    }
}
