// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Client configuration loading from environment variables and TOML files.
//!
//! All values are loaded from `ML_SERVICE_*` environment variables with
//! sensible defaults. Invalid values fall back to defaults without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `ML_SERVICE_FEATURE` | 1 | Service API availability (`0`, `false`, `off` disable it) |
//! | `ML_SERVICE_SOCKET_PATH` | `/run/ml-agent/ml-agent.sock` | Agent IPC endpoint |
//! | `ML_SERVICE_CALL_TIMEOUT` | 10 | Transport timeout per call (secs) |
//! | `ML_SERVICE_FRAME_LIMIT` | 16777216 | Max IPC frame size (bytes) |
//! | `ML_SERVICE_APP_RW_PATH` | unset | Value of `@APP_RW_PATH@` |
//! | `ML_SERVICE_APP_RO_PATH` | unset | Value of `@APP_RO_PATH@` |
//! | `ML_SERVICE_LOG` | info | Log filter |
//! | `ML_SERVICE_LOG_FORMAT` | json | `json` or `pretty` |

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::agent::protocol::DEFAULT_MAX_FRAME_SIZE;
use crate::agent::IpcAgentConfig;
use crate::path::PredefinedEntities;
use crate::telemetry::{LogConfig, LogFormat};

#[cfg(unix)]
pub const DEFAULT_SOCKET_PATH: &str = "/run/ml-agent/ml-agent.sock";

#[cfg(windows)]
pub const DEFAULT_SOCKET_PATH: &str = r"\\.\pipe\ml-agent";

const DEFAULT_CALL_TIMEOUT_SECS: u64 = 10;
const MIN_FRAME: usize = 4096; // floor: 4 KiB

/// Whether the service API is available in this process.
///
/// Checked first by every public operation. Set once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureGate {
    #[default]
    Supported,
    NotSupported,
}

impl FeatureGate {
    pub fn is_supported(self) -> bool {
        self == Self::Supported
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// All client configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub feature: FeatureGate,
    pub ipc: IpcAgentConfig,
    pub entities: PredefinedEntities,
    pub log: LogConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            feature: FeatureGate::Supported,
            ipc: IpcAgentConfig::default(),
            entities: PredefinedEntities::default(),
            log: LogConfig::default(),
        }
    }
}

/// On-disk representation; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    feature: Option<bool>,
    socket_path: Option<String>,
    call_timeout_secs: Option<u64>,
    frame_limit: Option<usize>,
    app_rw_path: Option<String>,
    app_ro_path: Option<String>,
    log_level: Option<String>,
    log_format: Option<String>,
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn parse_log_format(val: &str) -> Option<LogFormat> {
    match val.trim().to_ascii_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" => Some(LogFormat::Pretty),
        _ => None,
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Parse a `u64` env var, returning `None` on missing or invalid.
fn parse_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse::<u64>().ok())
}

/// Parse a `usize` env var, returning `None` on missing or invalid.
fn parse_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.parse::<usize>().ok())
}

impl ServiceConfig {
    /// Apply `ML_SERVICE_*` overrides on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(enabled) = std::env::var("ML_SERVICE_FEATURE").ok().and_then(|v| parse_bool(&v)) {
            self.feature = gate(enabled);
        }
        if let Some(path) = env_nonempty("ML_SERVICE_SOCKET_PATH") {
            self.ipc.socket_path = path;
        }
        if let Some(secs) = parse_u64("ML_SERVICE_CALL_TIMEOUT") {
            self.ipc.call_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(limit) = parse_usize("ML_SERVICE_FRAME_LIMIT") {
            self.ipc.max_frame_size = limit.max(MIN_FRAME);
        }
        if let Some(rw) = env_nonempty("ML_SERVICE_APP_RW_PATH") {
            self.entities.app_rw_path = Some(rw);
        }
        if let Some(ro) = env_nonempty("ML_SERVICE_APP_RO_PATH") {
            self.entities.app_ro_path = Some(ro);
        }
        if let Some(level) = env_nonempty("ML_SERVICE_LOG") {
            self.log.level = level;
        }
        if let Some(format) = std::env::var("ML_SERVICE_LOG_FORMAT")
            .ok()
            .and_then(|v| parse_log_format(&v))
        {
            self.log.format = format;
        }
        self
    }

    /// Summary of effective values as `KEY=value` pairs.
    pub fn effective(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ML_SERVICE_FEATURE", u8::from(self.feature.is_supported()).to_string()),
            ("ML_SERVICE_SOCKET_PATH", self.ipc.socket_path.clone()),
            ("ML_SERVICE_CALL_TIMEOUT", self.ipc.call_timeout.as_secs().to_string()),
            ("ML_SERVICE_FRAME_LIMIT", self.ipc.max_frame_size.to_string()),
            (
                "ML_SERVICE_APP_RW_PATH",
                self.entities.app_rw_path.clone().unwrap_or_default(),
            ),
            (
                "ML_SERVICE_APP_RO_PATH",
                self.entities.app_ro_path.clone().unwrap_or_default(),
            ),
            ("ML_SERVICE_LOG", self.log.level.clone()),
        ]
    }
}

fn gate(enabled: bool) -> FeatureGate {
    if enabled {
        FeatureGate::Supported
    } else {
        FeatureGate::NotSupported
    }
}

/// Load configuration from environment variables.
///
/// Missing or invalid values fall back to safe defaults without panicking.
pub fn load() -> ServiceConfig {
    ServiceConfig::default().with_env_overrides()
}

/// Load configuration from a TOML file. Environment overrides are not applied.
pub fn load_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    parse_toml(&text)
}

fn parse_toml(text: &str) -> Result<ServiceConfig, ConfigError> {
    let file: FileConfig = toml::from_str(text)?;
    let mut cfg = ServiceConfig::default();

    if let Some(enabled) = file.feature {
        cfg.feature = gate(enabled);
    }
    if let Some(path) = file.socket_path {
        cfg.ipc.socket_path = path;
    }
    let secs = file.call_timeout_secs.unwrap_or(DEFAULT_CALL_TIMEOUT_SECS);
    cfg.ipc.call_timeout = Duration::from_secs(secs.max(1));
    cfg.ipc.max_frame_size = file.frame_limit.unwrap_or(DEFAULT_MAX_FRAME_SIZE).max(MIN_FRAME);
    cfg.entities.app_rw_path = file.app_rw_path;
    cfg.entities.app_ro_path = file.app_ro_path;
    if let Some(level) = file.log_level {
        cfg.log.level = level;
    }
    if let Some(format) = file.log_format.as_deref().and_then(parse_log_format) {
        cfg.log.format = format;
    }
    Ok(cfg)
}
