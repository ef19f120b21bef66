// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Best-effort application identity attached to registered assets.
//!
//! Missing identity is never an error: callers send an empty document.

use serde::Serialize;
use tracing::{debug, warn};

/// Identity of the calling application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub app_id: String,
    pub is_rpk: bool,
}

#[derive(Serialize)]
struct AppInfoDoc<'a> {
    is_rpk: &'a str,
    app_id: &'a str,
}

impl AppInfo {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self { app_id: app_id.into(), is_rpk: false }
    }

    /// Render the identity document sent alongside register/add calls.
    pub fn to_json(&self) -> Option<String> {
        let doc = AppInfoDoc {
            is_rpk: if self.is_rpk { "T" } else { "F" },
            app_id: &self.app_id,
        };
        match serde_json::to_string_pretty(&doc) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!("Failed to render app info: {}", e);
                None
            }
        }
    }
}

/// Source of the calling application's identity.
pub trait IdentityProvider: Send + Sync {
    /// `None` when the process is not running in an application context.
    fn app_info(&self) -> Option<AppInfo>;
}

/// Provider for processes without an application context.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIdentity;

impl IdentityProvider for NoIdentity {
    fn app_info(&self) -> Option<AppInfo> {
        None
    }
}

/// Fixed identity, mostly for embedding and tests.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub AppInfo);

impl IdentityProvider for StaticIdentity {
    fn app_info(&self) -> Option<AppInfo> {
        Some(self.0.clone())
    }
}

/// Reads the application id from `ML_SERVICE_APP_ID` on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvIdentity;

pub const APP_ID_ENV: &str = "ML_SERVICE_APP_ID";

impl IdentityProvider for EnvIdentity {
    fn app_info(&self) -> Option<AppInfo> {
        match std::env::var(APP_ID_ENV) {
            Ok(id) if !id.is_empty() => Some(AppInfo::new(id)),
            _ => {
                debug!("Not an app context, skip creating app_info.");
                None
            }
        }
    }
}

/// Identity document for a remote call, or `""` when there is none.
pub fn app_info_document(provider: &dyn IdentityProvider) -> String {
    provider
        .app_info()
        .and_then(|info| info.to_json())
        .unwrap_or_default()
}
