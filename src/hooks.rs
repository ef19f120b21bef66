// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Package manager metadata hooks.
//!
//! Invoked when an application carrying service metadata is installed,
//! upgraded or removed. The hooks only log what they receive and always
//! report success to the package manager.

use std::fmt;

use tracing::{error, info};

/// Package lifecycle event delivered to the hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageEvent {
    Install,
    Uninstall,
    Upgrade,
    Clean,
    Undo,
    Removed,
    RecoverInstall,
    RecoverUpgrade,
    RecoverUninstall,
}

impl PackageEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Install => "INSTALL",
            Self::Uninstall => "UNINSTALL",
            Self::Upgrade => "UPGRADE",
            Self::Clean => "CLEAN",
            Self::Undo => "UNDO",
            Self::Removed => "REMOVED",
            Self::RecoverInstall => "RECOVERINSTALL",
            Self::RecoverUpgrade => "RECOVERUPGRADE",
            Self::RecoverUninstall => "RECOVERUNINSTALL",
        }
    }
}

impl fmt::Display for PackageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One metadata key/value pair from the package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// Handle a package event. Returns the status reported to the package
/// manager, which is always `0`.
pub fn on_package_event(
    event: PackageEvent,
    pkgid: &str,
    appid: &str,
    metadata: &[MetadataEntry],
) -> i32 {
    info!("METADATA {}", event);
    info!("pkgid({}) appid({}) list({})", pkgid, appid, metadata.len());

    match event {
        PackageEvent::Install if metadata.is_empty() => {
            error!("No service metadata attached to package '{}'", pkgid);
        }
        PackageEvent::Uninstall => {
            for entry in metadata.iter().filter(|e| !e.key.is_empty()) {
                info!(" - key({}) value({})", entry.key, entry.value);
            }
        }
        _ => {}
    }
    0
}
