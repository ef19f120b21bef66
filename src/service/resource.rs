// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Resource registry operations.
//!
//! Several files may be registered under one resource name; queries always
//! return the full list.

use tracing::error;

use super::{require_name, MlService};
use crate::agent::ResourceRegistration;
use crate::decode::decode_information_list;
use crate::error::ServiceResult;
use crate::identity::app_info_document;
use crate::information::InformationList;
use crate::path::check_path;

impl MlService {
    /// Add the file at `path` to the resource named `name`.
    pub fn resource_add(
        &self,
        name: &str,
        path: &str,
        description: Option<&str>,
    ) -> ServiceResult<()> {
        self.check_feature()?;
        require_name(name, "name")?;

        let converted = self.entities.convert(path);
        if let Err(e) = check_path(&converted) {
            error!("Resource path rejected: {}", e);
            return Err(e.into());
        }

        let app_info = app_info_document(self.identity.as_ref());
        let registration = ResourceRegistration {
            name,
            path: &converted,
            description: description.unwrap_or(""),
            app_info: &app_info,
        };
        self.remote("resource_add", self.agent.resource_add(&registration))
    }

    /// Remove every file registered under `name`.
    pub fn resource_delete(&self, name: &str) -> ServiceResult<()> {
        self.check_feature()?;
        require_name(name, "name")?;

        self.remote("resource_delete", self.agent.resource_delete(name))
    }

    pub fn resource_get(&self, name: &str) -> ServiceResult<InformationList> {
        self.check_feature()?;
        require_name(name, "name")?;

        let json = self.query("resource_get", self.agent.resource_get(name))?;
        decode_information_list(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::InMemoryAgent;
    use crate::error::ServiceError;
    use crate::identity::{AppInfo, StaticIdentity};
    use std::sync::Arc;

    #[test]
    fn test_add_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("labels.txt");
        let second = dir.path().join("anchors.txt");
        std::fs::write(&first, b"cat\ndog\n").unwrap();
        std::fs::write(&second, b"0.5").unwrap();

        let service = MlService::new(Arc::new(InMemoryAgent::new()))
            .with_identity(Arc::new(StaticIdentity(AppInfo::new("org.example.app"))));
        service.resource_add("res", first.to_str().unwrap(), Some("labels")).unwrap();
        service.resource_add("res", second.to_str().unwrap(), None).unwrap();

        let list = service.resource_get("res").unwrap();
        assert_eq!(list.len(), 2);
        let labels = list.get(0).unwrap();
        assert_eq!(labels.get("description"), Some("labels"));
        assert!(labels.get("app_info").unwrap().contains("org.example.app"));
        // Empty description is dropped by the decoder.
        assert!(!list.get(1).unwrap().contains_key("description"));

        service.resource_delete("res").unwrap();
        assert!(matches!(service.resource_get("res"), Err(ServiceError::Remote(_))));
    }

    #[test]
    fn test_add_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        let agent = Arc::new(InMemoryAgent::new());
        let service = MlService::new(agent.clone());

        let err = service.resource_add("res", missing.to_str().unwrap(), None).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPath(_)));
        assert_eq!(agent.call_count("resource_add"), 0);
    }

    #[test]
    fn test_empty_name_rejected() {
        let agent = Arc::new(InMemoryAgent::new());
        let service = MlService::new(agent.clone());
        assert!(matches!(service.resource_get(""), Err(ServiceError::InvalidArgument(_))));
        assert_eq!(agent.total_calls(), 0);
    }
}
