// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Decoded records returned by registry queries.
//!
//! An [`Information`] is an ordered key/value record for one entity (a model
//! version, a resource entry). An [`InformationList`] owns a sequence of them
//! in discovery order. Both own their strings; dropping releases everything.

use crate::error::{ServiceError, ServiceResult};

/// Ordered string record with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Information {
    entries: Vec<(String, String)>,
}

impl Information {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`, replacing an existing value in place so the
    /// key keeps its original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> ServiceResult<()> {
        let key = key.into();
        let value = value.into();

        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
            return Ok(());
        }

        self.entries.try_reserve(1)?;
        self.entries.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`get`](Self::get) but reports a missing key as an error.
    pub fn require(&self, key: &str) -> ServiceResult<&str> {
        self.get(key)
            .ok_or_else(|| ServiceError::invalid(format!("no value for key '{}'", key)))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered sequence of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InformationList {
    items: Vec<Information>,
}

impl InformationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, info: Information) -> ServiceResult<()> {
        self.items.try_reserve(1)?;
        self.items.push(info);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Information> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Information> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Information> {
        self.items
    }
}

impl<'a> IntoIterator for &'a InformationList {
    type Item = &'a Information;
    type IntoIter = std::slice::Iter<'a, Information>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for InformationList {
    type Item = Information;
    type IntoIter = std::vec::IntoIter<Information>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
