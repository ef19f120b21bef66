// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Conversion of agent JSON replies into information records.
//!
//! The agent answers a query with either one object or an array of objects.
//! Both shapes go through [`decode_response`]; typed wrappers adapt the result
//! to what a call site expects.

use serde_json::{Map, Value};
use tracing::error;

use crate::error::{ServiceError, ServiceResult};
use crate::information::{Information, InformationList};

/// Result of decoding one agent reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The reply was a single JSON object.
    Single(Information),
    /// The reply was a non-empty JSON array of objects.
    List(InformationList),
}

impl Decoded {
    /// Collapse to one record. A one-element list is accepted.
    pub fn into_information(self) -> ServiceResult<Information> {
        match self {
            Self::Single(info) => Ok(info),
            Self::List(list) if list.len() == 1 => {
                Ok(list.into_iter().next().unwrap_or_default())
            }
            Self::List(list) => Err(ServiceError::Decode(format!(
                "expected a single record, got {} records",
                list.len()
            ))),
        }
    }

    /// Widen to a list. A single record becomes a one-entry list.
    pub fn into_list(self) -> ServiceResult<InformationList> {
        match self {
            Self::List(list) => Ok(list),
            Self::Single(info) => {
                let mut list = InformationList::new();
                list.add(info)?;
                Ok(list)
            }
        }
    }
}

/// Parse `json` and build the matching record container.
///
/// Members whose key or value is empty, or whose value is not a string, are
/// skipped. An empty array, a non-object root, or a non-object array element
/// is a decode failure. Nothing partially built escapes on error.
pub fn decode_response(json: &str) -> ServiceResult<Decoded> {
    let root: Value = serde_json::from_str(json).map_err(|e| {
        error!("Failed to parse the json string ({}).", e);
        ServiceError::Decode(format!("failed to parse the json string ({})", e))
    })?;

    match root {
        Value::Array(elements) => {
            if elements.is_empty() {
                return Err(ServiceError::Decode("the json array is empty".into()));
            }

            let mut list = InformationList::new();
            for (index, element) in elements.iter().enumerate() {
                let object = element.as_object().ok_or_else(|| {
                    ServiceError::Decode(format!("array element {} is not an object", index))
                })?;
                list.add(build_information(object)?)?;
            }
            Ok(Decoded::List(list))
        }
        Value::Object(object) => Ok(Decoded::Single(build_information(&object)?)),
        other => Err(ServiceError::Decode(format!(
            "expected an object or an array of objects, got {}",
            kind_of(&other)
        ))),
    }
}

/// Decode a reply that must describe exactly one record.
pub fn decode_information(json: &str) -> ServiceResult<Information> {
    decode_response(json)?.into_information()
}

/// Decode a reply into a list of records.
pub fn decode_information_list(json: &str) -> ServiceResult<InformationList> {
    decode_response(json)?.into_list()
}

fn build_information(object: &Map<String, Value>) -> ServiceResult<Information> {
    let mut info = Information::new();
    for (key, value) in object {
        // Prevent empty string case.
        match value.as_str() {
            Some(val) if !key.is_empty() && !val.is_empty() => info.set(key.as_str(), val)?,
            _ => {}
        }
    }
    Ok(info)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
