//! Decoder behavior on agent replies.
//!
//! Single objects, arrays, dropped members and malformed input.

use ml_service_core::decode::{decode_information, decode_information_list, decode_response, Decoded};
use ml_service_core::ServiceError;

#[test]
fn test_single_object_keeps_only_non_empty_string_pairs() {
    let json = r#"{
        "version": "3",
        "active": "T",
        "path": "/opt/models/a.tflite",
        "description": "",
        "": "orphan",
        "size": 1024,
        "tags": ["x"],
        "meta": null
    }"#;

    let info = decode_information(json).unwrap();
    let keys: Vec<&str> = info.keys().collect();
    assert_eq!(keys, vec!["version", "active", "path"]);
    assert_eq!(info.get("path"), Some("/opt/models/a.tflite"));
    assert!(!info.contains_key("description"));
    assert!(!info.contains_key("size"));
}

#[test]
fn test_array_length_is_preserved() {
    for n in 1..=5 {
        let records: Vec<String> = (1..=n)
            .map(|v| format!(r#"{{"version":"{}","name":"m"}}"#, v))
            .collect();
        let json = format!("[{}]", records.join(","));

        let list = decode_information_list(&json).unwrap();
        assert_eq!(list.len(), n);
        assert_eq!(list.get(n - 1).unwrap().get("version"), Some(n.to_string().as_str()));
    }
}

#[test]
fn test_array_element_with_no_usable_members_is_kept_empty() {
    let list = decode_information_list(r#"[{"version":"1"},{"description":""}]"#).unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.get(1).unwrap().is_empty());
}

#[test]
fn test_shape_is_reported() {
    assert!(matches!(decode_response(r#"{"a":"b"}"#).unwrap(), Decoded::Single(_)));
    assert!(matches!(decode_response(r#"[{"a":"b"}]"#).unwrap(), Decoded::List(_)));
}

#[test]
fn test_single_and_list_adapters() {
    // A single object widens to a one-entry list.
    let list = decode_information_list(r#"{"name":"labels"}"#).unwrap();
    assert_eq!(list.len(), 1);

    // A one-element array narrows to a record; more than one does not.
    assert_eq!(
        decode_information(r#"[{"name":"labels"}]"#).unwrap().get("name"),
        Some("labels")
    );
    assert!(matches!(
        decode_information(r#"[{"name":"a"},{"name":"b"}]"#),
        Err(ServiceError::Decode(_))
    ));
}

#[test]
fn test_malformed_input_never_decodes_to_empty() {
    let bad = ["", "[]", "not json", "{\"a\":", "42", "\"text\"", "null", "[1, 2]", "[{}, 3]"];
    for json in bad {
        let err = decode_response(json).unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)), "input {:?}", json);
        assert_eq!(err.code(), -22);
    }
}

#[test]
fn test_duplicate_keys_last_value_wins() {
    let info = decode_information(r#"{"k":"first","k":"second"}"#).unwrap();
    assert_eq!(info.len(), 1);
    assert_eq!(info.get("k"), Some("second"));
}
