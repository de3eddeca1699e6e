//! Object inspection and per-input partitioning
//!
//! Each input is split into its SpdxDocument elements, which are held
//! back for root selection and import/conformance merging, and every
//! other object, which is carried into the output unchanged.

use serde_json::Value;
use std::collections::BTreeSet;

use crate::vocab::{is_element_type, is_reference_property, ID_KEYS, SPDX_DOCUMENT_TYPE, TYPE_KEYS};

/// Result of partitioning a single input
#[derive(Debug, Default)]
pub struct InputCollection {
    /// SpdxDocument elements, in input order
    pub documents: Vec<Value>,
    /// All other objects, in input order
    pub elements: Vec<Value>,
}

/// Partition one input's objects into documents and everything else
pub fn collect_input(objects: impl IntoIterator<Item = Value>) -> InputCollection {
    let mut collection = InputCollection::default();

    for object in objects {
        if has_type(&object, SPDX_DOCUMENT_TYPE) {
            collection.documents.push(object);
        } else {
            collection.elements.push(object);
        }
    }

    collection
}

/// Extract the identifier (`spdxId` or `@id`) of an object
pub fn extract_id(entity: &Value) -> Option<&str> {
    ID_KEYS
        .iter()
        .find_map(|key| entity.get(*key))
        .and_then(|v| v.as_str())
}

/// Extract the type (`type` or `@type`) as a list of type names
pub fn extract_types(entity: &Value) -> Vec<String> {
    match TYPE_KEYS.iter().find_map(|key| entity.get(*key)) {
        Some(Value::String(t)) => vec![t.clone()],
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => vec![],
    }
}

/// Check if an object has a specific type
pub fn has_type(entity: &Value, type_name: &str) -> bool {
    extract_types(entity).iter().any(|t| t == type_name)
}

/// Check if an object is an SPDX Element
///
/// Elements are identified by `spdxId`; objects using bare `@id` only
/// count when their type is a known Element type.
pub fn is_element(entity: &Value) -> bool {
    entity.get("spdxId").is_some() || extract_types(entity).iter().any(|t| is_element_type(t))
}

/// Get a property that may hold one string or a list of strings
pub fn string_list(entity: &Value, key: &str) -> Vec<String> {
    match entity.get(key) {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => vec![],
    }
}

/// Root element identifiers of a document
pub fn root_elements(document: &Value) -> Vec<String> {
    string_list(document, "rootElement")
}

/// Profile conformance claims of a document
pub fn profile_conformance(document: &Value) -> Vec<String> {
    string_list(document, "profileConformance")
}

/// External map entries declared by a document
pub fn imports_of(document: &Value) -> Vec<Value> {
    match document.get("imports") {
        Some(Value::Array(arr)) => arr.clone(),
        Some(v @ Value::Object(_)) => vec![v.clone()],
        _ => vec![],
    }
}

/// The `externalSpdxId` of an external map entry
pub fn external_spdx_id(import: &Value) -> Option<&str> {
    import.get("externalSpdxId").and_then(|v| v.as_str())
}

/// Get all identifiers referenced within an object's properties
pub fn referenced_ids(entity: &Value) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    collect_referenced_ids(entity, &mut ids);
    ids
}

fn collect_referenced_ids(value: &Value, ids: &mut BTreeSet<String>) {
    match value {
        Value::Object(obj) => {
            for (key, v) in obj {
                if is_reference_property(key) {
                    collect_reference_strings(v, ids);
                }
                collect_referenced_ids(v, ids);
            }
        }
        Value::Array(arr) => {
            for item in arr {
                collect_referenced_ids(item, ids);
            }
        }
        _ => {}
    }
}

fn collect_reference_strings(value: &Value, ids: &mut BTreeSet<String>) {
    match value {
        Value::String(id) => {
            ids.insert(id.clone());
        }
        Value::Array(arr) => {
            for item in arr {
                if let Value::String(id) = item {
                    ids.insert(id.clone());
                }
            }
        }
        _ => {}
    }
}
