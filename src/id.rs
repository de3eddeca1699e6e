//! Identifier classification, rewriting and minting
//!
//! Blank node identifiers are only meaningful inside the document that
//! declared them, so when several inputs land in one collection their
//! blank nodes are renamed apart. IRIs are global and never rewritten.
//! New identifiers for minted elements come from an [`IdSource`].

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use uuid::Uuid;

use crate::vocab::{
    is_reference_property, AUTHOR_SEGMENT, BLANK_NODE_PREFIX, ID_KEYS, MERGED_DOCUMENT_SEGMENT,
    SPDXID_PREFIX, TOOL_SPDX_ID_PREFIX,
};

/// Classification of an object identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdKind {
    /// Document-local blank node: "_:CreationInfo0"
    BlankNode,
    /// Globally unique IRI: "https://...", "urn:..."
    Iri,
}

/// Classify an identifier string
pub fn classify_id(id: &str) -> IdKind {
    if id.starts_with(BLANK_NODE_PREFIX) {
        IdKind::BlankNode
    } else {
        IdKind::Iri
    }
}

/// Rename a blank node so it does not clash with blank nodes already in use
///
/// # Arguments
/// * `id` - The original identifier
/// * `namespace` - Label prefix used on collision (e.g., "input2")
/// * `used` - Blank nodes already claimed in the target collection
///
/// # Returns
/// The identifier to use and whether it differs from the original
pub fn rewrite_blank_node(id: &str, namespace: &str, used: &mut HashSet<String>) -> (String, bool) {
    if classify_id(id) != IdKind::BlankNode {
        return (id.to_string(), false);
    }

    if used.insert(id.to_string()) {
        return (id.to_string(), false);
    }

    let label = &id[BLANK_NODE_PREFIX.len()..];
    let mut candidate = format!("{}{}-{}", BLANK_NODE_PREFIX, namespace, label);
    let mut n = 1;
    while used.contains(&candidate) {
        n += 1;
        candidate = format!("{}{}-{}-{}", BLANK_NODE_PREFIX, namespace, label, n);
    }
    used.insert(candidate.clone());
    (candidate, true)
}

/// Build a rename map for the blank nodes of one input
///
/// Only identifiers that actually change appear in the map.
pub fn build_id_map<'a>(
    ids: impl Iterator<Item = &'a str>,
    namespace: &str,
    used: &mut HashSet<String>,
) -> HashMap<String, String> {
    let mut map = HashMap::new();

    for id in ids {
        let (rewritten, changed) = rewrite_blank_node(id, namespace, used);
        if changed {
            map.insert(id.to_string(), rewritten);
        }
    }

    map
}

/// Rewrite identifiers and references within a JSON value (recursive)
///
/// Touches identifier keys (`spdxId`/`@id`) and string values held by
/// reference properties, at any depth.
pub fn rewrite_references(value: &mut Value, id_map: &HashMap<String, String>) {
    if id_map.is_empty() {
        return;
    }

    match value {
        Value::Object(obj) => {
            for (key, v) in obj.iter_mut() {
                if ID_KEYS.contains(&key.as_str()) || is_reference_property(key) {
                    rewrite_reference_strings(v, id_map);
                }
                rewrite_references(v, id_map);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                rewrite_references(item, id_map);
            }
        }
        _ => {}
    }
}

fn rewrite_reference_strings(value: &mut Value, id_map: &HashMap<String, String>) {
    match value {
        Value::String(s) => {
            if let Some(new_id) = id_map.get(s.as_str()) {
                *s = new_id.clone();
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                if let Value::String(s) = item {
                    if let Some(new_id) = id_map.get(s.as_str()) {
                        *s = new_id.clone();
                    }
                }
            }
        }
        _ => {}
    }
}

/// Replace every character outside `[A-Za-z0-9-]` with `_`
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Source of fresh 128-bit tokens for minted identifiers
pub trait IdSource {
    fn next_uuid(&mut self) -> Uuid;
}

/// Random v4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next_uuid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Identifier for a merged SpdxDocument
pub fn mint_document_id(ids: &mut dyn IdSource) -> String {
    format!(
        "{}{}/{}",
        SPDXID_PREFIX,
        ids.next_uuid(),
        MERGED_DOCUMENT_SEGMENT
    )
}

/// Identifier for an author Agent, readable from its name
pub fn mint_author_id(ids: &mut dyn IdSource, name: &str) -> String {
    format!(
        "{}{}/{}/{}",
        SPDXID_PREFIX,
        ids.next_uuid(),
        AUTHOR_SEGMENT,
        sanitize_name(name)
    )
}

/// Identifier of the Tool element for a given tool version
pub fn tool_spdx_id(version: &str) -> String {
    format!("{}{}", TOOL_SPDX_ID_PREFIX, version)
}
