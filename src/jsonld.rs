//! SPDX 3 JSON-LD reading and writing
//!
//! Documents are compact JSON-LD: an `@context` plus either a `@graph`
//! array or a single top-level object. Objects nested under reference
//! properties that carry their own identifier are hoisted into the
//! collection so that every reference is an identifier string.

use std::io::Write;
use std::path::Path;

use serde_json::{json, Value};
use std::collections::BTreeSet;

use crate::collect::{extract_id, extract_types, is_element, referenced_ids};
use crate::error::MergeError;
use crate::id::{classify_id, IdKind};
use crate::objset::ObjectSet;
use crate::vocab::{is_reference_property, SPDX_CONTEXT_URL};

/// Parse one JSON-LD document into a fresh collection
pub fn deserialize(content: &str, source_name: &str) -> Result<ObjectSet, MergeError> {
    let doc: Value = serde_json::from_str(content)
        .map_err(|e| MergeError::format(source_name, format!("not valid JSON: {}", e)))?;

    let mut obj = match doc {
        Value::Object(obj) => obj,
        _ => {
            return Err(MergeError::format(
                source_name,
                "top level must be a JSON object",
            ))
        }
    };

    match obj.remove("@context") {
        Some(Value::String(ctx)) if ctx != SPDX_CONTEXT_URL => {
            tracing::debug!(source = source_name, context = %ctx, "non-default @context");
        }
        Some(_) => {}
        None => return Err(MergeError::format(source_name, "missing @context")),
    }

    let entries = match obj.remove("@graph") {
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(MergeError::format(source_name, "@graph must be an array")),
        None => vec![Value::Object(obj)],
    };

    let mut set = ObjectSet::new();
    for (i, mut entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            return Err(MergeError::format(
                source_name,
                format!("@graph entry {} is not an object", i),
            ));
        }
        if extract_types(&entry).is_empty() {
            return Err(MergeError::format(
                source_name,
                format!("@graph entry {} has no type", i),
            ));
        }

        let mut hoisted = Vec::new();
        hoist_references(&mut entry, &mut hoisted);

        set.add(entry);
        for nested in hoisted {
            set.add(nested);
        }
    }

    tracing::debug!(source = source_name, objects = set.len(), "parsed document");
    Ok(set)
}

/// Replace identified objects under reference properties with their identifier
fn hoist_references(value: &mut Value, hoisted: &mut Vec<Value>) {
    match value {
        Value::Object(obj) => {
            for (key, v) in obj.iter_mut() {
                if is_reference_property(key) {
                    if let Some(items) = v.as_array_mut() {
                        for item in items.iter_mut() {
                            hoist_one(item, hoisted);
                        }
                    } else {
                        hoist_one(v, hoisted);
                    }
                }
                hoist_references(v, hoisted);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                hoist_references(item, hoisted);
            }
        }
        _ => {}
    }
}

fn hoist_one(slot: &mut Value, hoisted: &mut Vec<Value>) {
    if !slot.is_object() {
        return;
    }
    let id = match extract_id(slot) {
        Some(id) => id.to_string(),
        None => return,
    };

    let mut nested = std::mem::replace(slot, Value::String(id));
    hoist_references(&mut nested, hoisted);
    hoisted.push(nested);
}

/// Build the JSON-LD document for a collection
///
/// Blank-node objects that nothing references are left out.
pub fn to_jsonld(set: &ObjectSet) -> Value {
    let referenced: BTreeSet<String> = set.iter().flat_map(referenced_ids).collect();

    let graph: Vec<Value> = set
        .iter()
        .filter(|o| match extract_id(o) {
            Some(id) if classify_id(id) == IdKind::BlankNode && !is_element(o) => {
                referenced.contains(id)
            }
            _ => true,
        })
        .cloned()
        .collect();

    json!({
        "@context": SPDX_CONTEXT_URL,
        "@graph": graph
    })
}

/// Serialize a collection to a JSON-LD string
pub fn serialize(set: &ObjectSet, pretty: bool) -> Result<String, MergeError> {
    let doc = to_jsonld(set);
    if pretty {
        Ok(serde_json::to_string_pretty(&doc)?)
    } else {
        Ok(serde_json::to_string(&doc)?)
    }
}

/// Serialize a collection and replace `path` with the result
///
/// The content goes to a temporary file next to `path` that is renamed
/// over it, so a failed write never leaves a truncated output behind.
/// An existing file keeps its permissions; a new one is created `0644`
/// (less the umask) on unix.
pub fn write_to_path(set: &ObjectSet, path: &Path, pretty: bool) -> Result<(), MergeError> {
    let content = serialize(set, pretty)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    #[allow(unused_mut)]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let permissions = match std::fs::metadata(path) {
            Ok(meta) => meta.permissions(),
            Err(_) => std::fs::Permissions::from_mode(0o644),
        };
        builder.permissions(permissions);
    }

    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote output");
    Ok(())
}
