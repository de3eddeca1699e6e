//! Merging of document-level tables
//!
//! Input SpdxDocuments are not carried into the output; their import
//! tables and profile conformance claims are folded into the merged
//! document instead.

use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

use crate::collect::{external_spdx_id, imports_of, profile_conformance};
use crate::objset::ObjectSet;

/// Outcome of merging import tables
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportMergeStats {
    /// Entries appended to the merged table
    pub appended: usize,
    /// Entries dropped because the identifier is defined in the output
    pub resolved_internally: usize,
    /// Entries dropped because the identifier is already imported
    pub duplicates: usize,
}

/// Append the imports of each document to `merged`
///
/// Documents are visited in order, and each document's imports in list
/// order. An entry is skipped when its `externalSpdxId` names an object
/// in `output` or is already present in `merged`; otherwise it is
/// appended unchanged. Entries already in `merged` (explicit imports)
/// therefore take precedence over inherited ones.
pub fn merge_imports(
    merged: &mut Vec<Value>,
    documents: &[Value],
    output: &ObjectSet,
) -> ImportMergeStats {
    let mut stats = ImportMergeStats::default();
    let mut seen: HashSet<String> = merged
        .iter()
        .filter_map(|m| external_spdx_id(m).map(String::from))
        .collect();

    for document in documents {
        for import in imports_of(document) {
            let id = match external_spdx_id(&import) {
                Some(id) => id.to_string(),
                None => {
                    tracing::warn!("skipping import without externalSpdxId");
                    continue;
                }
            };

            if output.contains(&id) {
                tracing::debug!(id = %id, "import defined in merged output, dropping");
                stats.resolved_internally += 1;
                continue;
            }

            if !seen.insert(id) {
                stats.duplicates += 1;
                continue;
            }

            merged.push(import);
            stats.appended += 1;
        }
    }

    stats
}

/// Union of all profile conformance claims, sorted
pub fn unify_conformance(documents: &[Value]) -> Vec<String> {
    documents
        .iter()
        .flat_map(profile_conformance)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn import(id: &str, hint: &str) -> Value {
        json!({"type": "ExternalMap", "externalSpdxId": id, "locationHint": hint})
    }

    fn document(imports: Vec<Value>, profiles: &[&str]) -> Value {
        json!({
            "type": "SpdxDocument",
            "spdxId": "https://example.com/doc",
            "imports": imports,
            "profileConformance": profiles
        })
    }

    #[test]
    fn test_first_import_wins() {
        let docs = vec![
            document(vec![import("https://x.com/X", "https://a.com/a.json")], &[]),
            document(vec![import("https://x.com/X", "https://b.com/b.json")], &[]),
        ];

        let mut merged = Vec::new();
        let stats = merge_imports(&mut merged, &docs, &ObjectSet::new());

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["locationHint"], json!("https://a.com/a.json"));
        assert_eq!(stats.appended, 1);
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn test_explicit_import_takes_precedence() {
        let docs = vec![document(
            vec![import("https://x.com/X", "https://a.com/a.json")],
            &[],
        )];

        let mut merged = vec![import("https://x.com/X", "https://explicit.com/x.json")];
        merge_imports(&mut merged, &docs, &ObjectSet::new());

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["locationHint"], json!("https://explicit.com/x.json"));
    }

    #[test]
    fn test_internally_defined_import_dropped() {
        let docs = vec![document(
            vec![
                import("https://x.com/Y", "https://a.com/a.json"),
                import("https://x.com/Z", "https://a.com/a.json"),
            ],
            &[],
        )];

        let mut output = ObjectSet::new();
        output.add(json!({"type": "software_Package", "spdxId": "https://x.com/Y"}));

        let mut merged = Vec::new();
        let stats = merge_imports(&mut merged, &docs, &output);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["externalSpdxId"], json!("https://x.com/Z"));
        assert_eq!(stats.resolved_internally, 1);
    }

    #[test]
    fn test_import_passed_through_unchanged() {
        let entry = json!({
            "type": "ExternalMap",
            "externalSpdxId": "https://x.com/X",
            "verifiedUsing": [{"type": "Hash", "algorithm": "sha256", "hashValue": "ff"}],
            "definingArtifact": "https://x.com/sbom"
        });
        let docs = vec![document(vec![entry.clone()], &[])];

        let mut merged = Vec::new();
        merge_imports(&mut merged, &docs, &ObjectSet::new());
        assert_eq!(merged, vec![entry]);
    }

    #[test]
    fn test_import_without_id_skipped() {
        let docs = vec![document(vec![json!({"type": "ExternalMap"})], &[])];

        let mut merged = Vec::new();
        let stats = merge_imports(&mut merged, &docs, &ObjectSet::new());
        assert!(merged.is_empty());
        assert_eq!(stats, ImportMergeStats::default());
    }

    #[test]
    fn test_unify_conformance() {
        let docs = vec![
            document(vec![], &["core"]),
            document(vec![], &["core", "build"]),
        ];
        assert_eq!(unify_conformance(&docs), vec!["build", "core"]);
    }

    #[test]
    fn test_unify_conformance_order_independent() {
        let a = document(vec![], &["software", "core"]);
        let b = document(vec![], &["security", "core"]);

        assert_eq!(
            unify_conformance(&[a.clone(), b.clone()]),
            unify_conformance(&[b, a])
        );
    }

    #[test]
    fn test_unify_conformance_empty() {
        assert!(unify_conformance(&[]).is_empty());
    }
}
