//! Main merge logic
//!
//! Loads every input into its own collection, carries all non-document
//! objects into one output collection, builds a fresh SpdxDocument with
//! the inputs' imports and conformance claims, attaches provenance and
//! finally links the output to find dangling references.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::collect::{collect_input, external_spdx_id, extract_id, root_elements};
use crate::error::MergeError;
use crate::id::{build_id_map, classify_id, mint_document_id, rewrite_references, IdKind, IdSource};
use crate::loader::{load, InputSource};
use crate::merge::{merge_imports, unify_conformance};
use crate::model::{AuthorSpec, CreationInfo, ImportSpec, SpdxDocument};
use crate::objset::ObjectSet;
use crate::provenance::build_provenance;
use crate::vocab::CREATION_INFO_STEM;

/// Options for a merge run
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Explicit external references; these win over inherited imports
    pub imports: Vec<ImportSpec>,
    /// Document authors (at least one required)
    pub authors: AuthorSpec,
    /// Version recorded on the Tool element
    pub tool_version: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            imports: Vec::new(),
            authors: AuthorSpec::default(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Result of a merge run
#[derive(Debug)]
pub struct MergeResult {
    /// The merged collection
    pub objects: ObjectSet,
    /// Identifier of the merged SpdxDocument
    pub document_id: String,
    /// Identifiers referenced but neither defined nor imported
    pub unresolved: BTreeSet<String>,
    /// Statistics about the merge
    pub stats: MergeStats,
}

/// Statistics from a merge run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeStats {
    /// Number of input sources
    pub inputs: usize,
    /// Number of SpdxDocument elements found in the inputs
    pub input_documents: usize,
    /// Number of input objects carried into the output
    pub elements: usize,
    /// Number of entries in the merged import table
    pub imports: usize,
    /// Number of author declarations
    pub authors: usize,
    /// Number of blank nodes renamed to avoid collisions
    pub renamed_blank_nodes: usize,
}

/// Merge SPDX 3 documents
///
/// Options are validated before any input is read. Inputs are loaded in
/// order; the first one that fails aborts the merge.
pub fn merge(
    sources: &[InputSource],
    options: &MergeOptions,
    ids: &mut dyn IdSource,
) -> Result<MergeResult, MergeError> {
    let explicit_imports = validate_options(options)?;

    let mut inputs = Vec::with_capacity(sources.len());
    for source in sources {
        tracing::debug!(source = %source.name(), "loading input");
        inputs.push(load(source)?);
    }

    Ok(merge_collections(
        inputs,
        explicit_imports,
        options,
        ids,
        Utc::now(),
    ))
}

/// Check options and build the explicit import entries
fn validate_options(options: &MergeOptions) -> Result<Vec<Value>, MergeError> {
    if options.authors.is_empty() {
        return Err(MergeError::Configuration(
            "At least one --author-* argument is required".to_string(),
        ));
    }

    options
        .imports
        .iter()
        .map(|spec| spec.to_external_map()?.to_value())
        .collect()
}

/// Merge already loaded collections
pub fn merge_collections(
    inputs: Vec<ObjectSet>,
    explicit_imports: Vec<Value>,
    options: &MergeOptions,
    ids: &mut dyn IdSource,
    now: DateTime<Utc>,
) -> MergeResult {
    let mut stats = MergeStats {
        inputs: inputs.len(),
        authors: options.authors.len(),
        ..Default::default()
    };

    let mut output = ObjectSet::new();
    let mut documents: Vec<Value> = Vec::new();
    let mut used_blank_nodes: HashSet<String> = HashSet::new();

    for (n, input) in inputs.into_iter().enumerate() {
        let namespace = format!("input{}", n + 1);

        // Rename this input's blank nodes apart from earlier inputs
        let mut blank_ids: Vec<String> = input
            .ids()
            .filter(|id| classify_id(id) == IdKind::BlankNode)
            .map(String::from)
            .collect();
        blank_ids.sort();
        let id_map = build_id_map(
            blank_ids.iter().map(String::as_str),
            &namespace,
            &mut used_blank_nodes,
        );
        stats.renamed_blank_nodes += id_map.len();

        let mut objects = input.into_objects();
        for object in objects.iter_mut() {
            rewrite_references(object, &id_map);
        }

        let collection = collect_input(objects);
        stats.input_documents += collection.documents.len();
        documents.extend(collection.documents);

        for element in collection.elements {
            if output.add(element) {
                stats.elements += 1;
            }
        }
    }

    let mut creation_info = CreationInfo::new(output.unused_blank_id(CREATION_INFO_STEM));

    let document_id = loop {
        let candidate = mint_document_id(ids);
        let taken = output.contains(&candidate)
            || documents
                .iter()
                .any(|d| extract_id(d) == Some(candidate.as_str()));
        if !taken {
            break candidate;
        }
    };

    let mut document = SpdxDocument::new(&document_id, &creation_info.id);
    if let Some(first) = documents.first() {
        document.root_element = root_elements(first);
    }

    document.imports = explicit_imports;
    let import_stats = merge_imports(&mut document.imports, &documents, &output);
    document.profile_conformance = unify_conformance(&documents);
    stats.imports = document.imports.len();
    tracing::debug!(?import_stats, "merged import tables");

    let provenance = build_provenance(
        &mut creation_info,
        &options.authors,
        &options.tool_version,
        ids,
        now,
    );

    output.add(creation_info.to_value());
    output.add(document.to_value());
    output.add(provenance.tool.to_value());
    for agent in &provenance.agents {
        output.add(agent.to_value());
    }

    let imported: HashSet<&str> = document.imports.iter().filter_map(external_spdx_id).collect();
    let unresolved: BTreeSet<String> = output
        .link()
        .into_iter()
        .filter(|id| !imported.contains(id.as_str()))
        .collect();

    MergeResult {
        objects: output,
        document_id,
        unresolved,
        stats,
    }
}
