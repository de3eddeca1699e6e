//! SPDX 3 Document Merging Library
//!
//! This library merges several SPDX 3 JSON-LD documents into a single
//! document with one SpdxDocument element.
//!
//! # Overview
//!
//! Every input is loaded into its own collection, then:
//!
//! 1. Its SpdxDocument elements are set aside; all other objects are
//!    carried into the output unchanged (blank nodes renamed apart)
//! 2. A new SpdxDocument is minted; its root elements come from the first
//!    input document
//! 3. Import tables are merged (explicit imports first, then inherited
//!    ones in input order, skipping duplicates and identifiers the output
//!    defines itself)
//! 4. Profile conformance claims are unioned and sorted
//! 5. A shared CreationInfo, the Tool and the author Agents are minted
//! 6. The output is linked and every identifier that is neither defined
//!    nor imported is reported
//!
//! # Usage
//!
//! ```ignore
//! use spdx3_merge::{merge, serialize, AuthorSpec, InputSource, MergeOptions, RandomIdSource};
//!
//! let options = MergeOptions {
//!     authors: AuthorSpec {
//!         persons: vec!["Jane Doe".to_string()],
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! let result = merge(
//!     &[InputSource::parse("a.spdx.json"), InputSource::parse("b.spdx.json")],
//!     &options,
//!     &mut RandomIdSource,
//! )?;
//!
//! for id in &result.unresolved {
//!     println!("unresolved: {}", id);
//! }
//! println!("{}", serialize(&result.objects, true)?);
//! ```

pub mod collect;
pub mod consolidate;
pub mod error;
pub mod id;
pub mod jsonld;
pub mod loader;
pub mod merge;
pub mod model;
pub mod objset;
pub mod provenance;
pub mod vocab;

// Re-export main types for convenience
pub use crate::consolidate::{merge, merge_collections, MergeOptions, MergeResult, MergeStats};
pub use crate::error::MergeError;
pub use crate::id::{IdSource, RandomIdSource};
pub use crate::jsonld::{deserialize, serialize, write_to_path};
pub use crate::loader::InputSource;
pub use crate::model::{AuthorSpec, HashAlgorithm, ImportSpec};
pub use crate::objset::ObjectSet;
pub use crate::vocab::{SPDX_CONTEXT_URL, SPEC_VERSION};
