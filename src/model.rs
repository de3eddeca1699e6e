//! Typed builders for the objects a merge run creates
//!
//! Loaded objects stay as JSON values; only the objects minted by the
//! merge (document, creation info, tool, authors, explicit imports) are
//! built here and converted with `to_value()`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::error::MergeError;
use crate::vocab::{CREATION_INFO_TYPE, SPDX_DOCUMENT_TYPE, SPEC_VERSION, TOOL_TYPE};

/// Hash algorithms defined by the SPDX 3.0 Core profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Adler32,
    Blake2b256,
    Blake2b384,
    Blake2b512,
    Blake3,
    CrystalsDilithium,
    CrystalsKyber,
    Falcon,
    Md2,
    Md4,
    Md5,
    Md6,
    Other,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 22] = [
        HashAlgorithm::Adler32,
        HashAlgorithm::Blake2b256,
        HashAlgorithm::Blake2b384,
        HashAlgorithm::Blake2b512,
        HashAlgorithm::Blake3,
        HashAlgorithm::CrystalsDilithium,
        HashAlgorithm::CrystalsKyber,
        HashAlgorithm::Falcon,
        HashAlgorithm::Md2,
        HashAlgorithm::Md4,
        HashAlgorithm::Md5,
        HashAlgorithm::Md6,
        HashAlgorithm::Other,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha3_224,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_384,
        HashAlgorithm::Sha3_512,
        HashAlgorithm::Sha512,
    ];

    /// Compact name as written in SPDX JSON-LD
    ///
    /// Serialization and parsing both go through this name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Adler32 => "adler32",
            HashAlgorithm::Blake2b256 => "blake2b256",
            HashAlgorithm::Blake2b384 => "blake2b384",
            HashAlgorithm::Blake2b512 => "blake2b512",
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::CrystalsDilithium => "crystalsDilithium",
            HashAlgorithm::CrystalsKyber => "crystalsKyber",
            HashAlgorithm::Falcon => "falcon",
            HashAlgorithm::Md2 => "md2",
            HashAlgorithm::Md4 => "md4",
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Md6 => "md6",
            HashAlgorithm::Other => "other",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha3_224 => "sha3_224",
            HashAlgorithm::Sha3_256 => "sha3_256",
            HashAlgorithm::Sha3_384 => "sha3_384",
            HashAlgorithm::Sha3_512 => "sha3_512",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl Serialize for HashAlgorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashAlgorithm::ALL
            .iter()
            .copied()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = HashAlgorithm::ALL.iter().map(|a| a.as_str()).collect();
                MergeError::Configuration(format!(
                    "Unknown hash algorithm '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// Integrity hash attached to an external map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "Hash")]
pub struct Hash {
    pub algorithm: HashAlgorithm,
    #[serde(rename = "hashValue")]
    pub hash_value: String,
}

/// Declaration that an identifier is defined in another document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "ExternalMap", rename_all = "camelCase")]
pub struct ExternalMap {
    pub external_spdx_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_hint: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub verified_using: Vec<Hash>,
}

impl ExternalMap {
    pub fn new(external_spdx_id: impl Into<String>) -> Self {
        Self {
            external_spdx_id: external_spdx_id.into(),
            location_hint: None,
            verified_using: Vec::new(),
        }
    }

    pub fn to_value(&self) -> Result<Value, MergeError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// One explicit `--import SPDXID URL ALGORITHM HASH` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub spdx_id: String,
    pub url: String,
    pub algorithm: String,
    pub hash: String,
}

impl ImportSpec {
    /// Build from the four command line values
    pub fn from_cli(values: &[String]) -> Result<Self, MergeError> {
        match values {
            [spdx_id, url, algorithm, hash] => Ok(Self {
                spdx_id: spdx_id.clone(),
                url: url.clone(),
                algorithm: algorithm.clone(),
                hash: hash.clone(),
            }),
            _ => Err(MergeError::Configuration(format!(
                "--import takes exactly 4 values (SPDXID URL ALGORITHM HASH), got {}",
                values.len()
            ))),
        }
    }

    /// Convert into an external map
    ///
    /// An empty URL omits the location hint; any other value, relative
    /// references included, is kept as given. The hash is attached only
    /// when both algorithm and value are given.
    pub fn to_external_map(&self) -> Result<ExternalMap, MergeError> {
        if self.spdx_id.is_empty() {
            return Err(MergeError::Configuration(
                "--import SPDXID must not be empty".to_string(),
            ));
        }

        let mut map = ExternalMap::new(&self.spdx_id);

        if !self.url.is_empty() {
            map.location_hint = Some(self.url.clone());
        }

        if !self.algorithm.is_empty() && !self.hash.is_empty() {
            map.verified_using.push(Hash {
                algorithm: self.algorithm.parse()?,
                hash_value: self.hash.clone(),
            });
        }

        Ok(map)
    }
}

/// Kind of Agent minted for an author
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Person,
    Organization,
    SoftwareAgent,
}

impl AgentKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            AgentKind::Person => "Person",
            AgentKind::Organization => "Organization",
            AgentKind::SoftwareAgent => "SoftwareAgent",
        }
    }
}

/// A single author declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorDecl<'a> {
    /// Mint an Agent of this kind with this name
    Agent(AgentKind, &'a str),
    /// Reference an existing identifier
    SpdxId(&'a str),
}

/// Author declarations grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorSpec {
    pub persons: Vec<String>,
    pub organizations: Vec<String>,
    pub software_agents: Vec<String>,
    pub spdx_ids: Vec<String>,
}

impl AuthorSpec {
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
            && self.organizations.is_empty()
            && self.software_agents.is_empty()
            && self.spdx_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.persons.len() + self.organizations.len() + self.software_agents.len() + self.spdx_ids.len()
    }

    /// Declarations in group order: persons, organizations, software
    /// agents, then raw identifiers
    pub fn iter(&self) -> impl Iterator<Item = AuthorDecl<'_>> {
        agent_decls(AgentKind::Person, &self.persons)
            .chain(agent_decls(AgentKind::Organization, &self.organizations))
            .chain(agent_decls(AgentKind::SoftwareAgent, &self.software_agents))
            .chain(self.spdx_ids.iter().map(|id| AuthorDecl::SpdxId(id.as_str())))
    }
}

fn agent_decls(kind: AgentKind, names: &[String]) -> impl Iterator<Item = AuthorDecl<'_>> {
    names
        .iter()
        .map(move |name| AuthorDecl::Agent(kind, name.as_str()))
}

/// Format a timestamp the way SPDX expects: `YYYY-MM-DDTHH:MM:SSZ`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Provenance record shared by every element the merge run creates
#[derive(Debug, Clone, PartialEq)]
pub struct CreationInfo {
    /// Blank node identifier
    pub id: String,
    pub created: Option<DateTime<Utc>>,
    /// Agent identifiers
    pub created_by: Vec<String>,
    /// Tool identifiers
    pub created_using: Vec<String>,
    pub spec_version: String,
}

impl CreationInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created: None,
            created_by: Vec::new(),
            created_using: Vec::new(),
            spec_version: SPEC_VERSION.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".to_string(), json!(CREATION_INFO_TYPE));
        obj.insert("@id".to_string(), json!(self.id));
        if let Some(created) = &self.created {
            obj.insert("created".to_string(), json!(format_timestamp(created)));
        }
        if !self.created_by.is_empty() {
            obj.insert("createdBy".to_string(), json!(self.created_by));
        }
        if !self.created_using.is_empty() {
            obj.insert("createdUsing".to_string(), json!(self.created_using));
        }
        obj.insert("specVersion".to_string(), json!(self.spec_version));
        Value::Object(obj)
    }
}

/// The merged SpdxDocument
#[derive(Debug, Clone, PartialEq)]
pub struct SpdxDocument {
    pub spdx_id: String,
    pub creation_info: String,
    pub root_element: Vec<String>,
    /// External map entries, kept as JSON so inherited entries pass through
    /// unchanged
    pub imports: Vec<Value>,
    pub profile_conformance: Vec<String>,
}

impl SpdxDocument {
    pub fn new(spdx_id: impl Into<String>, creation_info: impl Into<String>) -> Self {
        Self {
            spdx_id: spdx_id.into(),
            creation_info: creation_info.into(),
            root_element: Vec::new(),
            imports: Vec::new(),
            profile_conformance: Vec::new(),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".to_string(), json!(SPDX_DOCUMENT_TYPE));
        obj.insert("spdxId".to_string(), json!(self.spdx_id));
        obj.insert("creationInfo".to_string(), json!(self.creation_info));
        if !self.root_element.is_empty() {
            obj.insert("rootElement".to_string(), json!(self.root_element));
        }
        if !self.imports.is_empty() {
            obj.insert("imports".to_string(), Value::Array(self.imports.clone()));
        }
        if !self.profile_conformance.is_empty() {
            obj.insert(
                "profileConformance".to_string(),
                json!(self.profile_conformance),
            );
        }
        Value::Object(obj)
    }
}

/// An author minted by the merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub kind: AgentKind,
    pub spdx_id: String,
    pub name: String,
    pub creation_info: String,
}

impl Agent {
    pub fn to_value(&self) -> Value {
        json!({
            "type": self.kind.type_name(),
            "spdxId": self.spdx_id,
            "creationInfo": self.creation_info,
            "name": self.name
        })
    }
}

/// The Tool element describing this program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub spdx_id: String,
    pub name: String,
    pub description: String,
    pub creation_info: String,
}

impl Tool {
    pub fn to_value(&self) -> Value {
        json!({
            "type": TOOL_TYPE,
            "spdxId": self.spdx_id,
            "creationInfo": self.creation_info,
            "name": self.name,
            "description": self.description
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_hash_algorithm_from_str() {
        assert_eq!("sha256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("sha3_512".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha3_512);
        assert!(matches!(
            "SHA256".parse::<HashAlgorithm>(),
            Err(MergeError::Configuration(_))
        ));
    }

    #[test]
    fn test_hash_algorithm_names_agree() {
        for alg in HashAlgorithm::ALL {
            assert_eq!(serde_json::to_value(alg).unwrap(), json!(alg.as_str()));
            assert_eq!(alg.as_str().parse::<HashAlgorithm>().unwrap(), alg);
            assert_eq!(alg.to_string(), alg.as_str());
        }
        assert_eq!(
            serde_json::to_value(HashAlgorithm::CrystalsDilithium).unwrap(),
            json!("crystalsDilithium")
        );
    }

    #[test]
    fn test_external_map_to_value() {
        let mut map = ExternalMap::new("https://other.com/pkg");
        map.location_hint = Some("https://other.com/sbom.json".to_string());
        map.verified_using.push(Hash {
            algorithm: HashAlgorithm::Sha256,
            hash_value: "abcd".to_string(),
        });

        assert_eq!(
            map.to_value().unwrap(),
            json!({
                "type": "ExternalMap",
                "externalSpdxId": "https://other.com/pkg",
                "locationHint": "https://other.com/sbom.json",
                "verifiedUsing": [{"type": "Hash", "algorithm": "sha256", "hashValue": "abcd"}]
            })
        );
    }

    #[test]
    fn test_import_spec_omits_empty_fields() {
        let spec = ImportSpec::from_cli(&[
            "https://other.com/pkg".to_string(),
            String::new(),
            "sha256".to_string(),
            String::new(),
        ])
        .unwrap();

        let map = spec.to_external_map().unwrap();
        assert_eq!(map.location_hint, None);
        assert!(map.verified_using.is_empty());
        assert_eq!(
            map.to_value().unwrap(),
            json!({"type": "ExternalMap", "externalSpdxId": "https://other.com/pkg"})
        );
    }

    #[test]
    fn test_import_spec_rejects_bad_input() {
        assert!(ImportSpec::from_cli(&["a".to_string()]).is_err());

        let bad_alg = ImportSpec {
            spdx_id: "https://other.com/pkg".to_string(),
            url: String::new(),
            algorithm: "crc32".to_string(),
            hash: "00".to_string(),
        };
        assert!(matches!(
            bad_alg.to_external_map(),
            Err(MergeError::Configuration(_))
        ));

        let no_id = ImportSpec {
            spdx_id: String::new(),
            url: String::new(),
            algorithm: String::new(),
            hash: String::new(),
        };
        assert!(matches!(
            no_id.to_external_map(),
            Err(MergeError::Configuration(_))
        ));
    }

    #[test]
    fn test_import_spec_keeps_relative_location_hint() {
        let spec = ImportSpec {
            spdx_id: "https://other.com/pkg".to_string(),
            url: "other.spdx.json".to_string(),
            algorithm: String::new(),
            hash: String::new(),
        };

        let map = spec.to_external_map().unwrap();
        assert_eq!(map.location_hint.as_deref(), Some("other.spdx.json"));
    }

    #[test]
    fn test_author_spec_group_order() {
        let authors = AuthorSpec {
            persons: vec!["Jane".to_string()],
            organizations: vec!["ACME".to_string()],
            software_agents: vec!["bot".to_string()],
            spdx_ids: vec!["https://example.com/agent".to_string()],
        };

        let decls: Vec<AuthorDecl<'_>> = authors.iter().collect();
        assert_eq!(
            decls,
            vec![
                AuthorDecl::Agent(AgentKind::Person, "Jane"),
                AuthorDecl::Agent(AgentKind::Organization, "ACME"),
                AuthorDecl::Agent(AgentKind::SoftwareAgent, "bot"),
                AuthorDecl::SpdxId("https://example.com/agent"),
            ]
        );
        assert_eq!(authors.len(), 4);
        assert!(!authors.is_empty());
        assert!(AuthorSpec::default().is_empty());
    }

    #[test]
    fn test_creation_info_to_value() {
        let mut info = CreationInfo::new("_:CreationInfo0");
        info.created = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
        info.created_by.push("https://spdx.dev/x/Author/Jane".to_string());

        let value = info.to_value();
        assert_eq!(value["created"], json!("2024-05-01T12:30:00Z"));
        assert_eq!(value["specVersion"], json!("3.0.0"));
        assert_eq!(value["createdBy"], json!(["https://spdx.dev/x/Author/Jane"]));
        assert!(value.get("createdUsing").is_none());
    }

    #[test]
    fn test_document_omits_empty_lists() {
        let doc = SpdxDocument::new("https://spdx.dev/d", "_:ci");
        let value = doc.to_value();
        assert!(value.get("rootElement").is_none());
        assert!(value.get("imports").is_none());
        assert!(value.get("profileConformance").is_none());
        assert_eq!(value["creationInfo"], json!("_:ci"));
    }
}
