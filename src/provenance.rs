//! Provenance of the merged document
//!
//! Fills in the shared CreationInfo and mints the Tool and author
//! elements that point back at it.

use chrono::{DateTime, Utc};

use crate::id::{mint_author_id, tool_spdx_id, IdSource};
use crate::model::{Agent, AuthorDecl, AuthorSpec, CreationInfo, Tool};
use crate::vocab::TOOL_NAME;

/// Elements minted while building provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    pub tool: Tool,
    pub agents: Vec<Agent>,
}

/// The Tool element for a given tool version
///
/// Identical versions always produce an identical Tool.
pub fn build_tool(version: &str, creation_info: &str) -> Tool {
    Tool {
        spdx_id: tool_spdx_id(version),
        name: TOOL_NAME.to_string(),
        description: format!("{} tool version {}", TOOL_NAME, version),
        creation_info: creation_info.to_string(),
    }
}

/// Mint one Agent per named author and record every author in `createdBy`
///
/// Raw identifier authors are recorded as-is, without an Agent.
pub fn mint_authors(
    authors: &AuthorSpec,
    creation_info: &mut CreationInfo,
    ids: &mut dyn IdSource,
) -> Vec<Agent> {
    let mut agents = Vec::new();

    for decl in authors.iter() {
        match decl {
            AuthorDecl::Agent(kind, name) => {
                let agent = Agent {
                    kind,
                    spdx_id: mint_author_id(ids, name),
                    name: name.to_string(),
                    creation_info: creation_info.id.clone(),
                };
                tracing::debug!(id = %agent.spdx_id, kind = kind.type_name(), "minted author");
                creation_info.created_by.push(agent.spdx_id.clone());
                agents.push(agent);
            }
            AuthorDecl::SpdxId(id) => {
                creation_info.created_by.push(id.to_string());
            }
        }
    }

    agents
}

/// Record the creation time
pub fn stamp(creation_info: &mut CreationInfo, now: DateTime<Utc>) {
    creation_info.created = Some(now);
}

/// Populate `creation_info` and mint the tool and author elements
///
/// The creation time is set last, once all elements exist.
pub fn build_provenance(
    creation_info: &mut CreationInfo,
    authors: &AuthorSpec,
    version: &str,
    ids: &mut dyn IdSource,
    now: DateTime<Utc>,
) -> Provenance {
    let tool = build_tool(version, &creation_info.id);
    creation_info.created_using.push(tool.spdx_id.clone());

    let agents = mint_authors(authors, creation_info, ids);

    stamp(creation_info, now);

    Provenance { tool, agents }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::tests::SequentialIds;
    use crate::model::AgentKind;
    use chrono::TimeZone;
    use serde_json::json;

    fn authors() -> AuthorSpec {
        AuthorSpec {
            persons: vec!["Jane Doe".to_string()],
            organizations: vec!["ACME, Inc.".to_string()],
            software_agents: vec!["ci-bot".to_string()],
            spdx_ids: vec!["https://example.com/existing-agent".to_string()],
        }
    }

    #[test]
    fn test_build_tool() {
        let tool = build_tool("1.2.3", "_:ci");
        assert_eq!(tool.spdx_id, "https://spdx.dev/tools/spdx3-merge/1.2.3");
        assert_eq!(tool.description, "spdx3-merge tool version 1.2.3");
        assert_eq!(tool, build_tool("1.2.3", "_:ci"));
    }

    #[test]
    fn test_mint_authors_in_group_order() {
        let mut info = CreationInfo::new("_:ci");
        let mut ids = SequentialIds::default();

        let agents = mint_authors(&authors(), &mut info, &mut ids);

        assert_eq!(agents.len(), 3);
        assert_eq!(agents[0].kind, AgentKind::Person);
        assert_eq!(agents[1].kind, AgentKind::Organization);
        assert_eq!(agents[2].kind, AgentKind::SoftwareAgent);
        assert!(agents[0].spdx_id.ends_with("/Author/Jane_Doe"));
        assert!(agents[1].spdx_id.ends_with("/Author/ACME__Inc_"));

        assert_eq!(info.created_by.len(), 4);
        assert_eq!(info.created_by[0], agents[0].spdx_id);
        assert_eq!(info.created_by[3], "https://example.com/existing-agent");
        assert!(agents.iter().all(|a| a.creation_info == "_:ci"));
    }

    #[test]
    fn test_same_name_gets_distinct_ids() {
        let spec = AuthorSpec {
            persons: vec!["Jane Doe".to_string(), "Jane Doe".to_string()],
            ..Default::default()
        };
        let mut info = CreationInfo::new("_:ci");
        let mut ids = SequentialIds::default();

        let agents = mint_authors(&spec, &mut info, &mut ids);
        assert_ne!(agents[0].spdx_id, agents[1].spdx_id);
    }

    #[test]
    fn test_stamp_replaces_created() {
        let mut info = CreationInfo::new("_:ci");
        assert!(info.to_value().get("created").is_none());

        stamp(&mut info, Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap());
        stamp(&mut info, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        assert_eq!(info.to_value()["created"], json!("2024-01-02T03:04:05Z"));
    }

    #[test]
    fn test_build_provenance() {
        let mut info = CreationInfo::new("_:ci");
        let mut ids = SequentialIds::default();
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();

        let provenance = build_provenance(&mut info, &authors(), "0.1.0", &mut ids, now);

        assert_eq!(info.created, Some(now));
        assert_eq!(info.created_using, vec![provenance.tool.spdx_id.clone()]);
        assert_eq!(provenance.agents.len(), 3);

        let value = info.to_value();
        assert_eq!(value["created"], json!("2024-02-29T23:59:59Z"));
        assert_eq!(value["specVersion"], json!("3.0.0"));
    }
}
