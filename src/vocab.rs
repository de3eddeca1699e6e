//! Vocabulary definitions for SPDX 3 merging
//!
//! Identifier namespaces used when minting new elements, plus the small
//! slice of the SPDX 3.0 model the merge needs to know about: which
//! properties hold object references and which types are Elements.

/// SPDX specification version written into every minted CreationInfo
pub const SPEC_VERSION: &str = "3.0.0";

/// JSON-LD context for SPDX 3.0 documents
pub const SPDX_CONTEXT_URL: &str = "https://spdx.org/rdf/3.0.0/spdx-context.jsonld";

/// Namespace for identifiers minted by a merge run
pub const SPDXID_PREFIX: &str = "https://spdx.dev/";

/// Namespace for the Tool element; the tool version is appended
pub const TOOL_SPDX_ID_PREFIX: &str = "https://spdx.dev/tools/spdx3-merge/";

/// Name of the Tool element
pub const TOOL_NAME: &str = "spdx3-merge";

/// Last path segment of the merged document identifier
pub const MERGED_DOCUMENT_SEGMENT: &str = "MergedSpdxDocument";

/// Path segment marking minted author identifiers
pub const AUTHOR_SEGMENT: &str = "Author";

/// Label stem for the blank node holding the merge CreationInfo
pub const CREATION_INFO_STEM: &str = "CreationInfo";

/// Prefix of blank node identifiers
pub const BLANK_NODE_PREFIX: &str = "_:";

pub const SPDX_DOCUMENT_TYPE: &str = "SpdxDocument";
pub const CREATION_INFO_TYPE: &str = "CreationInfo";
pub const TOOL_TYPE: &str = "Tool";

/// Identifier keys, in lookup order. `spdxId` is the compact alias of `@id`.
pub const ID_KEYS: [&str; 2] = ["spdxId", "@id"];

/// Type keys, in lookup order. `type` is the compact alias of `@type`.
pub const TYPE_KEYS: [&str; 2] = ["type", "@type"];

/// Properties whose values are references to other objects (by identifier)
pub const REFERENCE_PROPERTIES: &[&str] = &[
    "creationInfo",
    "createdBy",
    "createdUsing",
    "rootElement",
    "element",
    "from",
    "to",
    "suppliedBy",
    "originatedBy",
    "subject",
    "definingArtifact",
    "dataLicense",
    "software_snippetFromFile",
    "security_assessedElement",
    "expandedlicensing_member",
    "expandedlicensing_subjectLicense",
    "expandedlicensing_subjectAddition",
    "expandedlicensing_subjectExtendableLicense",
];

/// Concrete and abstract Element types of the SPDX 3.0 model
pub const ELEMENT_TYPES: &[&str] = &[
    "Element",
    "Agent",
    "Annotation",
    "Artifact",
    "Bom",
    "Bundle",
    "ElementCollection",
    "LifecycleScopedRelationship",
    "Organization",
    "Person",
    "Relationship",
    "SoftwareAgent",
    "SpdxDocument",
    "Tool",
    "ai_AIPackage",
    "build_Build",
    "dataset_DatasetPackage",
    "software_File",
    "software_Package",
    "software_Sbom",
    "software_Snippet",
    "security_Vulnerability",
    "security_VulnAssessmentRelationship",
    "security_CvssV2VulnAssessmentRelationship",
    "security_CvssV3VulnAssessmentRelationship",
    "security_CvssV4VulnAssessmentRelationship",
    "security_EpssVulnAssessmentRelationship",
    "security_ExploitCatalogVulnAssessmentRelationship",
    "security_SsvcVulnAssessmentRelationship",
    "security_VexAffectedVulnAssessmentRelationship",
    "security_VexFixedVulnAssessmentRelationship",
    "security_VexNotAffectedVulnAssessmentRelationship",
    "security_VexUnderInvestigationVulnAssessmentRelationship",
    "simplelicensing_AnyLicenseInfo",
    "simplelicensing_LicenseExpression",
    "simplelicensing_SimpleLicensingText",
    "expandedlicensing_ConjunctiveLicenseSet",
    "expandedlicensing_CustomLicense",
    "expandedlicensing_CustomLicenseAddition",
    "expandedlicensing_DisjunctiveLicenseSet",
    "expandedlicensing_ExtendableLicense",
    "expandedlicensing_IndividualLicensingInfo",
    "expandedlicensing_License",
    "expandedlicensing_LicenseAddition",
    "expandedlicensing_ListedLicense",
    "expandedlicensing_ListedLicenseException",
    "expandedlicensing_NoAssertionLicense",
    "expandedlicensing_NoneLicense",
    "expandedlicensing_OrLaterOperator",
    "expandedlicensing_WithAdditionOperator",
];

/// Check if a property holds object references
pub fn is_reference_property(key: &str) -> bool {
    REFERENCE_PROPERTIES.contains(&key)
}

/// Check if a type name is an SPDX Element type
pub fn is_element_type(type_name: &str) -> bool {
    ELEMENT_TYPES.contains(&type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_properties() {
        assert!(is_reference_property("creationInfo"));
        assert!(is_reference_property("rootElement"));
        assert!(!is_reference_property("externalSpdxId"));
        assert!(!is_reference_property("name"));
    }

    #[test]
    fn test_element_types() {
        assert!(is_element_type("SpdxDocument"));
        assert!(is_element_type("software_Package"));
        assert!(!is_element_type("CreationInfo"));
        assert!(!is_element_type("ExternalMap"));
    }
}
