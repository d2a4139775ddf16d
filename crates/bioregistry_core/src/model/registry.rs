//! Metaregistry record model.
//!
//! # Responsibility
//! - Define the record describing one external catalog of prefixes.
//! - Expose the declared schema so stray keys can be detected after load.
//!
//! # Invariants
//! - `prefix` equals the metaregistry key the record was loaded under.
//! - Unknown keys are captured in `extra`, never rejected at load time.
//! - Required metadata is modelled as `Option` so absence is reportable.

use crate::uri_format;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Top-level keys a metaregistry record may declare.
pub const REGISTRY_FIELDS: &[&str] = &[
    "prefix",
    "name",
    "description",
    "homepage",
    "example",
    "license",
    "short_name",
    "logo_url",
    "download",
    "contact",
    "provider_uri_format",
    "search_uri_format",
    "resolver_uri_format",
    "resolver_type",
    "bioregistry_prefix",
    "qualities",
    "governance",
];

/// Keys a `contact` object may declare.
pub const CONTACT_FIELDS: &[&str] = &["name", "orcid", "email", "github"];

/// Keys a `qualities` object may declare.
pub const QUALITIES_FIELDS: &[&str] = &[
    "structured_data",
    "bulk_data",
    "no_authentication",
    "automatable_download",
];

/// Keys a `governance` object may declare.
pub const GOVERNANCE_FIELDS: &[&str] = &[
    "curation",
    "scope",
    "status",
    "comments",
    "review_team",
    "accepts_external_contributions",
    "public_version_controlled_data",
    "data_repository",
    "code_repository",
    "issue_tracker",
];

/// Manifest string value for lookup-style resolvers.
pub const RESOLVER_TYPE_LOOKUP: &str = "lookup";
/// Manifest string value for full resolvers.
pub const RESOLVER_TYPE_RESOLVER: &str = "resolver";

/// How a registry turns `(prefix, identifier)` pairs into URIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResolverType {
    /// Looks the pair up and shows a landing page of its own.
    Lookup,
    /// Redirects to the provider of the identifier.
    Resolver,
}

impl ResolverType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lookup => RESOLVER_TYPE_LOOKUP,
            Self::Resolver => RESOLVER_TYPE_RESOLVER,
        }
    }

    /// Parses a declared resolver type. Matching is exact (lowercase only).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            RESOLVER_TYPE_LOOKUP => Some(Self::Lookup),
            RESOLVER_TYPE_RESOLVER => Some(Self::Resolver),
            _ => None,
        }
    }
}

/// Responsible person (or team) for a registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Contact {
    /// Returns whether the contact names a generic support channel rather
    /// than a person (case-insensitive substring match on `marker`).
    pub fn is_support_contact(&self, marker: &str) -> bool {
        let marker = marker.to_lowercase();
        self.name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(marker.as_str()))
    }
}

/// Data-access qualities of a registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryQualities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<bool>,
    /// Whether the full contents can be downloaded in one go.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_authentication: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatable_download: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Curation and governance practices of a registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryGovernance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepts_external_contributions: Option<bool>,
    /// When set, `data_repository` and `issue_tracker` are required.
    pub public_version_controlled_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_tracker: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One metaregistry entry: an external registry of identifier prefixes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    /// Metaprefix; the unique key of this record.
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Example prefix as written in this registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    /// Template with `$1` for a prefix's page in this registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_uri_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_uri_format: Option<String>,
    /// Template with `$1` (prefix) and `$2` (identifier).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver_uri_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver_type: Option<String>,
    /// Canonical registry prefix describing this registry itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bioregistry_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualities: Option<RegistryQualities>,
    pub governance: RegistryGovernance,
    /// Keys outside the declared schema, kept for reporting.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Registry {
    /// Creates an otherwise empty record for `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Substitutes `local_id` into the provider template.
    ///
    /// Returns `None` when this registry has no provider template.
    pub fn resolve_provider_uri(&self, local_id: &str) -> Option<String> {
        let template = self.provider_template()?;
        Some(uri_format::expand_provider(template, local_id))
    }

    /// Substitutes `prefix` and `identifier` into the resolver template.
    ///
    /// Returns `None` when this registry is not a resolver, even if it has a
    /// provider template.
    pub fn resolve_uri(&self, prefix: &str, identifier: &str) -> Option<String> {
        let template = self.resolver_template()?;
        Some(uri_format::expand_resolver(template, prefix, identifier))
    }

    /// Returns the declared resolver type when it is a recognized value.
    pub fn parsed_resolver_type(&self) -> Option<ResolverType> {
        self.resolver_type.as_deref().and_then(ResolverType::parse)
    }

    /// Provider template; blank values count as absent.
    pub fn provider_template(&self) -> Option<&str> {
        non_blank(self.provider_uri_format.as_deref())
    }

    /// Resolver template; blank values count as absent.
    pub fn resolver_template(&self) -> Option<&str> {
        non_blank(self.resolver_uri_format.as_deref())
    }

    pub fn is_resolver(&self) -> bool {
        self.resolver_template().is_some()
    }

    /// Lists serialized keys that fall outside the declared schema.
    ///
    /// Nested objects are reported with a dotted path, e.g. `contact.phone`.
    pub fn unknown_fields(&self) -> Vec<String> {
        let mut stray = Vec::new();
        match serde_json::to_value(self) {
            Ok(value) => collect_stray_keys(&value, REGISTRY_FIELDS, "", &mut stray),
            Err(_) => stray.extend(self.extra.keys().cloned()),
        }
        if let Ok(value) = serde_json::to_value(&self.governance) {
            collect_stray_keys(&value, GOVERNANCE_FIELDS, "governance.", &mut stray);
        }
        if let Some(contact) = &self.contact {
            if let Ok(value) = serde_json::to_value(contact) {
                collect_stray_keys(&value, CONTACT_FIELDS, "contact.", &mut stray);
            }
        }
        if let Some(qualities) = &self.qualities {
            if let Ok(value) = serde_json::to_value(qualities) {
                collect_stray_keys(&value, QUALITIES_FIELDS, "qualities.", &mut stray);
            }
        }
        stray
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

fn collect_stray_keys(value: &Value, declared: &[&str], path: &str, out: &mut Vec<String>) {
    let Some(object) = value.as_object() else {
        return;
    };
    for key in object.keys() {
        if !declared.contains(&key.as_str()) {
            out.push(format!("{path}{key}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Contact, Registry, ResolverType};
    use serde_json::json;

    #[test]
    fn parses_resolver_types_exactly() {
        assert_eq!(ResolverType::parse("lookup"), Some(ResolverType::Lookup));
        assert_eq!(ResolverType::parse("resolver"), Some(ResolverType::Resolver));
        assert_eq!(ResolverType::parse("Resolver"), None);
        assert_eq!(ResolverType::parse(""), None);
        assert_eq!(ResolverType::Lookup.as_str(), "lookup");
    }

    #[test]
    fn support_contact_detection_is_case_insensitive() {
        let contact = Contact {
            name: Some("GO Helpdesk Support".to_string()),
            ..Contact::default()
        };
        assert!(contact.is_support_contact("support"));
        assert!(!Contact::default().is_support_contact("support"));
    }

    #[test]
    fn unknown_keys_are_captured_not_rejected() {
        let registry: Registry = serde_json::from_value(json!({
            "prefix": "demo",
            "name": "Demo",
            "homepage_url": "https://example.org",
            "contact": {"name": "A Person", "phone": "555"},
            "governance": {"public_version_controlled_data": false, "funding": "none"}
        }))
        .expect("unknown keys should not fail deserialization");

        let mut stray = registry.unknown_fields();
        stray.sort();
        assert_eq!(
            stray,
            vec![
                "contact.phone".to_string(),
                "governance.funding".to_string(),
                "homepage_url".to_string(),
            ]
        );
    }

    #[test]
    fn declared_keys_are_not_reported() {
        let registry: Registry = serde_json::from_value(json!({
            "prefix": "demo",
            "name": "Demo",
            "qualities": {"bulk_data": true, "structured_data": false},
            "resolver_type": "lookup"
        }))
        .expect("declared keys should deserialize");
        assert!(registry.unknown_fields().is_empty());
    }

    #[test]
    fn provider_only_registry_is_not_a_resolver() {
        let mut registry = Registry::new("demo");
        registry.provider_uri_format = Some("https://example.org/$1".to_string());

        assert_eq!(
            registry.resolve_provider_uri("abc").as_deref(),
            Some("https://example.org/abc")
        );
        assert!(!registry.is_resolver());
        assert_eq!(registry.resolve_uri("chebi", "1234"), None);
    }

    #[test]
    fn blank_templates_count_as_absent() {
        let mut registry = Registry::new("demo");
        registry.provider_uri_format = Some(String::new());
        registry.resolver_uri_format = Some("  ".to_string());
        registry.resolver_type = Some("resolver".to_string());

        assert_eq!(registry.provider_template(), None);
        assert_eq!(registry.resolve_provider_uri("abc"), None);
        assert!(!registry.is_resolver());
        assert_eq!(registry.resolve_uri("chebi", "1234"), None);
        assert_eq!(registry.parsed_resolver_type(), Some(ResolverType::Resolver));
    }
}
