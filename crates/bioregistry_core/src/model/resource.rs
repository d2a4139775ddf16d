//! Primary registry record model.
//!
//! # Responsibility
//! - Define the canonical record for one identifier namespace.
//! - Derive pattern and URI format views from own and cross-referenced data.
//!
//! # Invariants
//! - `prefix` equals the registry key the record was loaded under.
//! - Every undeclared top-level key holding an object is the metaprefix of an
//!   external registry and holds an [`ExternalEntry`]; other undeclared keys
//!   are kept verbatim in `extra`.

use super::registry::Contact;
use crate::pattern;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// External registries consulted, in order, when a resource has no own pattern.
pub const PATTERN_PRIORITY: &[&str] = &["miriam", "n2t", "wikidata", "prefixcommons", "cellosaurus"];

/// External registries consulted, in order, when a resource has no own URI format.
pub const URI_FORMAT_PRIORITY: &[&str] = &[
    "miriam",
    "n2t",
    "ols",
    "obofoundry",
    "biocontext",
    "prefixcommons",
    "wikidata",
    "go",
];

const OBOFOUNDRY_METAPREFIX: &str = "obofoundry";
const OBO_PURL_BASE: &str = "http://purl.obolibrary.org/obo/";

/// Alternative provider of pages for a resource's identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provider {
    pub code: String,
    pub name: String,
    pub uri_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

/// What an external registry says about a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalEntry {
    /// The resource's prefix inside the external registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One primary registry entry: a canonical identifier namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ResourceRecord")]
pub struct Resource {
    /// Canonical prefix; the unique key of this record.
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Regular expression for local unique identifiers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Template with `$1` for the resource's first-party page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_format: Option<String>,
    /// Stylized prefix (e.g. `CHEBI`) used by some communities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_prefix: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<Provider>,
    /// Curated `metaprefix -> external prefix` overrides.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub mappings: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    /// Cross-references keyed by external metaprefix.
    #[serde(flatten)]
    pub external: BTreeMap<String, ExternalEntry>,
    /// Undeclared keys that are not cross-reference blocks.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Wire shape of a [`Resource`] before cross-references are split out.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResourceRecord {
    prefix: String,
    name: Option<String>,
    description: Option<String>,
    homepage: Option<String>,
    example: Option<String>,
    pattern: Option<String>,
    uri_format: Option<String>,
    preferred_prefix: Option<String>,
    synonyms: Vec<String>,
    keywords: Vec<String>,
    license: Option<String>,
    version: Option<String>,
    repository: Option<String>,
    logo: Option<String>,
    contact: Option<Contact>,
    providers: Vec<Provider>,
    mappings: BTreeMap<String, String>,
    deprecated: bool,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

impl From<ResourceRecord> for Resource {
    /// Object values that read as an [`ExternalEntry`] become cross-references;
    /// lists, scalars and other shapes stay in `extra`.
    fn from(record: ResourceRecord) -> Self {
        let mut external = BTreeMap::new();
        let mut extra = BTreeMap::new();
        for (key, value) in record.rest {
            if !value.is_object() {
                extra.insert(key, value);
                continue;
            }
            match ExternalEntry::deserialize(&value) {
                Ok(entry) => {
                    external.insert(key, entry);
                }
                Err(_) => {
                    extra.insert(key, value);
                }
            }
        }
        Self {
            prefix: record.prefix,
            name: record.name,
            description: record.description,
            homepage: record.homepage,
            example: record.example,
            pattern: record.pattern,
            uri_format: record.uri_format,
            preferred_prefix: record.preferred_prefix,
            synonyms: record.synonyms,
            keywords: record.keywords,
            license: record.license,
            version: record.version,
            repository: record.repository,
            logo: record.logo,
            contact: record.contact,
            providers: record.providers,
            mappings: record.mappings,
            deprecated: record.deprecated,
            external,
            extra,
        }
    }
}

impl Resource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Returns `metaprefix -> external prefix` for every cross-reference
    /// that names the resource's prefix in that registry. Curated
    /// `mappings` override the cross-reference blocks.
    pub fn get_mappings(&self) -> BTreeMap<&str, &str> {
        let mut mappings: BTreeMap<&str, &str> = self
            .external
            .iter()
            .filter_map(|(metaprefix, entry)| {
                entry
                    .prefix
                    .as_deref()
                    .map(|prefix| (metaprefix.as_str(), prefix))
            })
            .collect();
        mappings.extend(
            self.mappings
                .iter()
                .map(|(metaprefix, prefix)| (metaprefix.as_str(), prefix.as_str())),
        );
        mappings
    }

    /// Returns the anchored identifier pattern, own first, then external.
    pub fn get_pattern(&self) -> Option<String> {
        if let Some(own) = self.pattern.as_deref() {
            return Some(pattern::anchor(own));
        }
        PATTERN_PRIORITY
            .iter()
            .filter_map(|metaprefix| self.external.get(*metaprefix))
            .find_map(|entry| entry.pattern.as_deref())
            .map(pattern::anchor)
    }

    /// Returns the preferred URI format, own first, then by external priority.
    pub fn get_uri_format(&self) -> Option<String> {
        if let Some(own) = self.uri_format.as_deref() {
            return Some(own.to_string());
        }
        for metaprefix in URI_FORMAT_PRIORITY {
            if *metaprefix == OBOFOUNDRY_METAPREFIX {
                if let Some(derived) = self.obofoundry_uri_format() {
                    return Some(derived);
                }
            }
            if let Some(found) = self
                .external
                .get(*metaprefix)
                .and_then(|entry| entry.uri_format.as_deref())
            {
                return Some(found.to_string());
            }
        }
        None
    }

    /// Returns every known URI format, de-duplicated in first-seen order.
    pub fn get_uri_formats(&self) -> Vec<String> {
        let mut formats: Vec<String> = Vec::new();
        let mut push = |candidate: &str| {
            if !formats.iter().any(|existing| existing == candidate) {
                formats.push(candidate.to_string());
            }
        };

        if let Some(own) = self.uri_format.as_deref() {
            push(own);
        }
        for provider in &self.providers {
            if !provider.uri_format.is_empty() {
                push(provider.uri_format.as_str());
            }
        }
        for entry in self.external.values() {
            if let Some(found) = entry.uri_format.as_deref() {
                push(found);
            }
        }
        if let Some(derived) = self.obofoundry_uri_format() {
            push(derived.as_str());
        }
        formats
    }

    /// Returns the OBO PURL template when the resource is an OBO Foundry ontology.
    pub fn obofoundry_uri_format(&self) -> Option<String> {
        let entry = self.external.get(OBOFOUNDRY_METAPREFIX)?;
        let preferred = entry
            .preferred_prefix
            .clone()
            .or_else(|| entry.prefix.as_deref().map(str::to_uppercase))?;
        Some(format!("{OBO_PURL_BASE}{preferred}_$1"))
    }
}
