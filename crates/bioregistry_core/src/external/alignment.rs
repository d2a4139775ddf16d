//! Standard record shape for importing external registries.
//!
//! Records are stored as a JSON object keyed by the external prefix, with
//! sorted keys and without empty fields so dumps diff cleanly.

use super::{AlignError, AlignResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct License {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spdx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Lifecycle state of an external resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
    Abandoned,
    Orphaned,
    Replaced,
    Deprecated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Publication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pubmed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arxiv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medrxiv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biorxiv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zenodo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    Obo,
    ObographJson,
    Rdf,
    Owl,
}

/// Downloadable dump of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub url: String,
    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Compact reference to an organism taxon (`prefix:identifier`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonReference {
    pub prefix: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// URL of the logo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub appears_in: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<Publication>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxon: Option<TaxonReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_format: Option<String>,
}

/// A full external registry in the standard shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignedRegistry {
    pub records: BTreeMap<String, Record>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Renders records as indented JSON with sorted keys.
pub fn records_to_string(records: &BTreeMap<String, Record>) -> AlignResult<String> {
    // Going through `Value` sorts nested object keys as well.
    let value = serde_json::to_value(records).map_err(|source| AlignError::Json {
        origin: "records".to_string(),
        source,
    })?;
    serde_json::to_string_pretty(&value).map_err(|source| AlignError::Json {
        origin: "records".to_string(),
        source,
    })
}

/// Writes records to `path`.
pub fn dump_records(records: &BTreeMap<String, Record>, path: impl AsRef<Path>) -> AlignResult<()> {
    let path = path.as_ref();
    let text = records_to_string(records)?;
    std::fs::write(path, text).map_err(|source| AlignError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// On-disk forms: a wrapped registry or a bare record map.
#[derive(Deserialize)]
#[serde(untagged)]
enum RegistryFile {
    Wrapped(AlignedRegistry),
    Bare(BTreeMap<String, Record>),
}

/// Reads a registry file, either wrapped with metadata or a bare record map
/// as written by [`dump_records`].
pub fn load_registry(path: impl AsRef<Path>) -> AlignResult<AlignedRegistry> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| AlignError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = serde_json::from_str(&text).map_err(|source| AlignError::Json {
        origin: path.display().to_string(),
        source,
    })?;
    Ok(match file {
        RegistryFile::Wrapped(registry) => registry,
        RegistryFile::Bare(records) => AlignedRegistry {
            records,
            metadata: BTreeMap::new(),
        },
    })
}

/// Reads the records of a registry file, dropping metadata.
pub fn load_records(path: impl AsRef<Path>) -> AlignResult<BTreeMap<String, Record>> {
    load_registry(path).map(|registry| registry.records)
}
