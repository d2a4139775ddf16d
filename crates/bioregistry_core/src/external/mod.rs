//! External registry records and their alignment to the primary registry.
//!
//! # Responsibility
//! - Describe the external registries the metaregistry knows how to import.
//! - Parse processed external records and align them to registry prefixes.
//!
//! # Invariants
//! - Nothing here touches the network; inputs are already-downloaded files
//!   or in-memory text.
//! - Record maps are keyed by the external registry's own prefix.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod aligner;
pub mod alignment;
pub mod edam;
pub mod prefixcommons;
pub mod togoid;

pub type AlignResult<T> = Result<T, AlignError>;

/// Failure to read or write external record files.
#[derive(Debug)]
pub enum AlignError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        origin: String,
        source: serde_json::Error,
    },
    Yaml {
        origin: String,
        source: serde_yaml::Error,
    },
}

impl Display for AlignError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at `{}`: {source}", path.display()),
            Self::Json { origin, source } => write!(f, "invalid json in {origin}: {source}"),
            Self::Yaml { origin, source } => write!(f, "invalid yaml in {origin}: {source}"),
        }
    }
}

impl Error for AlignError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Yaml { source, .. } => Some(source),
        }
    }
}

/// One processed entry of an external registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdf_uri_format: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alt_uri_formats: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pubmed_ids: Vec<String>,
    /// BioPortal ontology id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bioportal: Option<String>,
    /// identifiers.org namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miriam: Option<String>,
    /// Integbio catalog id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ExternalRecord {
    /// Returns a curation-sheet cell for `field`; list fields are joined
    /// with `", "`. Unknown or empty fields yield `None`.
    pub fn field_text(&self, field: &str) -> Option<String> {
        let single = |value: &Option<String>| value.clone();
        let joined = |values: &Vec<String>| (!values.is_empty()).then(|| values.join(", "));
        match field {
            "prefix" => single(&self.prefix),
            "name" => single(&self.name),
            "description" => single(&self.description),
            "homepage" => single(&self.homepage),
            "pattern" => single(&self.pattern),
            "example" => single(&self.example),
            "examples" => joined(&self.examples),
            "uri_format" => single(&self.uri_format),
            "rdf_uri_format" => single(&self.rdf_uri_format),
            "alt_uri_formats" => joined(&self.alt_uri_formats),
            "license" => single(&self.license),
            "synonyms" => joined(&self.synonyms),
            "keywords" => joined(&self.keywords),
            "pubmed_ids" => joined(&self.pubmed_ids),
            "bioportal" => single(&self.bioportal),
            "miriam" => single(&self.miriam),
            "catalog" => single(&self.catalog),
            other => self.extra.get(other).and_then(|value| match value {
                Value::String(text) => Some(text.clone()),
                Value::Null => None,
                value => Some(value.to_string()),
            }),
        }
    }
}

/// Parses a processed record map (`external prefix -> record`).
pub fn parse_processed_str(text: &str, origin: &str) -> AlignResult<BTreeMap<String, ExternalRecord>> {
    serde_json::from_str(text).map_err(|source| AlignError::Json {
        origin: origin.to_string(),
        source,
    })
}

/// Reads a processed record map from disk.
pub fn load_processed(path: impl AsRef<Path>) -> AlignResult<BTreeMap<String, ExternalRecord>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| AlignError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_processed_str(&text, &path.display().to_string())
}

/// Static description of an importable external registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalSource {
    pub metaprefix: &'static str,
    pub label: &'static str,
}

const fn source(metaprefix: &'static str, label: &'static str) -> ExternalSource {
    ExternalSource { metaprefix, label }
}

/// Importable external registries in import order.
pub const EXTERNAL_SOURCES: &[ExternalSource] = &[
    source("obofoundry", "OBO"),
    source("ols", "OLS"),
    source("miriam", "MIRIAM"),
    source("wikidata", "Wikidata"),
    source("n2t", "N2T"),
    source("go", "GO"),
    source("bioportal", "BioPortal"),
    source("prefixcommons", "Prefix Commons"),
    source("biocontext", "BioContext"),
    source("biolink", "Biolink"),
    source("ncbi", "NCBI"),
    source("uniprot", "UniProt"),
    source("cellosaurus", "Cellosaurus"),
    source("ontobee", "OntoBee"),
    source("cheminf", "CHEMINF"),
    source("fairsharing", "FAIRsharing"),
    source("agroportal", "AgroPortal"),
    source("ecoportal", "EcoPortal"),
    source("aberowl", "AberOWL"),
    source("cropoct", "CropOCT"),
    source("edam", "EDAM"),
    source("re3data", "re3data"),
    source("hl7", "HL7"),
    source("bartoc", "BARTOC"),
    source("integbio", "Integbio"),
    source("lov", "LOV"),
    source("pathguide", "Pathguide"),
    source("togoid", "TogoID"),
    source("zazuko", "Zazuko"),
    source("rrid", "RRID"),
];

/// Looks up an importable external registry by metaprefix.
pub fn external_source(metaprefix: &str) -> Option<&'static ExternalSource> {
    let metaprefix = metaprefix.trim();
    EXTERNAL_SOURCES
        .iter()
        .find(|source| source.metaprefix == metaprefix)
}
