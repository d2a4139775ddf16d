//! EDAM identifier-type import.
//!
//! EDAM data terms (descendants of `data:2091`) describe identifier types.
//! Terms arrive as OLS term objects and are keyed by their numeric id.

use super::aligner::Aligner;
use super::{AlignError, AlignResult, ExternalRecord};
use serde::Deserialize;
use std::collections::BTreeMap;

pub const KEY: &str = "edam";

const OBO_ID_PREFIX: &str = "data:";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OlsTerm {
    obo_id: Option<String>,
    label: Option<String>,
    description: Vec<String>,
}

/// Returns the local id of an EDAM data term (`data:1234` -> `1234`).
pub fn edam_identifier(obo_id: &str) -> Option<&str> {
    obo_id
        .strip_prefix(OBO_ID_PREFIX)
        .filter(|identifier| !identifier.is_empty())
}

/// Parses a JSON array of OLS term objects into records keyed by EDAM id.
///
/// Terms outside the `data:` namespace are ignored.
pub fn parse_terms(text: &str) -> AlignResult<BTreeMap<String, ExternalRecord>> {
    let terms: Vec<OlsTerm> = serde_json::from_str(text).map_err(|source| AlignError::Json {
        origin: "edam terms".to_string(),
        source,
    })?;
    Ok(terms
        .into_iter()
        .filter_map(|term| {
            let identifier = edam_identifier(term.obo_id.as_deref()?)?.to_string();
            let record = ExternalRecord {
                prefix: Some(identifier.clone()),
                name: term.label,
                description: term.description.into_iter().next(),
                ..ExternalRecord::default()
            };
            Some((identifier, record))
        })
        .collect())
}

pub struct EdamAligner;

impl Aligner for EdamAligner {
    fn key(&self) -> &'static str {
        KEY
    }

    fn curation_header(&self) -> &'static [&'static str] {
        &["name", "description"]
    }

    fn skip(&self) -> BTreeMap<String, String> {
        [
            ("1164", "MIRIAM URI not relevant"),
            ("1175", "BioPAX ontologies aren't globally unique"),
            ("2582", "GO sub-hierarchy"),
            ("2583", "GO sub-hierarchy"),
        ]
        .into_iter()
        .map(|(identifier, reason)| (identifier.to_string(), reason.to_string()))
        .collect()
    }

    fn alt_keys(&self, record: &ExternalRecord) -> Vec<String> {
        record.name.iter().cloned().collect()
    }

    fn parse_input(&self, text: &str, _origin: &str) -> AlignResult<BTreeMap<String, ExternalRecord>> {
        parse_terms(text)
    }
}
