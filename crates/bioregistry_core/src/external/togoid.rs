//! TogoID import.
//!
//! TogoID publishes a dataset YAML keyed by its own dataset keys, a
//! description JSON keyed the same way, and an ontology mapping dataset keys
//! to prefixes. The three are combined into records keyed by prefix.

use super::aligner::Aligner;
use super::{AlignError, AlignResult, ExternalRecord};
use log::warn;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const KEY: &str = "togoid";
pub const ONTOLOGY_NAMESPACE: &str = "http://togoid.dbcls.jp/ontology#";

const PLACEHOLDER_CATALOG: &str = "FIXME";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DatasetEntry {
    label: Option<String>,
    regex: Option<String>,
    /// URI prefix the identifier is appended to.
    prefix: Option<String>,
    examples: Vec<Vec<serde_yaml::Value>>,
    category: Option<String>,
    catalog: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DescriptionEntry {
    description_en: Option<String>,
}

/// Parses the dataset YAML into records keyed by TogoID dataset key.
///
/// Entries without a label are skipped; entries without a regex or URI
/// prefix are skipped with a warning.
pub fn parse_dataset(text: &str) -> AlignResult<BTreeMap<String, ExternalRecord>> {
    let entries: BTreeMap<String, DatasetEntry> =
        serde_yaml::from_str(text).map_err(|source| AlignError::Yaml {
            origin: "togoid dataset".to_string(),
            source,
        })?;

    let mut records = BTreeMap::new();
    for (key, entry) in entries {
        let Some(name) = entry.label.filter(|label| !label.is_empty()) else {
            continue;
        };
        let (Some(regex), Some(uri_prefix)) = (entry.regex, entry.prefix) else {
            warn!("event=dataset_incomplete module=external key={KEY} dataset={key}");
            continue;
        };
        let record = ExternalRecord {
            name: Some(name),
            pattern: Some(regex.replace("<id>", "")),
            uri_format: Some(format!("{uri_prefix}$1")),
            examples: entry
                .examples
                .first()
                .map(|examples| examples.iter().filter_map(scalar_text).collect())
                .unwrap_or_default(),
            keywords: entry.category.into_iter().collect(),
            catalog: entry
                .catalog
                .filter(|catalog| catalog != PLACEHOLDER_CATALOG),
            ..ExternalRecord::default()
        };
        records.insert(key, record);
    }
    Ok(records)
}

fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(text) => Some(text.clone()),
        serde_yaml::Value::Number(number) => Some(number.to_string()),
        serde_yaml::Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Replaces every CR/LF sequence with one space.
pub fn sanitize_description(description: &str) -> String {
    description
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
}

/// Parses the description JSON into `dataset key -> English description`.
pub fn parse_descriptions(text: &str) -> AlignResult<BTreeMap<String, String>> {
    let entries: BTreeMap<String, DescriptionEntry> =
        serde_json::from_str(text).map_err(|source| AlignError::Json {
            origin: "togoid descriptions".to_string(),
            source,
        })?;
    Ok(entries
        .into_iter()
        .filter_map(|(key, entry)| {
            entry
                .description_en
                .map(|description| (key, sanitize_description(&description)))
        })
        .collect())
}

/// Strips the TogoID ontology namespace from a class IRI.
pub fn ontology_key(namespace: &str) -> &str {
    namespace
        .strip_prefix(ONTOLOGY_NAMESPACE)
        .unwrap_or(namespace)
}

/// Re-keys dataset records by prefix and attaches descriptions.
///
/// Dataset keys missing from `key_to_prefix` are dropped with a warning.
pub fn assemble(
    key_to_prefix: &BTreeMap<String, String>,
    descriptions: &BTreeMap<String, String>,
    records: BTreeMap<String, ExternalRecord>,
) -> BTreeMap<String, ExternalRecord> {
    let mut assembled = BTreeMap::new();
    for (key, mut record) in records {
        let Some(prefix) = key_to_prefix.get(&key) else {
            warn!("event=dataset_unmapped module=external key={KEY} dataset={key}");
            continue;
        };
        record.prefix = Some(prefix.clone());
        if let Some(description) = descriptions.get(&key) {
            record.description = Some(description.clone());
        }
        assembled.insert(prefix.clone(), record);
    }
    assembled
}

pub struct TogoIdAligner;

impl Aligner for TogoIdAligner {
    fn key(&self) -> &'static str {
        KEY
    }

    fn curation_header(&self) -> &'static [&'static str] {
        &["name", "uri_format"]
    }
}

#[cfg(test)]
mod tests {
    use super::{assemble, ontology_key, parse_dataset, parse_descriptions, sanitize_description};
    use std::collections::BTreeMap;

    const DATASET: &str = r#"
ncbigene:
  label: NCBI Gene
  regex: "^(?<id>\\d+)$"
  prefix: http://identifiers.org/ncbigene/
  category: Gene
  catalog: nbdc00072
  examples:
    - [7157, "1956"]
    - ["672"]
draft:
  regex: "x"
  prefix: http://example.org/
fixme:
  label: Placeholder
  regex: "\\w+"
  prefix: http://example.org/fixme/
  catalog: FIXME
"#;

    #[test]
    fn dataset_records_use_first_example_list_and_drop_placeholders() {
        let records = parse_dataset(DATASET).expect("dataset should parse");
        assert_eq!(records.len(), 2);

        let gene = &records["ncbigene"];
        assert_eq!(gene.name.as_deref(), Some("NCBI Gene"));
        assert_eq!(gene.pattern.as_deref(), Some("^(?\\d+)$"));
        assert_eq!(
            gene.uri_format.as_deref(),
            Some("http://identifiers.org/ncbigene/$1")
        );
        assert_eq!(gene.examples, vec!["7157", "1956"]);
        assert_eq!(gene.keywords, vec!["Gene"]);
        assert_eq!(gene.catalog.as_deref(), Some("nbdc00072"));

        assert_eq!(records["fixme"].catalog, None);
    }

    #[test]
    fn descriptions_are_single_line() {
        assert_eq!(sanitize_description("a\r\nb\rc\nd"), "a b c d");
        let parsed = parse_descriptions(
            r#"{"ncbigene": {"description_en": "Gene\r\nrecords"}, "other": {"description_ja": "x"}}"#,
        )
        .expect("descriptions should parse");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["ncbigene"], "Gene records");
    }

    #[test]
    fn assemble_rekeys_by_prefix() {
        let records = parse_dataset(DATASET).expect("dataset should parse");
        let key_to_prefix = BTreeMap::from([(
            "ncbigene".to_string(),
            ontology_key("http://togoid.dbcls.jp/ontology#NcbiGene").to_string(),
        )]);
        let descriptions = BTreeMap::from([("ncbigene".to_string(), "Genes".to_string())]);

        let assembled = assemble(&key_to_prefix, &descriptions, records);
        assert_eq!(assembled.len(), 1);
        let gene = &assembled["NcbiGene"];
        assert_eq!(gene.prefix.as_deref(), Some("NcbiGene"));
        assert_eq!(gene.description.as_deref(), Some("Genes"));
        assert_eq!(ontology_key("unrelated"), "unrelated");
    }
}
