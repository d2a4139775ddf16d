//! Prefix Commons (Life Science Registry) import.
//!
//! Rows come from the registry's TSV export. Only a subset of columns is
//! kept; `N/A` cells are treated as empty.

use super::aligner::Aligner;
use super::{AlignResult, ExternalRecord};
use crate::pattern;
use log::{debug, warn};
use std::collections::BTreeMap;

pub const KEY: &str = "prefixcommons";

/// Column layout of the TSV export. Empty names are unlabeled columns.
pub const COLUMNS: &[&str] = &[
    "prefix",
    "synonyms",
    "rdf_uri_prefix",
    "alternate_uri_formats",
    "MIRIAM",
    "BiodbcoreID",
    "bioportal",
    "miriam",
    "Abbreviation",
    "name",
    "description",
    "pubmed_ids",
    "Organization",
    "Type (warehouse, dataset or terminology)",
    "keywords",
    "homepage",
    "Functional?",
    "part_of",
    "part of collection",
    "license_url",
    "License Text",
    "Rights",
    "pattern",
    "example",
    "uri_format",
    "",
    "MIRIAM checked",
    "MIRIAM curator notes",
    "MIRIAM coverage",
    "updates",
    "year last accessible",
    "wayback url",
    "last updated",
    "last updated by",
    "last updated by (orcid)",
];

pub const KEEP: &[&str] = &[
    "prefix",
    "synonyms",
    "bioportal",
    "miriam",
    "name",
    "description",
    "pubmed_ids",
    "keywords",
    "homepage",
    "pattern",
    "example",
    "uri_format",
    "license_url",
    "alternate_uri_formats",
    "rdf_uri_prefix",
];

/// Prefixes whose synonym lists name other resources.
pub const DISCARD_SYNONYMS: &[&str] = &["biogrid", "cath", "zfa"];

pub const SKIP_URI_FORMATS: &[&str] = &[
    "http://purl.obolibrary.org/obo/$1",
    "http://www.ebi.ac.uk/ontology-lookup/?termId=$1",
    "http://arabidopsis.org/servlets/TairObject?accession=$1",
];

const REQUIRED: &[&str] = &["name", "description", "example", "pattern"];
const NULL_CELL: &str = "N/A";

/// Entries that no longer exist.
pub const SKIP: &[(&str, &str)] = &[
    ("redidb", "Website is dead"),
    ("trnadbce", "Website is password protected"),
    ("pogs_plantrbp", "Website is dead"),
    ("smr", "no evidence of it existing"),
];

/// Entries that are providers for another resource, with that resource.
pub const PROVIDERS: &[(&str, &str)] = &[
    ("homeodomain_resource", "hdr"),
    ("interpare", "pdb"),
    ("consurfdb", "pdb"),
    ("homstrad", "pdb"),
    ("jail", "pdb"),
    ("hotsprint", "pdb"),
    ("lpfc", "pdb"),
    ("pdbreprdb", "pdb"),
    ("pdtd", "pdb"),
    ("supersite", "pdb"),
    ("pairsdb", "pdb"),
    ("icbs", "pdb"),
    ("pdbbind", "pdb"),
    ("pdb.tm", "pdb"),
    ("ligasite", "pdb"),
    ("firedb", "pdb"),
    ("dali", "pdb"),
    ("pisite", "pdb"),
    ("procognate", "pdb"),
    ("binding_moad", "pdb"),
    ("bhfucl", "uniprot"),
    ("pdzbase", "uniprot"),
    ("unisave", "uniprot"),
    ("2dbaseecoli", "uniprot"),
    ("swiss2dpage", "uniprot"),
    ("siena2dpage", "uniprot"),
    ("phci2dpage", "uniprot"),
    ("reproduction2dpage", "uniprot"),
    ("agbase", "uniprot"),
    ("iproclass", "uniprot"),
    ("asap_ii", "unigene"),
    ("snp2nmd", "dbsnp"),
    ("cangem", "ensembl"),
    ("cisred", "ensembl"),
    ("interferome", "ensembl"),
    ("spliceinfo", "ensembl"),
    ("piggis", "ensembl"),
    ("corg", "ensembl"),
    ("greglist", "ensembl"),
    ("gxa", "ensembl"),
    ("cyclebase", "ensembl"),
    ("droid", "flybase"),
    ("enzyme", "eccode"),
    ("orenza", "eccode"),
    ("explorenz", "eccode"),
    ("fcp", "eccode"),
    ("mousecyc", "mgi"),
    ("imgt.3dstructuredb", "pdb"),
    ("mapu", "ipi"),
    ("sysbodyfluid", "ipi"),
    ("uniprot.taxonomy", "ncbitaxon"),
    ("domine", "pfam"),
    ("dima", "pfam"),
    ("interdom", "pfam"),
    ("sdr", "pfam"),
    ("ipfam", "pfam"),
    ("hupi", "hgnc.symbol"),
    ("chimerdb", "hgnc.symbol"),
    ("po.psds", "po"),
    ("cutdb", "pmap.cutdb"),
    ("hubmed", "pubmed"),
];

/// Parses one TSV data row into `(prefix, record)`.
///
/// Returns `None` when any of name, description, example or pattern is
/// missing.
pub fn process_row(line: &str) -> Option<(String, ExternalRecord)> {
    let cells: Vec<&str> = line.trim().split('\t').collect();
    let prefix = cells.first().copied().unwrap_or_default().to_string();

    let mut kept: BTreeMap<&str, String> = COLUMNS
        .iter()
        .zip(cells.iter())
        .filter(|(column, cell)| {
            !column.is_empty() && **cell != NULL_CELL && KEEP.contains(*column)
        })
        .map(|(column, cell)| (*column, cell.trim().to_string()))
        .filter(|(_, value)| !value.is_empty())
        .collect();

    if REQUIRED.iter().any(|field| !kept.contains_key(field)) {
        debug!("event=row_dropped module=external key={KEY} prefix={prefix}");
        return None;
    }

    let mut record = ExternalRecord {
        prefix: kept.remove("prefix"),
        name: kept.remove("name"),
        description: kept.remove("description"),
        example: kept.remove("example"),
        homepage: kept.remove("homepage"),
        bioportal: kept.remove("bioportal"),
        miriam: kept.remove("miriam"),
        license: kept.remove("license_url"),
        keywords: split_list(kept.remove("keywords")),
        pubmed_ids: split_list(kept.remove("pubmed_ids")),
        ..ExternalRecord::default()
    };

    if let Some(synonyms) = kept.remove("synonyms") {
        if !DISCARD_SYNONYMS.contains(&prefix.as_str()) {
            let lowered = prefix.to_lowercase();
            record.synonyms = synonyms
                .split(',')
                .map(str::trim)
                .filter(|synonym| synonym.to_lowercase() != lowered && !synonym.contains(' '))
                .map(str::to_string)
                .collect();
        }
    }

    if let Some(uri_format) = kept.remove("uri_format") {
        let uri_format = uri_format
            .replace("$id", "$1")
            .replace("[?id]", "$1")
            .replace("$d", "$1");
        if !SKIP_URI_FORMATS.contains(&uri_format.as_str()) {
            record.uri_format = Some(uri_format);
        }
    }

    let rdf_formats = get_uri_formats(kept.remove("rdf_uri_prefix").as_deref());
    if rdf_formats.len() > 1 {
        warn!("event=multiple_rdf_formats module=external key={KEY} prefix={prefix}");
    }
    record.rdf_uri_format = rdf_formats.into_iter().next();
    record.alt_uri_formats = get_uri_formats(kept.remove("alternate_uri_formats").as_deref());

    record.pattern = kept.remove("pattern").map(|raw| pattern::anchor(&raw));

    Some((prefix, record))
}

/// Turns a comma-separated list of URI prefixes into `$1` templates.
///
/// Drops entries served by identifiers.org or the OBO Foundry, entries that
/// are already templates, and known-bad templates.
pub fn get_uri_formats(value: Option<&str>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|uri_prefix| !uri_prefix.is_empty())
        .filter(|uri_prefix| {
            !["identifiers.org", "obofoundry.org", "obolibrary.org", "$1", "[?id]"]
                .iter()
                .any(|marker| uri_prefix.contains(marker))
        })
        .map(|uri_prefix| format!("{uri_prefix}$1"))
        .filter(|uri_format| !SKIP_URI_FORMATS.contains(&uri_format.as_str()))
        .collect()
}

/// Parses a full TSV export; the first line is a header.
pub fn parse_tsv(text: &str) -> BTreeMap<String, ExternalRecord> {
    text.lines()
        .skip(1)
        .filter_map(process_row)
        .filter(|(prefix, _)| !prefix.is_empty())
        .collect()
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|value| value.split(',').map(|item| item.trim().to_string()).collect())
        .unwrap_or_default()
}

pub struct PrefixCommonsAligner;

impl Aligner for PrefixCommonsAligner {
    fn key(&self) -> &'static str {
        KEY
    }

    fn curation_header(&self) -> &'static [&'static str] {
        &["name", "synonyms", "description", "example", "pattern", "uri_format"]
    }

    fn skip(&self) -> BTreeMap<String, String> {
        SKIP.iter()
            .chain(PROVIDERS.iter())
            .map(|(prefix, reason)| (prefix.to_string(), reason.to_string()))
            .collect()
    }

    fn alt_keys(&self, record: &ExternalRecord) -> Vec<String> {
        record.synonyms.clone()
    }

    fn curation_row(&self, _external_id: &str, record: &ExternalRecord) -> Vec<String> {
        let mut row: Vec<String> = self
            .curation_header()
            .iter()
            .map(|field| record.field_text(field).unwrap_or_default())
            .collect();
        row[2] = row[2].replace('"', "");
        row
    }

    fn parse_input(&self, text: &str, _origin: &str) -> AlignResult<BTreeMap<String, ExternalRecord>> {
        Ok(parse_tsv(text))
    }
}
