//! Alignment of external registry records to registry prefixes.
//!
//! # Responsibility
//! - Define the per-source [`Aligner`] hooks (skip table, alternative keys,
//!   curation sheet layout, input parsing).
//! - Match external records to resources and collect the rest for curation.
//! - Keep a keyed set of aligners for callers that pick a source by name.
//!
//! # Invariants
//! - A resource is matched to at most one external record per source.
//! - Alignment only reads the [`Manager`]; it never edits records.

use super::{parse_processed_str, AlignResult, ExternalRecord};
use crate::store::Manager;
use log::info;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Per-source alignment hooks.
pub trait Aligner: Send + Sync {
    /// Metaprefix of the external registry.
    fn key(&self) -> &'static str;

    /// Columns of the curation sheet, after the external prefix.
    fn curation_header(&self) -> &'static [&'static str];

    /// External prefixes to ignore, with the reason.
    fn skip(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Extra spellings tried when the external prefix itself does not match.
    fn alt_keys(&self, _record: &ExternalRecord) -> Vec<String> {
        Vec::new()
    }

    fn curation_row(&self, _external_id: &str, record: &ExternalRecord) -> Vec<String> {
        self.curation_header()
            .iter()
            .map(|field| record.field_text(field).unwrap_or_default())
            .collect()
    }

    /// Parses this source's downloaded file into records.
    fn parse_input(&self, text: &str, origin: &str) -> AlignResult<BTreeMap<String, ExternalRecord>> {
        parse_processed_str(text, origin)
    }
}

/// How an external record was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignMethod {
    /// The resource already cross-references the external prefix.
    Existing,
    /// The external prefix normalizes to the resource prefix.
    Prefix,
    /// An alternative key (synonym or name) normalizes to the resource prefix.
    AltKey,
}

impl AlignMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Existing => "existing",
            Self::Prefix => "prefix",
            Self::AltKey => "alt_key",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPrefix {
    pub prefix: String,
    pub method: AlignMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurationRow {
    pub external_id: String,
    pub cells: Vec<String>,
}

/// Outcome of aligning one external registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub key: String,
    /// External prefix to matched resource.
    pub aligned: BTreeMap<String, AlignedPrefix>,
    /// External prefix to skip reason.
    pub skipped: BTreeMap<String, String>,
    pub curation_header: Vec<String>,
    pub curation: Vec<CurationRow>,
}

impl Alignment {
    /// Renders the curation sheet as TSV with a header line.
    pub fn curation_tsv(&self) -> String {
        let mut out = String::from(self.key.as_str());
        for column in &self.curation_header {
            out.push('\t');
            out.push_str(column);
        }
        out.push('\n');
        for row in &self.curation {
            out.push_str(&tsv_cell(&row.external_id));
            for cell in &row.cells {
                out.push('\t');
                out.push_str(&tsv_cell(cell));
            }
            out.push('\n');
        }
        out
    }
}

fn tsv_cell(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

/// Aligns `records` from `aligner`'s source against the store.
pub fn align(
    manager: &Manager,
    aligner: &dyn Aligner,
    records: &BTreeMap<String, ExternalRecord>,
) -> Alignment {
    let key = aligner.key();
    let skip = aligner.skip();
    let existing = manager.get_registry_invmap(key);
    let mut claimed: BTreeSet<String> = existing.values().cloned().collect();

    let mut alignment = Alignment {
        key: key.to_string(),
        aligned: BTreeMap::new(),
        skipped: BTreeMap::new(),
        curation_header: aligner
            .curation_header()
            .iter()
            .map(|column| column.to_string())
            .collect(),
        curation: Vec::new(),
    };

    for (external_id, record) in records {
        if let Some(reason) = skip.get(external_id) {
            alignment
                .skipped
                .insert(external_id.clone(), reason.clone());
            continue;
        }
        if let Some(prefix) = existing.get(external_id) {
            alignment.aligned.insert(
                external_id.clone(),
                AlignedPrefix {
                    prefix: prefix.clone(),
                    method: AlignMethod::Existing,
                },
            );
            continue;
        }

        let by_prefix = manager
            .normalize_prefix(external_id)
            .filter(|prefix| !claimed.contains(*prefix))
            .map(|prefix| (prefix, AlignMethod::Prefix));
        let matched = by_prefix.or_else(|| {
            aligner.alt_keys(record).iter().find_map(|alt| {
                manager
                    .normalize_prefix(alt)
                    .filter(|prefix| !claimed.contains(*prefix))
                    .map(|prefix| (prefix, AlignMethod::AltKey))
            })
        });

        match matched {
            Some((prefix, method)) => {
                claimed.insert(prefix.to_string());
                alignment.aligned.insert(
                    external_id.clone(),
                    AlignedPrefix {
                        prefix: prefix.to_string(),
                        method,
                    },
                );
            }
            None => alignment.curation.push(CurationRow {
                external_id: external_id.clone(),
                cells: aligner.curation_row(external_id, record),
            }),
        }
    }

    info!(
        "event=align_done module=external key={} records={} aligned={} skipped={} curation={}",
        key,
        records.len(),
        alignment.aligned.len(),
        alignment.skipped.len(),
        alignment.curation.len()
    );
    alignment
}

/// Aligner registration and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignerRegistryError {
    InvalidKey(String),
    DuplicateKey(String),
}

impl Display for AlignerRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(value) => write!(f, "aligner key is invalid: {value}"),
            Self::DuplicateKey(value) => write!(f, "aligner key already registered: {value}"),
        }
    }
}

impl Error for AlignerRegistryError {}

/// Aligners keyed by external metaprefix.
#[derive(Default)]
pub struct AlignerRegistry {
    aligners: BTreeMap<String, Arc<dyn Aligner>>,
}

impl AlignerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in aligner.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let builtin: [Arc<dyn Aligner>; 3] = [
            Arc::new(super::prefixcommons::PrefixCommonsAligner),
            Arc::new(super::togoid::TogoIdAligner),
            Arc::new(super::edam::EdamAligner),
        ];
        for aligner in builtin {
            // Built-in keys are distinct and valid.
            let _ = registry.register(aligner);
        }
        registry
    }

    pub fn register(&mut self, aligner: Arc<dyn Aligner>) -> Result<(), AlignerRegistryError> {
        let key = aligner.key().trim().to_string();
        if !is_valid_key(&key) {
            return Err(AlignerRegistryError::InvalidKey(key));
        }
        if self.aligners.contains_key(key.as_str()) {
            return Err(AlignerRegistryError::DuplicateKey(key));
        }
        self.aligners.insert(key, aligner);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.aligners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligners.is_empty()
    }

    /// Returns sorted aligner keys.
    pub fn keys(&self) -> Vec<String> {
        self.aligners.keys().cloned().collect()
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn Aligner>> {
        self.aligners.get(key.trim()).cloned()
    }
}

fn is_valid_key(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.'))
}
