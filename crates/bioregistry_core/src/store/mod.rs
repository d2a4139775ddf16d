//! In-memory record store.
//!
//! # Responsibility
//! - Hold the registry (`prefix -> Resource`) and the metaregistry
//!   (`metaprefix -> Registry`) for the lifetime of a process.
//! - Provide prefix normalization and mapping indexes over the registry.
//!
//! # Invariants
//! - A [`Manager`] is built once and never mutated; every API takes `&self`.
//! - Canonical prefixes always win normalization-key collisions over synonyms.

use crate::model::registry::Registry;
use crate::model::resource::Resource;
use log::{debug, warn};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

mod load;
mod query;

pub use load::{
    parse_metaregistry_str, parse_registry_str, LoadError, LoadResult, BUNDLED_METAREGISTRY,
    BUNDLED_REGISTRY,
};

/// Computes the key used to match prefix spellings against each other.
///
/// Case-folds and removes `.`, `-`, `_`, `/` and whitespace.
pub fn norm(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '_' | '/') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Read-only context holding both record collections.
#[derive(Debug, Clone, Default)]
pub struct Manager {
    registry: BTreeMap<String, Resource>,
    metaregistry: BTreeMap<String, Registry>,
    synonyms: BTreeMap<String, String>,
}

impl Manager {
    /// Builds a store and its normalization index.
    pub fn new(
        registry: BTreeMap<String, Resource>,
        metaregistry: BTreeMap<String, Registry>,
    ) -> Self {
        let synonyms = build_synonym_index(&registry);
        debug!(
            "event=store_ready module=store resources={} registries={} synonyms={}",
            registry.len(),
            metaregistry.len(),
            synonyms.len()
        );
        Self {
            registry,
            metaregistry,
            synonyms,
        }
    }

    pub fn registry(&self) -> &BTreeMap<String, Resource> {
        &self.registry
    }

    pub fn metaregistry(&self) -> &BTreeMap<String, Registry> {
        &self.metaregistry
    }

    /// Maps any known spelling of a prefix to its canonical prefix.
    ///
    /// Returns `None` for spellings that match no resource. Applying this to
    /// its own output returns the same value.
    pub fn normalize_prefix(&self, prefix: &str) -> Option<&str> {
        self.synonyms.get(&norm(prefix)).map(String::as_str)
    }

    /// Looks a resource up by exact key, then by normalized spelling.
    pub fn get_resource(&self, prefix: &str) -> Option<&Resource> {
        if let Some(resource) = self.registry.get(prefix) {
            return Some(resource);
        }
        let canonical = self.normalize_prefix(prefix)?;
        self.registry.get(canonical)
    }

    /// Returns `prefix -> external prefix` for one external registry.
    pub fn get_registry_map(&self, metaprefix: &str) -> BTreeMap<String, String> {
        self.registry
            .iter()
            .filter_map(|(prefix, resource)| {
                resource
                    .get_mappings()
                    .get(metaprefix)
                    .map(|external| (prefix.clone(), external.to_string()))
            })
            .collect()
    }

    /// Returns `external prefix -> prefix` for one external registry.
    pub fn get_registry_invmap(&self, metaprefix: &str) -> BTreeMap<String, String> {
        self.get_registry_map(metaprefix)
            .into_iter()
            .map(|(prefix, external)| (external, prefix))
            .collect()
    }
}

fn build_synonym_index(registry: &BTreeMap<String, Resource>) -> BTreeMap<String, String> {
    let mut index = BTreeMap::<String, String>::new();
    for prefix in registry.keys() {
        match index.entry(norm(prefix)) {
            Entry::Vacant(slot) => {
                slot.insert(prefix.clone());
            }
            Entry::Occupied(slot) => {
                warn!(
                    "event=prefix_collision module=store key={} kept={} dropped={}",
                    slot.key(),
                    slot.get(),
                    prefix
                );
            }
        }
    }
    for (prefix, resource) in registry {
        let spellings = resource
            .synonyms
            .iter()
            .chain(resource.preferred_prefix.iter());
        for spelling in spellings {
            match index.entry(norm(spelling)) {
                Entry::Vacant(slot) => {
                    slot.insert(prefix.clone());
                }
                Entry::Occupied(slot) if slot.get() != prefix => {
                    debug!(
                        "event=synonym_shadowed module=store synonym={} owner={} claimed_by={}",
                        spelling,
                        slot.get(),
                        prefix
                    );
                }
                Entry::Occupied(_) => {}
            }
        }
    }
    index
}
