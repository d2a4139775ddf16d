//! Record store loading from JSON sources.
//!
//! # Responsibility
//! - Parse `prefix -> record` JSON objects into typed records.
//! - Tag every parse failure with the source and the offending key.
//!
//! # Invariants
//! - A record's `prefix` is filled from its key when omitted.
//! - A non-empty `prefix` that differs from its key is rejected.

use crate::config::StoreConfig;
use crate::model::registry::Registry;
use crate::model::resource::Resource;
use crate::store::Manager;
use log::info;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Curated registry sample compiled into the crate.
pub const BUNDLED_REGISTRY: &str = include_str!("../../data/registry.json");
/// Curated metaregistry sample compiled into the crate.
pub const BUNDLED_METAREGISTRY: &str = include_str!("../../data/metaregistry.json");

const BUNDLED_ORIGIN: &str = "<bundled>";

pub type LoadResult<T> = Result<T, LoadError>;

/// Failure to turn a source into records.
#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The source is not a JSON object of records.
    Json {
        origin: String,
        source: serde_json::Error,
    },
    /// One record does not fit the record model.
    InvalidRecord {
        origin: String,
        key: String,
        source: serde_json::Error,
    },
    PrefixMismatch {
        origin: String,
        key: String,
        prefix: String,
    },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Json { origin, source } => {
                write!(f, "`{origin}` is not a JSON object of records: {source}")
            }
            Self::InvalidRecord {
                origin,
                key,
                source,
            } => write!(f, "invalid record `{key}` in `{origin}`: {source}"),
            Self::PrefixMismatch {
                origin,
                key,
                prefix,
            } => write!(
                f,
                "record `{key}` in `{origin}` declares a different prefix `{prefix}`"
            ),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidRecord { source, .. } => Some(source),
            Self::PrefixMismatch { .. } => None,
        }
    }
}

/// Parses a registry JSON object (`prefix -> Resource`).
pub fn parse_registry_str(text: &str, origin: &str) -> LoadResult<BTreeMap<String, Resource>> {
    parse_records(text, origin, |resource: &mut Resource| &mut resource.prefix)
}

/// Parses a metaregistry JSON object (`metaprefix -> Registry`).
pub fn parse_metaregistry_str(
    text: &str,
    origin: &str,
) -> LoadResult<BTreeMap<String, Registry>> {
    parse_records(text, origin, |registry: &mut Registry| &mut registry.prefix)
}

fn parse_records<T, F>(text: &str, origin: &str, prefix_of: F) -> LoadResult<BTreeMap<String, T>>
where
    T: DeserializeOwned,
    F: Fn(&mut T) -> &mut String,
{
    let raw: Map<String, Value> =
        serde_json::from_str(text).map_err(|source| LoadError::Json {
            origin: origin.to_string(),
            source,
        })?;

    let mut records = BTreeMap::new();
    for (key, value) in raw {
        let mut record: T =
            serde_json::from_value(value).map_err(|source| LoadError::InvalidRecord {
                origin: origin.to_string(),
                key: key.clone(),
                source,
            })?;
        let prefix = prefix_of(&mut record);
        if prefix.is_empty() {
            prefix.clone_from(&key);
        } else if *prefix != key {
            return Err(LoadError::PrefixMismatch {
                origin: origin.to_string(),
                key,
                prefix: prefix.clone(),
            });
        }
        records.insert(key, record);
    }
    Ok(records)
}

fn read_source(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl Manager {
    /// Builds a store from the curated sample compiled into the crate.
    pub fn from_bundled() -> LoadResult<Self> {
        let registry = parse_registry_str(BUNDLED_REGISTRY, BUNDLED_ORIGIN)?;
        let metaregistry = parse_metaregistry_str(BUNDLED_METAREGISTRY, BUNDLED_ORIGIN)?;
        Ok(Self::new(registry, metaregistry))
    }

    /// Builds a store from configured files, using the bundled sample for
    /// any side without a configured path.
    pub fn load(config: &StoreConfig) -> LoadResult<Self> {
        let registry = match config.registry_path.as_deref() {
            Some(path) => parse_registry_str(&read_source(path)?, &path.display().to_string())?,
            None => parse_registry_str(BUNDLED_REGISTRY, BUNDLED_ORIGIN)?,
        };
        let metaregistry = match config.metaregistry_path.as_deref() {
            Some(path) => {
                parse_metaregistry_str(&read_source(path)?, &path.display().to_string())?
            }
            None => parse_metaregistry_str(BUNDLED_METAREGISTRY, BUNDLED_ORIGIN)?,
        };
        info!(
            "event=store_loaded module=store resources={} registries={} bundled_registry={} bundled_metaregistry={}",
            registry.len(),
            metaregistry.len(),
            config.registry_path.is_none(),
            config.metaregistry_path.is_none()
        );
        Ok(Self::new(registry, metaregistry))
    }
}
