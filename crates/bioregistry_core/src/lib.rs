//! Core domain logic for the bioregistry metaregistry.
//! This crate is the single source of truth for record semantics and
//! consistency rules.

pub mod config;
pub mod export;
pub mod external;
pub mod logging;
pub mod model;
pub mod pattern;
pub mod store;
pub mod uri_format;
pub mod validate;

pub use config::{ConfigError, LintConfig, StoreConfig};
pub use export::{to_graph_text, GraphProjector, TurtleProjector};
pub use external::aligner::{align, Aligner, AlignerRegistry, Alignment};
pub use external::{AlignError, ExternalRecord};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::registry::{Contact, Registry, ResolverType};
pub use model::resource::{ExternalEntry, Provider, Resource};
pub use store::{norm, LoadError, LoadResult, Manager};
pub use validate::{Finding, ValidationIssue, ValidationPolicy, ValidationReport, Validator};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
