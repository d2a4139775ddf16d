//! Graph serialization of metaregistry records.
//!
//! # Responsibility
//! - Project one [`Registry`] and the resources it maps into an RDF graph.
//!
//! # Invariants
//! - Output is deterministic for the same record and store.
//! - Projection never fails; values that cannot be IRIs become literals.

use crate::model::registry::Registry;
use crate::store::Manager;

mod turtle;

pub use turtle::TurtleProjector;

/// Serializes a metaregistry record as graph text.
pub trait GraphProjector {
    fn to_graph_text(&self, registry: &Registry, manager: &Manager) -> String;
}

/// Turtle projection with the default projector.
pub fn to_graph_text(registry: &Registry, manager: &Manager) -> String {
    TurtleProjector.to_graph_text(registry, manager)
}
