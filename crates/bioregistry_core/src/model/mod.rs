//! Record model for the registry and the metaregistry.
//!
//! # Responsibility
//! - Define the two record kinds the store holds: [`resource::Resource`]
//!   (one identifier namespace) and [`registry::Registry`] (one external
//!   catalog of namespaces).
//!
//! # Invariants
//! - Records are plain data; loading, lookup and validation live elsewhere.
//! - Absent optional metadata is `None`, never an empty-string sentinel.

pub mod registry;
pub mod resource;
