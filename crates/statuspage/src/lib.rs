//! Statuspage crate: wire types and conditional fetching for a
//! Statuspage-style incidents API.

/// Conditional-request HTTP client
pub mod client;
/// Wire types for the incidents and components resources
pub mod types;

pub use client::{Client, FetchOutcome};
pub use types::{Component, ComponentRef, ComponentsPage, Incident, IncidentUpdate, IncidentsPage};
