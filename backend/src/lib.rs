//! Casework backend library.
//!
//! Enforcement case management for council officers: a team-aware
//! visibility policy, the case lifecycle state machine, assignment rules and
//! an append-only audit trail, exposed over HTTP and persisted through a
//! document store.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
