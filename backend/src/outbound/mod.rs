//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **store**: collection-addressed JSON documents (in-memory backend)
//! - **persistence**: PostgreSQL document store using Diesel
//! - **repositories**: domain repository ports over any document store
//! - **credentials**: bcrypt password hashes
//! - **what3words**: HTTP location resolver
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod credentials;
pub mod persistence;
pub mod repositories;
pub mod store;
pub mod what3words;
