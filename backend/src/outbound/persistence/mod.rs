//! PostgreSQL persistence using Diesel with `diesel-async` and `bb8` pooling.
//!
//! Row structs and the schema stay private to this module; callers see only
//! [`DieselDocumentStore`] through the `DocumentStore` trait.

mod diesel_document_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_document_store::DieselDocumentStore;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
