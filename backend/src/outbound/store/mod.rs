//! Collection-addressed JSON document storage.
//!
//! Repositories serialise domain records into documents and keep no state of
//! their own. Two backends exist: [`InMemoryDocumentStore`] for development
//! and tests, and the PostgreSQL store in `persistence`.
//!
//! Every document carries a store-managed revision starting at 1. Replacing
//! a document requires the caller to name the revision it read; a mismatch
//! fails with [`RepositoryError::RevisionMismatch`].

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::RepositoryError;

pub use memory::InMemoryDocumentStore;

/// Named document collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Users,
    Teams,
    Cases,
    CaseNotes,
    Evidence,
    AuditLogs,
    AccessLogs,
    Notifications,
    SystemSettings,
}

impl Collection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Teams => "teams",
            Self::Cases => "cases",
            Self::CaseNotes => "case_notes",
            Self::Evidence => "evidence",
            Self::AuditLogs => "audit_logs",
            Self::AccessLogs => "access_logs",
            Self::Notifications => "notifications",
            Self::SystemSettings => "system_settings",
        }
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub body: Value,
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, RepositoryError>;

    /// All documents in insertion order.
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, RepositoryError>;

    /// Documents whose top-level string `field` equals `value`, in insertion
    /// order.
    async fn list_where(
        &self,
        collection: Collection,
        field: &'static str,
        value: &str,
    ) -> Result<Vec<Document>, RepositoryError>;

    async fn count(&self, collection: Collection) -> Result<u64, RepositoryError>;

    /// Add a new document at revision 1. Fails if the id is taken.
    async fn insert(&self, collection: Collection, id: Uuid, body: Value) -> Result<(), RepositoryError>;

    /// Insert or overwrite without a revision check, bumping the revision.
    async fn upsert(&self, collection: Collection, id: Uuid, body: Value) -> Result<(), RepositoryError>;

    /// Overwrite a document only if its revision still equals `expected`.
    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        body: Value,
        expected: u64,
    ) -> Result<(), RepositoryError>;

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, RepositoryError>;
}

pub(crate) fn encode<T: Serialize>(record: &T) -> Result<Value, RepositoryError> {
    serde_json::to_value(record).map_err(|error| RepositoryError::serialization(error.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(document: Document) -> Result<T, RepositoryError> {
    let id = document.id;
    serde_json::from_value(document.body)
        .map_err(|error| RepositoryError::serialization(format!("document {id}: {error}")))
}

pub(crate) fn decode_all<T: DeserializeOwned>(
    documents: Vec<Document>,
) -> Result<Vec<T>, RepositoryError> {
    documents.into_iter().map(decode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
    }

    fn document(body: Value) -> Document {
        Document {
            id: Uuid::new_v4(),
            body,
            revision: 1,
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    fn decode_reports_the_document_id() {
        let doc = document(serde_json::json!({ "name": 7 }));
        let id = doc.id;
        let error = decode::<Sample>(doc).expect_err("wrong type");
        assert!(matches!(error, RepositoryError::Serialization { .. }));
        assert!(error.to_string().contains(&id.to_string()));
    }
}
