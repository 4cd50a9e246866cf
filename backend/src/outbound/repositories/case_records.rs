use std::sync::Arc;

use async_trait::async_trait;

use super::newest_first;
use crate::domain::ports::{CaseNoteRepository, EvidenceRepository, RepositoryError};
use crate::domain::{CaseId, CaseNote, Evidence, EvidenceId};
use crate::outbound::store::{Collection, DocumentStore, decode, decode_all, encode};

#[derive(Clone)]
pub struct DocumentCaseNoteRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentCaseNoteRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CaseNoteRepository for DocumentCaseNoteRepository {
    async fn add(&self, note: &CaseNote) -> Result<(), RepositoryError> {
        self.store
            .insert(Collection::CaseNotes, *note.id.as_uuid(), encode(note)?)
            .await
    }

    async fn list_for_case(&self, case_id: &CaseId) -> Result<Vec<CaseNote>, RepositoryError> {
        let documents = self
            .store
            .list_where(Collection::CaseNotes, "case_id", &case_id.to_string())
            .await?;
        decode_all(newest_first(documents))
    }
}

#[derive(Clone)]
pub struct DocumentEvidenceRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentEvidenceRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EvidenceRepository for DocumentEvidenceRepository {
    async fn add(&self, evidence: &Evidence) -> Result<(), RepositoryError> {
        self.store
            .insert(Collection::Evidence, *evidence.id.as_uuid(), encode(evidence)?)
            .await
    }

    async fn list_for_case(&self, case_id: &CaseId) -> Result<Vec<Evidence>, RepositoryError> {
        let documents = self
            .store
            .list_where(Collection::Evidence, "case_id", &case_id.to_string())
            .await?;
        decode_all(newest_first(documents))
    }

    async fn delete(&self, case_id: &CaseId, id: &EvidenceId) -> Result<bool, RepositoryError> {
        let Some(document) = self.store.get(Collection::Evidence, *id.as_uuid()).await? else {
            return Ok(false);
        };
        let evidence: Evidence = decode(document)?;
        if evidence.case_id != *case_id {
            return Ok(false);
        }
        self.store.delete(Collection::Evidence, *id.as_uuid()).await
    }
}
