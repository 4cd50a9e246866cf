//! Case documents. The store revision is authoritative and copied onto the
//! decoded record.

use std::sync::Arc;

use async_trait::async_trait;

use super::newest_first;
use crate::domain::ports::{CaseRepository, RepositoryError};
use crate::domain::{Case, CaseId};
use crate::outbound::store::{Collection, Document, DocumentStore, decode, encode};

#[derive(Clone)]
pub struct DocumentCaseRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentCaseRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

fn decode_case(document: Document) -> Result<Case, RepositoryError> {
    let revision = document.revision;
    let mut case: Case = decode(document)?;
    case.revision = revision;
    Ok(case)
}

#[async_trait]
impl CaseRepository for DocumentCaseRepository {
    async fn find_by_id(&self, id: &CaseId) -> Result<Option<Case>, RepositoryError> {
        self.store
            .get(Collection::Cases, *id.as_uuid())
            .await?
            .map(decode_case)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Case>, RepositoryError> {
        let documents = self.store.list(Collection::Cases).await?;
        newest_first(documents).into_iter().map(decode_case).collect()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        self.store.count(Collection::Cases).await
    }

    async fn insert(&self, case: &Case) -> Result<(), RepositoryError> {
        self.store
            .insert(Collection::Cases, *case.id.as_uuid(), encode(case)?)
            .await
    }

    async fn update(&self, case: &Case, expected_revision: u64) -> Result<(), RepositoryError> {
        self.store
            .replace(
                Collection::Cases,
                *case.id.as_uuid(),
                encode(case)?,
                expected_revision,
            )
            .await
    }
}
