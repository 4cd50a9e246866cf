use std::sync::Arc;

use async_trait::async_trait;

use super::newest_first;
use crate::domain::ports::{AuditRepository, RepositoryError};
use crate::domain::{AccessDecision, AuditLog, CaseId};
use crate::outbound::store::{Collection, DocumentStore, decode_all, encode};

/// Append-only audit trail and access log.
#[derive(Clone)]
pub struct DocumentAuditRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentAuditRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuditRepository for DocumentAuditRepository {
    async fn record(&self, entry: &AuditLog) -> Result<(), RepositoryError> {
        self.store
            .insert(Collection::AuditLogs, *entry.id.as_uuid(), encode(entry)?)
            .await
    }

    async fn list_for_case(&self, case_id: &CaseId) -> Result<Vec<AuditLog>, RepositoryError> {
        let documents = self
            .store
            .list_where(Collection::AuditLogs, "case_id", &case_id.to_string())
            .await?;
        decode_all(newest_first(documents))
    }

    async fn record_access(&self, decision: &AccessDecision) -> Result<(), RepositoryError> {
        self.store
            .insert(Collection::AccessLogs, *decision.id.as_uuid(), encode(decision)?)
            .await
    }

    async fn list_access(&self) -> Result<Vec<AccessDecision>, RepositoryError> {
        decode_all(newest_first(self.store.list(Collection::AccessLogs).await?))
    }
}
