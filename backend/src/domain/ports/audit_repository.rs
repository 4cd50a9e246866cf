//! Port for the case audit trail and the access log.
use async_trait::async_trait;

use crate::domain::{AccessDecision, AuditLog, CaseId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record(&self, entry: &AuditLog) -> Result<(), RepositoryError>;

    /// Audit entries for a case, newest first.
    async fn list_for_case(&self, case_id: &CaseId) -> Result<Vec<AuditLog>, RepositoryError>;

    async fn record_access(&self, decision: &AccessDecision) -> Result<(), RepositoryError>;

    /// Access decisions, newest first.
    async fn list_access(&self) -> Result<Vec<AccessDecision>, RepositoryError>;
}
