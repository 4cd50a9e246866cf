//! Ports for case notes and evidence.
use async_trait::async_trait;

use crate::domain::{CaseId, CaseNote, Evidence, EvidenceId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaseNoteRepository: Send + Sync {
    async fn add(&self, note: &CaseNote) -> Result<(), RepositoryError>;

    /// Notes for a case, newest first.
    async fn list_for_case(&self, case_id: &CaseId) -> Result<Vec<CaseNote>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EvidenceRepository: Send + Sync {
    async fn add(&self, evidence: &Evidence) -> Result<(), RepositoryError>;

    /// Evidence for a case, newest first.
    async fn list_for_case(&self, case_id: &CaseId) -> Result<Vec<Evidence>, RepositoryError>;

    /// Remove one evidence item of a case. Returns `false` when absent.
    async fn delete(&self, case_id: &CaseId, id: &EvidenceId) -> Result<bool, RepositoryError>;
}
