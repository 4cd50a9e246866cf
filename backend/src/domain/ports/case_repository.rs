//! Port for case persistence.
//!
//! Writes are guarded by the case `revision`: a write only lands if the stored
//! revision still equals the one the caller read. This closes the window
//! between a state machine guard and the write, e.g. two officers claiming
//! the same unassigned case.

use async_trait::async_trait;

use crate::domain::{Case, CaseId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaseRepository: Send + Sync {
    async fn find_by_id(&self, id: &CaseId) -> Result<Option<Case>, RepositoryError>;

    /// All cases, newest first.
    async fn list(&self) -> Result<Vec<Case>, RepositoryError>;

    /// Number of stored cases across all types.
    async fn count(&self) -> Result<u64, RepositoryError>;

    /// Store a new case at its current revision.
    async fn insert(&self, case: &Case) -> Result<(), RepositoryError>;

    /// Replace a case if the stored revision equals `expected_revision`.
    ///
    /// # Errors
    /// [`RepositoryError::RevisionMismatch`] when another write landed first.
    async fn update(&self, case: &Case, expected_revision: u64) -> Result<(), RepositoryError>;
}
