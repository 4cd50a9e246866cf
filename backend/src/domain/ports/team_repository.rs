//! Port for team persistence.
use async_trait::async_trait;

use crate::domain::{Team, TeamId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, RepositoryError>;

    /// Exact, case-sensitive name match.
    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, RepositoryError>;

    /// All teams, oldest first.
    async fn list(&self) -> Result<Vec<Team>, RepositoryError>;

    /// Insert or replace a team record.
    async fn save(&self, team: &Team) -> Result<(), RepositoryError>;

    /// Remove a team. Returns `false` when no such team existed.
    async fn delete(&self, id: &TeamId) -> Result<bool, RepositoryError>;
}
