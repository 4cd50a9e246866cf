use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{RepositoryError, TeamRepository};
use crate::domain::{Team, TeamId};
use crate::outbound::store::{Collection, DocumentStore, decode, decode_all, encode};

#[derive(Clone)]
pub struct DocumentTeamRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentTeamRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TeamRepository for DocumentTeamRepository {
    async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, RepositoryError> {
        self.store
            .get(Collection::Teams, *id.as_uuid())
            .await?
            .map(decode)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, RepositoryError> {
        let mut matches = self.store.list_where(Collection::Teams, "name", name).await?;
        matches.pop().map(decode).transpose()
    }

    async fn list(&self) -> Result<Vec<Team>, RepositoryError> {
        decode_all(self.store.list(Collection::Teams).await?)
    }

    async fn save(&self, team: &Team) -> Result<(), RepositoryError> {
        self.store
            .upsert(Collection::Teams, *team.id.as_uuid(), encode(team)?)
            .await
    }

    async fn delete(&self, id: &TeamId) -> Result<bool, RepositoryError> {
        self.store.delete(Collection::Teams, *id.as_uuid()).await
    }
}
