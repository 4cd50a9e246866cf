use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{RepositoryError, UserRepository};
use crate::domain::{User, UserId};
use crate::outbound::store::{Collection, DocumentStore, decode, decode_all, encode};

#[derive(Clone)]
pub struct DocumentUserRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentUserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for DocumentUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.store
            .get(Collection::Users, *id.as_uuid())
            .await?
            .map(decode)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let mut matches = self.store.list_where(Collection::Users, "email", email).await?;
        matches.pop().map(decode).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        decode_all(self.store.list(Collection::Users).await?)
    }

    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        self.store
            .upsert(Collection::Users, *user.id.as_uuid(), encode(user)?)
            .await
    }

    async fn delete(&self, id: &UserId) -> Result<bool, RepositoryError> {
        self.store.delete(Collection::Users, *id.as_uuid()).await
    }
}
