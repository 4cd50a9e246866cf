use std::sync::Arc;

use async_trait::async_trait;

use super::newest_first;
use crate::domain::ports::{NotificationRepository, RepositoryError};
use crate::domain::{Notification, NotificationId, UserId};
use crate::outbound::store::{Collection, DocumentStore, decode, decode_all, encode};

#[derive(Clone)]
pub struct DocumentNotificationRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentNotificationRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn for_user(&self, user_id: &UserId) -> Result<Vec<Notification>, RepositoryError> {
        let documents = self
            .store
            .list_where(Collection::Notifications, "user_id", &user_id.to_string())
            .await?;
        decode_all(newest_first(documents))
    }

    async fn store_read(&self, mut notification: Notification) -> Result<(), RepositoryError> {
        notification.is_read = true;
        self.store
            .upsert(
                Collection::Notifications,
                *notification.id.as_uuid(),
                encode(&notification)?,
            )
            .await
    }
}

#[async_trait]
impl NotificationRepository for DocumentNotificationRepository {
    async fn add(&self, notification: &Notification) -> Result<(), RepositoryError> {
        self.store
            .insert(
                Collection::Notifications,
                *notification.id.as_uuid(),
                encode(notification)?,
            )
            .await
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let mut notifications = self.for_user(user_id).await?;
        notifications.truncate(limit);
        Ok(notifications)
    }

    async fn mark_read(&self, user_id: &UserId, id: &NotificationId) -> Result<bool, RepositoryError> {
        let Some(document) = self.store.get(Collection::Notifications, *id.as_uuid()).await? else {
            return Ok(false);
        };
        let notification: Notification = decode(document)?;
        if notification.user_id != *user_id {
            return Ok(false);
        }
        self.store_read(notification).await?;
        Ok(true)
    }

    async fn mark_all_read(&self, user_id: &UserId) -> Result<u64, RepositoryError> {
        let mut marked = 0;
        for notification in self.for_user(user_id).await? {
            if !notification.is_read {
                self.store_read(notification).await?;
                marked += 1;
            }
        }
        Ok(marked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::fixed_now;
    use crate::outbound::store::InMemoryDocumentStore;

    #[tokio::test]
    async fn users_only_touch_their_own_notifications() {
        let repo = DocumentNotificationRepository::new(Arc::new(InMemoryDocumentStore::default()));
        let owner = UserId::random();
        let other = UserId::random();
        let first = Notification::new(owner, "Case Assigned", "one", None, fixed_now());
        let second = Notification::new(owner, "Case Assigned", "two", None, fixed_now());
        repo.add(&first).await.expect("add");
        repo.add(&second).await.expect("add");

        assert!(!repo.mark_read(&other, &first.id).await.expect("mark"));
        assert!(repo.mark_read(&owner, &first.id).await.expect("mark"));
        assert_eq!(repo.mark_all_read(&owner).await.expect("mark all"), 1);

        let listed = repo.list_for_user(&owner, 1).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.first().map(|n| n.message.as_str()), Some("two"));
        assert!(listed.iter().all(|n| n.is_read));
    }
}
