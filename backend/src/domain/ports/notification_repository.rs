//! Port for user notifications.
use async_trait::async_trait;

use crate::domain::{Notification, NotificationId, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn add(&self, notification: &Notification) -> Result<(), RepositoryError>;

    /// The user's notifications, newest first, at most `limit`.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Notification>, RepositoryError>;

    /// Mark one of the user's notifications read. Returns `false` if the user
    /// has no notification with that id.
    async fn mark_read(&self, user_id: &UserId, id: &NotificationId) -> Result<bool, RepositoryError>;

    /// Mark every unread notification of the user read; returns how many.
    async fn mark_all_read(&self, user_id: &UserId) -> Result<u64, RepositoryError>;
}
