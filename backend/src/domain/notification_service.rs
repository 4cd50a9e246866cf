//! In-app notifications for the signed-in user.

use std::sync::Arc;

use crate::domain::ports::NotificationRepository;
use crate::domain::{Error, Notification, NotificationId, User};

/// Most recent notifications returned per listing.
pub const NOTIFICATION_PAGE_SIZE: usize = 50;

#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    pub async fn list(&self, user: &User) -> Result<Vec<Notification>, Error> {
        Ok(self
            .notifications
            .list_for_user(&user.id, NOTIFICATION_PAGE_SIZE)
            .await?)
    }

    /// Mark one notification read; another user's id is indistinguishable
    /// from a missing one.
    pub async fn mark_read(&self, user: &User, id: &NotificationId) -> Result<(), Error> {
        if self.notifications.mark_read(&user.id, id).await? {
            Ok(())
        } else {
            Err(Error::not_found("Notification not found"))
        }
    }

    pub async fn mark_all_read(&self, user: &User) -> Result<u64, Error> {
        Ok(self.notifications.mark_all_read(&user.id).await?)
    }
}
