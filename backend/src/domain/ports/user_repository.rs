//! Port for user account persistence.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Fetch a user by normalised email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// All users, oldest first.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Insert or replace a user record.
    async fn save(&self, user: &User) -> Result<(), RepositoryError>;

    /// Remove a user. Returns `false` when no such user existed.
    async fn delete(&self, id: &UserId) -> Result<bool, RepositoryError>;
}
