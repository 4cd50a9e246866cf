//! Port for the singleton system settings record.
use async_trait::async_trait;

use crate::domain::SystemSettings;

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Stored settings, or `None` before the first save.
    async fn load(&self) -> Result<Option<SystemSettings>, RepositoryError>;

    async fn store(&self, settings: &SystemSettings) -> Result<(), RepositoryError>;
}
