use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::SystemSettings;
use crate::domain::ports::{RepositoryError, SettingsRepository};
use crate::outbound::store::{Collection, DocumentStore, decode, encode};

/// The singleton settings document lives at the nil id.
const SETTINGS_ID: Uuid = Uuid::nil();

#[derive(Clone)]
pub struct DocumentSettingsRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentSettingsRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SettingsRepository for DocumentSettingsRepository {
    async fn load(&self) -> Result<Option<SystemSettings>, RepositoryError> {
        self.store
            .get(Collection::SystemSettings, SETTINGS_ID)
            .await?
            .map(decode)
            .transpose()
    }

    async fn store(&self, settings: &SystemSettings) -> Result<(), RepositoryError> {
        self.store
            .upsert(Collection::SystemSettings, SETTINGS_ID, encode(settings)?)
            .await
    }
}
