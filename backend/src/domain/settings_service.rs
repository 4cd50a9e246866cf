//! Organisation-wide runtime settings.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::SettingsRepository;
use crate::domain::{
    AuditEmitter, Error, MapSettings, Resource, SettingsPatch, SystemSettings, User,
};

fn centre_in_range(map: &MapSettings) -> bool {
    (-90.0..=90.0).contains(&map.default_latitude)
        && (-180.0..=180.0).contains(&map.default_longitude)
}

#[derive(Clone)]
pub struct SettingsService {
    settings: Arc<dyn SettingsRepository>,
    emitter: AuditEmitter,
}

impl SettingsService {
    pub fn new(settings: Arc<dyn SettingsRepository>, emitter: AuditEmitter) -> Self {
        Self { settings, emitter }
    }

    /// Stored settings, or the defaults when none were ever saved.
    pub async fn get(&self) -> Result<SystemSettings, Error> {
        Ok(self.settings.load().await?.unwrap_or_default())
    }

    /// Overlay a partial update. Managers only.
    pub async fn update(&self, actor: &User, patch: SettingsPatch) -> Result<SystemSettings, Error> {
        self.emitter
            .ensure(
                actor.role.is_manager(),
                actor,
                Resource::SystemSettings,
                "update",
                "Only managers can update settings",
            )
            .await?;
        if patch.map_settings.as_ref().is_some_and(|map| !centre_in_range(map)) {
            return Err(Error::invalid_request("map_settings coordinates are out of range"));
        }
        let mut settings = self.get().await?;
        settings.apply(patch, actor.id, self.emitter.now());
        self.settings.store(&settings).await?;
        self.emitter
            .allow(
                actor,
                Resource::SystemSettings,
                "update",
                "Manager updated settings",
            )
            .await?;
        info!(user_id = %actor.id, "system settings updated");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockAuditRepository, MockNotificationRepository, MockSettingsRepository,
    };
    use crate::domain::test_support::{fixed_now, fixture_clock, user};
    use crate::domain::{ErrorCode, Role};

    fn service(settings: MockSettingsRepository, audit: MockAuditRepository) -> SettingsService {
        SettingsService::new(
            Arc::new(settings),
            AuditEmitter::new(
                Arc::new(audit),
                Arc::new(MockNotificationRepository::new()),
                fixture_clock(),
            ),
        )
    }

    #[tokio::test]
    async fn unset_settings_fall_back_to_defaults() {
        let mut repo = MockSettingsRepository::new();
        repo.expect_load().return_once(|| Ok(None));
        let settings = service(repo, MockAuditRepository::new())
            .get()
            .await
            .expect("settings");
        assert_eq!(settings, SystemSettings::default());
    }

    #[tokio::test]
    async fn managers_update_and_are_stamped() {
        let manager = user(Role::Manager);
        let manager_id = manager.id;
        let mut repo = MockSettingsRepository::new();
        repo.expect_load().return_once(|| Ok(None));
        repo.expect_store()
            .withf(|stored| !stored.enable_public_reporting)
            .times(1)
            .return_once(|_| Ok(()));
        let mut audit = MockAuditRepository::new();
        audit
            .expect_record_access()
            .withf(|decision| decision.allowed && decision.resource == "system_settings")
            .return_once(|_| Ok(()));

        let updated = service(repo, audit)
            .update(
                &manager,
                SettingsPatch {
                    enable_public_reporting: Some(false),
                    ..SettingsPatch::default()
                },
            )
            .await
            .expect("updated");
        assert_eq!(updated.updated_by, Some(manager_id));
        assert_eq!(updated.updated_at, Some(fixed_now()));
        assert_eq!(updated.app_title, "Casework");
    }

    #[tokio::test]
    async fn supervisors_cannot_update() {
        let mut audit = MockAuditRepository::new();
        audit.expect_record_access().return_once(|_| Ok(()));
        let mut repo = MockSettingsRepository::new();
        repo.expect_store().never();
        let error = service(repo, audit)
            .update(&user(Role::Supervisor), SettingsPatch::default())
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn out_of_range_map_centre_is_rejected() {
        let error = service(MockSettingsRepository::new(), MockAuditRepository::new())
            .update(
                &user(Role::Manager),
                SettingsPatch {
                    map_settings: Some(MapSettings {
                        default_latitude: 123.0,
                        ..MapSettings::default()
                    }),
                    ..SettingsPatch::default()
                },
            )
            .await
            .expect_err("invalid");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
