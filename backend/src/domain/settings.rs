//! Runtime system settings stored alongside case data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Default map viewport for the case map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MapSettings {
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub default_zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_latitude: 51.5074,
            default_longitude: -0.1278,
            default_zoom: 12,
        }
    }
}

/// Roughly seven years, the usual retention period for enforcement records.
pub const DEFAULT_RETENTION_DAYS: u32 = 2555;

/// Organisation-wide settings. A single record exists per deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SystemSettings {
    pub app_title: String,
    pub organisation_name: String,
    pub organisation_address: String,
    pub contact_email: String,
    pub map_settings: MapSettings,
    pub case_retention_days: u32,
    pub default_working_area_postcode: String,
    pub enable_what3words: bool,
    pub enable_public_reporting: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<UserId>,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            app_title: "Casework".to_owned(),
            organisation_name: "Local Council".to_owned(),
            organisation_address: String::new(),
            contact_email: String::new(),
            map_settings: MapSettings::default(),
            case_retention_days: DEFAULT_RETENTION_DAYS,
            default_working_area_postcode: String::new(),
            enable_what3words: true,
            enable_public_reporting: true,
            updated_at: None,
            updated_by: None,
        }
    }
}

/// Partial settings update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct SettingsPatch {
    pub app_title: Option<String>,
    pub organisation_name: Option<String>,
    pub organisation_address: Option<String>,
    pub contact_email: Option<String>,
    pub map_settings: Option<MapSettings>,
    pub case_retention_days: Option<u32>,
    pub default_working_area_postcode: Option<String>,
    pub enable_what3words: Option<bool>,
    pub enable_public_reporting: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl SystemSettings {
    /// Overlay `patch` and stamp the updater.
    pub fn apply(&mut self, patch: SettingsPatch, by: UserId, at: DateTime<Utc>) {
        let SettingsPatch {
            app_title,
            organisation_name,
            organisation_address,
            contact_email,
            map_settings,
            case_retention_days,
            default_working_area_postcode,
            enable_what3words,
            enable_public_reporting,
        } = patch;
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = $field { self.$field = value; })*
            };
        }
        overlay!(
            app_title,
            organisation_name,
            organisation_address,
            contact_email,
            map_settings,
            case_retention_days,
            default_working_area_postcode,
            enable_what3words,
            enable_public_reporting,
        );
        self.updated_at = Some(at);
        self.updated_by = Some(by);
    }
}
