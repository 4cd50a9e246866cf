//! what3words lookups. Failures are reported in-band and never fail the
//! request; case operations do not depend on this service.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::{LocationResolver, ResolvedLocation, SettingsRepository};
use crate::domain::Error;

/// Whether lookups are switched on and backed by a configured service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct LocationStatus {
    pub enabled: bool,
    pub api_available: bool,
}

/// Outcome of a conversion; `error` explains a `success = false` result.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LocationLookup {
    pub success: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub words: Option<String>,
    pub error: Option<String>,
}

impl LocationLookup {
    fn resolved(location: ResolvedLocation) -> Self {
        Self {
            success: true,
            latitude: Some(location.latitude),
            longitude: Some(location.longitude),
            words: Some(location.words),
            error: None,
        }
    }

    fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            latitude: None,
            longitude: None,
            words: None,
            error: Some(reason.into()),
        }
    }
}

/// Strip an optional `///` prefix and check for three dot-separated words.
fn parse_words(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches("///").to_lowercase();
    let parts: Vec<&str> = trimmed.split('.').collect();
    let well_formed = parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(char::is_alphabetic));
    well_formed.then_some(trimmed)
}

#[derive(Clone)]
pub struct LocationService {
    resolver: Arc<dyn LocationResolver>,
    settings: Arc<dyn SettingsRepository>,
}

impl LocationService {
    pub fn new(resolver: Arc<dyn LocationResolver>, settings: Arc<dyn SettingsRepository>) -> Self {
        Self { resolver, settings }
    }

    pub async fn status(&self) -> Result<LocationStatus, Error> {
        let settings = self.settings.load().await?.unwrap_or_default();
        Ok(LocationStatus {
            enabled: settings.enable_what3words,
            api_available: self.resolver.is_configured(),
        })
    }

    /// Reason lookups cannot run right now, if any.
    async fn unavailable_reason(&self) -> Result<Option<&'static str>, Error> {
        let status = self.status().await?;
        Ok(if !status.enabled {
            Some("what3words is disabled in system settings")
        } else if !status.api_available {
            Some("what3words API key is not configured")
        } else {
            None
        })
    }

    pub async fn words_to_coordinates(&self, words: &str) -> Result<LocationLookup, Error> {
        if let Some(reason) = self.unavailable_reason().await? {
            return Ok(LocationLookup::failed(reason));
        }
        let Some(words) = parse_words(words) else {
            return Ok(LocationLookup::failed("Invalid what3words address"));
        };
        Ok(match self.resolver.words_to_coordinates(&words).await {
            Ok(location) => LocationLookup::resolved(location),
            Err(error) => {
                debug!(%error, words, "what3words conversion failed");
                LocationLookup::failed(error.to_string())
            }
        })
    }

    pub async fn coordinates_to_words(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationLookup, Error> {
        if let Some(reason) = self.unavailable_reason().await? {
            return Ok(LocationLookup::failed(reason));
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Ok(LocationLookup::failed("Coordinates are out of range"));
        }
        Ok(match self.resolver.coordinates_to_words(latitude, longitude).await {
            Ok(location) => LocationLookup::resolved(location),
            Err(error) => {
                debug!(%error, latitude, longitude, "what3words reverse lookup failed");
                LocationLookup::failed(error.to_string())
            }
        })
    }
}
