//! Port for what3words style location resolution.
use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::define_port_error;

define_port_error! {
    /// Failures raised by location resolution adapters.
    pub enum LocationResolverError {
        /// No API credentials are configured.
        NotConfigured => "location service is not configured",
        /// The upstream service could not be reached or timed out.
        Unavailable { message: String } => "location service unavailable: {message}",
        /// The upstream service refused the request.
        Rejected { message: String } => "location service rejected the request: {message}",
    }
}

/// A resolved point with its three-word address.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub words: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Whether the adapter has the credentials it needs.
    fn is_configured(&self) -> bool;

    /// Resolve a `word.word.word` address to coordinates.
    async fn words_to_coordinates(&self, words: &str) -> Result<ResolvedLocation, LocationResolverError>;

    /// Resolve coordinates to the nearest three-word address.
    async fn coordinates_to_words(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ResolvedLocation, LocationResolverError>;
}
