//! Reqwest-backed what3words resolver.
//!
//! Only transport concerns live here: query construction, timeouts and
//! mapping the API's error envelope into [`LocationResolverError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::ports::{LocationResolver, LocationResolverError, ResolvedLocation};

pub const DEFAULT_WHAT3WORDS_ENDPOINT: &str = "https://api.what3words.com/v3/";

#[derive(Debug, Deserialize)]
struct CoordinatesDto {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct ConversionDto {
    coordinates: CoordinatesDto,
    words: String,
}

#[derive(Debug, Deserialize)]
struct ErrorDetailDto {
    #[serde(default)]
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelopeDto {
    error: ErrorDetailDto,
}

pub struct What3WordsHttpResolver {
    client: Client,
    endpoint: Url,
    api_key: Option<Zeroizing<String>>,
}

impl What3WordsHttpResolver {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key
                .filter(|key| !key.trim().is_empty())
                .map(Zeroizing::new),
        })
    }

    async fn convert(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ResolvedLocation, LocationResolverError> {
        let key = self.api_key.as_ref().ok_or(LocationResolverError::NotConfigured)?;
        let url = self
            .endpoint
            .join(path)
            .map_err(|error| LocationResolverError::unavailable(error.to_string()))?;
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("key", key.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| LocationResolverError::unavailable(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| LocationResolverError::unavailable(error.to_string()))?;
        parse_conversion(status, body.as_ref())
    }
}

fn parse_conversion(status: StatusCode, body: &[u8]) -> Result<ResolvedLocation, LocationResolverError> {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelopeDto>(body) {
        let ErrorDetailDto { code, message } = envelope.error;
        return Err(if status.is_server_error() {
            LocationResolverError::unavailable(message)
        } else if code.is_empty() {
            LocationResolverError::rejected(message)
        } else {
            LocationResolverError::rejected(format!("{code}: {message}"))
        });
    }
    if !status.is_success() {
        let message = format!("status {}", status.as_u16());
        return Err(if status.is_client_error() {
            LocationResolverError::rejected(message)
        } else {
            LocationResolverError::unavailable(message)
        });
    }
    let decoded: ConversionDto = serde_json::from_slice(body).map_err(|error| {
        LocationResolverError::unavailable(format!("invalid what3words payload: {error}"))
    })?;
    Ok(ResolvedLocation {
        latitude: decoded.coordinates.lat,
        longitude: decoded.coordinates.lng,
        words: decoded.words,
    })
}

#[async_trait]
impl LocationResolver for What3WordsHttpResolver {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn words_to_coordinates(&self, words: &str) -> Result<ResolvedLocation, LocationResolverError> {
        self.convert("convert-to-coordinates", &[("words", words.to_owned())])
            .await
    }

    async fn coordinates_to_words(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ResolvedLocation, LocationResolverError> {
        self.convert(
            "convert-to-3wa",
            &[("coordinates", format!("{latitude},{longitude}"))],
        )
        .await
    }
}
