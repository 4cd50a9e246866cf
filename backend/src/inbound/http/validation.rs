//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidBody,
    InvalidQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidBody => "invalid_body",
            Self::InvalidQuery => "invalid_query",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

/// Parse a path segment into a typed identifier.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value
        .parse()
        .map_err(|_| invalid_uuid_error(field, value))
}

/// Render malformed JSON bodies in the domain error envelope.
pub(crate) fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(error.to_string())
        .with_details(json!({ "code": ErrorCode::InvalidBody.as_str() }))
        .into()
}

/// Render malformed query strings in the domain error envelope.
pub(crate) fn query_error_handler(error: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(error.to_string())
        .with_details(json!({ "code": ErrorCode::InvalidQuery.as_str() }))
        .into()
}
