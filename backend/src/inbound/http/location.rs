//! what3words conversion endpoints. Lookup failures come back in-band as
//! `success: false` rather than as HTTP errors.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, LocationLookup, LocationStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct WordsRequest {
    /// Three-word address, with or without the `///` prefix.
    pub words: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CoordinatesRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[utoipa::path(
    get,
    path = "/api/v1/w3w/status",
    responses(
        (status = 200, description = "Lookup availability", body = LocationStatus),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["location"],
    operation_id = "what3wordsStatus"
)]
#[get("/w3w/status")]
pub async fn status(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<LocationStatus>> {
    state.current_user(&session).await?;
    Ok(web::Json(state.location.status().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/w3w/convert",
    request_body = WordsRequest,
    responses((status = 200, description = "Conversion outcome", body = LocationLookup)),
    tags = ["location"],
    operation_id = "what3wordsToCoordinates"
)]
#[post("/w3w/convert")]
pub async fn words_to_coordinates(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<WordsRequest>,
) -> ApiResult<web::Json<LocationLookup>> {
    state.current_user(&session).await?;
    let lookup = state.location.words_to_coordinates(&payload.words).await?;
    Ok(web::Json(lookup))
}

#[utoipa::path(
    post,
    path = "/api/v1/w3w/reverse",
    request_body = CoordinatesRequest,
    responses((status = 200, description = "Conversion outcome", body = LocationLookup)),
    tags = ["location"],
    operation_id = "coordinatesToWhat3words"
)]
#[post("/w3w/reverse")]
pub async fn coordinates_to_words(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CoordinatesRequest>,
) -> ApiResult<web::Json<LocationLookup>> {
    state.current_user(&session).await?;
    let lookup = state
        .location
        .coordinates_to_words(payload.latitude, payload.longitude)
        .await?;
    Ok(web::Json(lookup))
}
