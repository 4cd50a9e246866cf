//! Anonymous public report submission.
//!
//! ```text
//! POST /api/v1/public/report {"case_type":"fly_tipping","description":"...","evidence_files":["<base64>"]}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CaseId, CaseType, Error, Location, PublicReport, TypeSpecificFields, TypeSpecificFieldsWire,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PublicReportRequest {
    pub case_type: CaseType,
    pub description: String,
    #[serde(default)]
    pub location: Location,
    pub reporter_name: Option<String>,
    pub reporter_contact: Option<String>,
    #[serde(default)]
    #[schema(value_type = TypeSpecificFieldsWire)]
    pub type_specific_fields: TypeSpecificFields,
    /// Base64 encoded photos.
    #[serde(default)]
    pub evidence_files: Vec<String>,
}

impl From<PublicReportRequest> for PublicReport {
    fn from(request: PublicReportRequest) -> Self {
        Self {
            case_type: request.case_type,
            description: request.description,
            location: request.location,
            reporter_name: request.reporter_name,
            reporter_contact: request.reporter_contact,
            type_specific_fields: request.type_specific_fields,
            evidence_files: request.evidence_files,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PublicReportResponse {
    pub message: String,
    pub reference_number: String,
    pub case_id: CaseId,
}

/// Submit a report without signing in. Refused when public reporting is
/// switched off in the system settings.
#[utoipa::path(
    post,
    path = "/api/v1/public/report",
    request_body = PublicReportRequest,
    responses(
        (status = 200, description = "Report accepted", body = PublicReportResponse),
        (status = 400, description = "Invalid report", body = Error),
        (status = 403, description = "Public reporting disabled", body = Error)
    ),
    tags = ["public"],
    operation_id = "submitPublicReport",
    security([])
)]
#[post("/public/report")]
pub async fn submit_report(
    state: web::Data<HttpState>,
    payload: web::Json<PublicReportRequest>,
) -> ApiResult<web::Json<PublicReportResponse>> {
    let receipt = state
        .cases
        .submit_public_report(payload.into_inner().into())
        .await?;
    Ok(web::Json(PublicReportResponse {
        message: "Report submitted successfully".to_owned(),
        reference_number: receipt.reference_number,
        case_id: receipt.case_id,
    }))
}
