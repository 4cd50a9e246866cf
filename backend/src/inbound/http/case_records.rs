//! Notes, evidence and the audit trail hanging off a case.
//!
//! ```text
//! GET|POST /api/v1/cases/{id}/notes
//! GET|POST /api/v1/cases/{id}/evidence
//! DELETE /api/v1/cases/{id}/evidence/{evidence_id}
//! GET /api/v1/cases/{id}/audit-log
//! ```

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuditLog, CaseId, CaseNote, Error, EvidenceId, EvidenceSummary, NewEvidence};
use crate::inbound::http::cases::CASE_ID;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};
use crate::inbound::http::{ApiResult, MessageResponse};

const EVIDENCE_ID: FieldName = FieldName::new("evidenceId");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateNoteRequest {
    pub content: String,
}

/// Evidence upload. `file_data` carries the file base64 encoded.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UploadEvidenceRequest {
    pub filename: String,
    #[serde(default = "default_file_type")]
    pub file_type: String,
    pub file_data: String,
}

fn default_file_type() -> String {
    "application/octet-stream".to_owned()
}

impl From<UploadEvidenceRequest> for NewEvidence {
    fn from(request: UploadEvidenceRequest) -> Self {
        Self {
            filename: request.filename,
            file_type: request.file_type,
            file_data: request.file_data,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/cases/{id}/notes",
    params(("id" = String, Path, description = "Case id")),
    responses(
        (status = 200, description = "Notes, newest first", body = [CaseNote]),
        (status = 403, description = "Not visible to the caller", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["cases"],
    operation_id = "listCaseNotes"
)]
#[get("/cases/{id}/notes")]
pub async fn list_notes(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<CaseNote>>> {
    let actor = state.current_user(&session).await?;
    let id: CaseId = parse_id(&path, CASE_ID)?;
    Ok(web::Json(state.cases.notes(&actor, &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/cases/{id}/notes",
    params(("id" = String, Path, description = "Case id")),
    request_body = CreateNoteRequest,
    responses(
        (status = 200, description = "Created note", body = CaseNote),
        (status = 400, description = "Empty note", body = Error),
        (status = 403, description = "Not visible to the caller", body = Error)
    ),
    tags = ["cases"],
    operation_id = "addCaseNote"
)]
#[post("/cases/{id}/notes")]
pub async fn add_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreateNoteRequest>,
) -> ApiResult<web::Json<CaseNote>> {
    let actor = state.current_user(&session).await?;
    let id: CaseId = parse_id(&path, CASE_ID)?;
    let note = state
        .cases
        .add_note(&actor, &id, payload.into_inner().content)
        .await?;
    Ok(web::Json(note))
}

/// Evidence metadata; payloads are never listed.
#[utoipa::path(
    get,
    path = "/api/v1/cases/{id}/evidence",
    params(("id" = String, Path, description = "Case id")),
    responses(
        (status = 200, description = "Evidence, newest first", body = [EvidenceSummary]),
        (status = 403, description = "Not visible to the caller", body = Error)
    ),
    tags = ["cases"],
    operation_id = "listCaseEvidence"
)]
#[get("/cases/{id}/evidence")]
pub async fn list_evidence(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<EvidenceSummary>>> {
    let actor = state.current_user(&session).await?;
    let id: CaseId = parse_id(&path, CASE_ID)?;
    Ok(web::Json(state.cases.evidence(&actor, &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/cases/{id}/evidence",
    params(("id" = String, Path, description = "Case id")),
    request_body = UploadEvidenceRequest,
    responses(
        (status = 200, description = "Stored evidence", body = EvidenceSummary),
        (status = 400, description = "Invalid upload", body = Error),
        (status = 403, description = "Not visible to the caller", body = Error)
    ),
    tags = ["cases"],
    operation_id = "uploadCaseEvidence"
)]
#[post("/cases/{id}/evidence")]
pub async fn upload_evidence(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UploadEvidenceRequest>,
) -> ApiResult<web::Json<EvidenceSummary>> {
    let actor = state.current_user(&session).await?;
    let id: CaseId = parse_id(&path, CASE_ID)?;
    let summary = state
        .cases
        .add_evidence(&actor, &id, payload.into_inner().into())
        .await?;
    Ok(web::Json(summary))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cases/{id}/evidence/{evidence_id}",
    params(
        ("id" = String, Path, description = "Case id"),
        ("evidence_id" = String, Path, description = "Evidence id")
    ),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Officers cannot delete evidence", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["cases"],
    operation_id = "deleteCaseEvidence"
)]
#[delete("/cases/{id}/evidence/{evidence_id}")]
pub async fn delete_evidence(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<MessageResponse>> {
    let actor = state.current_user(&session).await?;
    let (case_id, evidence_id) = path.into_inner();
    let case_id: CaseId = parse_id(&case_id, CASE_ID)?;
    let evidence_id: EvidenceId = parse_id(&evidence_id, EVIDENCE_ID)?;
    state
        .cases
        .delete_evidence(&actor, &case_id, &evidence_id)
        .await?;
    Ok(web::Json(MessageResponse::new("Evidence deleted")))
}

#[utoipa::path(
    get,
    path = "/api/v1/cases/{id}/audit-log",
    params(("id" = String, Path, description = "Case id")),
    responses(
        (status = 200, description = "Audit trail, newest first", body = [AuditLog]),
        (status = 403, description = "Not visible to the caller", body = Error)
    ),
    tags = ["cases"],
    operation_id = "caseAuditLog"
)]
#[get("/cases/{id}/audit-log")]
pub async fn audit_log(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<AuditLog>>> {
    let actor = state.current_user(&session).await?;
    let id: CaseId = parse_id(&path, CASE_ID)?;
    Ok(web::Json(state.cases.audit_log(&actor, &id).await?))
}

#[cfg(test)]
mod tests {
    use actix_web::cookie::Cookie;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::Case;
    use crate::inbound::http::test_utils::{login_as, seeded_state, test_app};

    async fn open_case(
        app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
        cookie: Cookie<'static>,
    ) -> Case {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/cases")
                .cookie(cookie)
                .set_json(json!({ "case_type": "littering", "description": "Cans by the bench" }))
                .to_request(),
        )
        .await;
        actix_test::read_body_json(response).await
    }

    #[actix_web::test]
    async fn notes_are_attributed_and_audited() {
        let app = actix_test::init_service(test_app(seeded_state().await)).await;
        let manager = login_as(&app, "admin@council.gov.uk", "admin123").await;
        let case = open_case(&app, manager.clone()).await;

        let note = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/cases/{}/notes", case.id))
                .cookie(manager.clone())
                .set_json(json!({ "content": "Spoke to the shop owner" }))
                .to_request(),
        )
        .await;
        assert_eq!(note.status(), StatusCode::OK);
        let note: CaseNote = actix_test::read_body_json(note).await;
        assert_eq!(note.created_by_name, "System Admin");

        let audit = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/cases/{}/audit-log", case.id))
                .cookie(manager)
                .to_request(),
        )
        .await;
        let entries: Vec<Value> = actix_test::read_body_json(audit).await;
        let actions: Vec<&str> = entries
            .iter()
            .filter_map(|entry| entry.get("action").and_then(Value::as_str))
            .collect();
        assert_eq!(actions, vec!["NOTE_ADDED", "CREATED"]);
    }

    #[actix_web::test]
    async fn blank_notes_are_rejected() {
        let app = actix_test::init_service(test_app(seeded_state().await)).await;
        let manager = login_as(&app, "admin@council.gov.uk", "admin123").await;
        let case = open_case(&app, manager.clone()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/cases/{}/notes", case.id))
                .cookie(manager)
                .set_json(json!({ "content": "   " }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn evidence_lifecycle() {
        let app = actix_test::init_service(test_app(seeded_state().await)).await;
        let supervisor = login_as(&app, "supervisor@council.gov.uk", "super123").await;
        let officer = login_as(&app, "officer@council.gov.uk", "officer123").await;
        let case = open_case(&app, supervisor.clone()).await;

        let uploaded = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/cases/{}/evidence", case.id))
                .cookie(supervisor.clone())
                .set_json(json!({
                    "filename": "photo.jpg",
                    "file_type": "image/jpeg",
                    "file_data": "aGVsbG8="
                }))
                .to_request(),
        )
        .await;
        assert_eq!(uploaded.status(), StatusCode::OK);
        let summary: EvidenceSummary = actix_test::read_body_json(uploaded).await;
        assert_eq!(summary.size_bytes, 5);
        let uri = format!("/api/v1/cases/{}/evidence/{}", case.id, summary.id);

        let refused = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&uri)
                .cookie(officer)
                .to_request(),
        )
        .await;
        assert_eq!(refused.status(), StatusCode::FORBIDDEN);

        let deleted = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&uri)
                .cookie(supervisor.clone())
                .to_request(),
        )
        .await;
        assert_eq!(deleted.status(), StatusCode::OK);
        let body: MessageResponse = actix_test::read_body_json(deleted).await;
        assert_eq!(body.message, "Evidence deleted");

        let listed = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/cases/{}/evidence", case.id))
                .cookie(supervisor)
                .to_request(),
        )
        .await;
        let remaining: Vec<EvidenceSummary> = actix_test::read_body_json(listed).await;
        assert!(remaining.is_empty());
    }

    #[actix_web::test]
    async fn evidence_must_be_base64() {
        let app = actix_test::init_service(test_app(seeded_state().await)).await;
        let manager = login_as(&app, "admin@council.gov.uk", "admin123").await;
        let case = open_case(&app, manager.clone()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/cases/{}/evidence", case.id))
                .cookie(manager)
                .set_json(json!({ "filename": "x.bin", "file_data": "%%%" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
