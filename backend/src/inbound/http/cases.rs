//! Case handlers: creation, listing, the update contract, relocation and
//! self-assignment.
//!
//! ```text
//! POST /api/v1/cases {"case_type":"fly_tipping","description":"..."}
//! GET /api/v1/cases?status=new&unassigned=true
//! GET|PUT /api/v1/cases/{id}
//! PUT /api/v1/cases/{id}/location
//! POST /api/v1/cases/{id}/self-assign
//! ```

use actix_web::{get, post, put, web};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    AssigneeChange, Case, CaseFilter, CaseId, CaseStatus, CaseType, CaseUpdate, ClosureReason,
    Error, FpnDetails, Location, NewCase, ReportingSource, TeamId, TypeSpecificFields,
    TypeSpecificFieldsWire, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

pub(crate) const CASE_ID: FieldName = FieldName::new("caseId");

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCaseRequest {
    pub case_type: CaseType,
    pub description: String,
    #[serde(default)]
    pub location: Location,
    pub reporter_name: Option<String>,
    pub reporter_contact: Option<String>,
    #[serde(default)]
    #[schema(value_type = TypeSpecificFieldsWire)]
    pub type_specific_fields: TypeSpecificFields,
    #[serde(default)]
    pub reporting_source: ReportingSource,
    pub owning_team: Option<TeamId>,
}

impl From<CreateCaseRequest> for NewCase {
    fn from(request: CreateCaseRequest) -> Self {
        Self {
            case_type: request.case_type,
            description: request.description,
            location: request.location,
            reporter_name: request.reporter_name,
            reporter_contact: request.reporter_contact,
            type_specific_fields: request.type_specific_fields,
            reporting_source: request.reporting_source,
            owning_team: request.owning_team,
        }
    }
}

/// Partial case update.
///
/// `assigned_to: null` clears the assignee; omitting the field leaves it
/// untouched.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateCaseRequest {
    pub description: Option<String>,
    pub status: Option<CaseStatus>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, nullable)]
    pub assigned_to: Option<Option<UserId>>,
    pub location: Option<Location>,
    #[schema(value_type = Option<TypeSpecificFieldsWire>)]
    pub type_specific_fields: Option<TypeSpecificFields>,
    pub owning_team: Option<TeamId>,
    pub closure_reason: Option<ClosureReason>,
    pub final_note: Option<String>,
    pub fpn_details: Option<FpnDetails>,
}

impl From<UpdateCaseRequest> for CaseUpdate {
    fn from(request: UpdateCaseRequest) -> Self {
        Self {
            description: request.description,
            status: request.status,
            assignee: request.assigned_to.map(|assignee| {
                assignee.map_or(AssigneeChange::Clear, AssigneeChange::Assign)
            }),
            location: request.location,
            type_specific_fields: request.type_specific_fields,
            owning_team: request.owning_team,
            closure_reason: request.closure_reason,
            final_note: request.final_note,
            fpn_details: request.fpn_details,
        }
    }
}

/// List filters for `GET /api/v1/cases`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CaseListQuery {
    pub status: Option<CaseStatus>,
    pub case_type: Option<CaseType>,
    #[param(value_type = Option<String>)]
    pub assigned_to: Option<UserId>,
    /// Only cases without an assignee.
    #[serde(default)]
    pub unassigned: bool,
    #[param(value_type = Option<String>)]
    pub team_id: Option<TeamId>,
}

impl From<CaseListQuery> for CaseFilter {
    fn from(query: CaseListQuery) -> Self {
        Self {
            status: query.status,
            case_type: query.case_type,
            assigned_to: query.assigned_to,
            unassigned: query.unassigned,
            team_id: query.team_id,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 200, description = "Created case", body = Case),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["cases"],
    operation_id = "createCase"
)]
#[post("/cases")]
pub async fn create_case(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateCaseRequest>,
) -> ApiResult<web::Json<Case>> {
    let actor = state.current_user(&session).await?;
    let case = state
        .cases
        .create(&actor, payload.into_inner().into())
        .await?;
    Ok(web::Json(case))
}

/// Cases the caller may see, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/cases",
    params(CaseListQuery),
    responses(
        (status = 200, description = "Visible cases", body = [Case]),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["cases"],
    operation_id = "listCases"
)]
#[get("/cases")]
pub async fn list_cases(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CaseListQuery>,
) -> ApiResult<web::Json<Vec<Case>>> {
    let actor = state.current_user(&session).await?;
    let filter = CaseFilter::from(query.into_inner());
    Ok(web::Json(state.cases.list(&actor, &filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/cases/{id}",
    params(("id" = String, Path, description = "Case id")),
    responses(
        (status = 200, description = "Case", body = Case),
        (status = 403, description = "Not visible to the caller", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["cases"],
    operation_id = "getCase"
)]
#[get("/cases/{id}")]
pub async fn get_case(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Case>> {
    let actor = state.current_user(&session).await?;
    let id: CaseId = parse_id(&path, CASE_ID)?;
    Ok(web::Json(state.cases.get(&actor, &id).await?))
}

/// Apply a partial update under the lifecycle rules.
#[utoipa::path(
    put,
    path = "/api/v1/cases/{id}",
    params(("id" = String, Path, description = "Case id")),
    request_body = UpdateCaseRequest,
    responses(
        (status = 200, description = "Updated case", body = Case),
        (status = 400, description = "Invalid update", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Concurrent modification", body = Error)
    ),
    tags = ["cases"],
    operation_id = "updateCase"
)]
#[put("/cases/{id}")]
pub async fn update_case(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateCaseRequest>,
) -> ApiResult<web::Json<Case>> {
    let actor = state.current_user(&session).await?;
    let id: CaseId = parse_id(&path, CASE_ID)?;
    let case = state
        .cases
        .update(&actor, &id, payload.into_inner().into())
        .await?;
    Ok(web::Json(case))
}

/// Move the case pin; the previous location is kept in the history.
#[utoipa::path(
    put,
    path = "/api/v1/cases/{id}/location",
    params(("id" = String, Path, description = "Case id")),
    request_body = Location,
    responses(
        (status = 200, description = "Relocated case", body = Case),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["cases"],
    operation_id = "relocateCase"
)]
#[put("/cases/{id}/location")]
pub async fn relocate_case(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<Location>,
) -> ApiResult<web::Json<Case>> {
    let actor = state.current_user(&session).await?;
    let id: CaseId = parse_id(&path, CASE_ID)?;
    let case = state
        .cases
        .relocate(&actor, &id, payload.into_inner())
        .await?;
    Ok(web::Json(case))
}

#[utoipa::path(
    post,
    path = "/api/v1/cases/{id}/self-assign",
    params(("id" = String, Path, description = "Case id")),
    responses(
        (status = 200, description = "Claimed case", body = Case),
        (status = 400, description = "Already assigned or closed", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["cases"],
    operation_id = "selfAssignCase"
)]
#[post("/cases/{id}/self-assign")]
pub async fn self_assign_case(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Case>> {
    let actor = state.current_user(&session).await?;
    let id: CaseId = parse_id(&path, CASE_ID)?;
    Ok(web::Json(state.cases.self_assign(&actor, &id).await?))
}

#[cfg(test)]
#[path = "cases_tests.rs"]
mod tests;
