//! Team administration handlers and the case-type routing table.
//!
//! ```text
//! GET /api/v1/teams
//! POST /api/v1/teams {"name":"North Enforcement","team_type":"enforcement"}
//! GET|PUT|DELETE /api/v1/teams/{id}
//! GET /api/v1/teams/{id}/members
//! GET /api/v1/case-types/teams
//! ```

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CaseTypeTeams, Error, NewTeam, Team, TeamId, TeamPatch, TeamType};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;
use crate::inbound::http::validation::{FieldName, parse_id};
use crate::inbound::http::{ApiResult, MessageResponse};

const TEAM_ID: FieldName = FieldName::new("teamId");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTeamRequest {
    pub name: String,
    pub team_type: TeamType,
    #[serde(default)]
    pub description: String,
}

impl From<CreateTeamRequest> for NewTeam {
    fn from(request: CreateTeamRequest) -> Self {
        Self {
            name: request.name,
            team_type: request.team_type,
            description: request.description,
        }
    }
}

/// Partial team update. The team type is fixed at creation.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateTeamRequest> for TeamPatch {
    fn from(request: UpdateTeamRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            is_active: request.is_active,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/teams",
    responses(
        (status = 200, description = "Teams", body = [Team]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["teams"],
    operation_id = "listTeams"
)]
#[get("/teams")]
pub async fn list_teams(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Team>>> {
    state.current_user(&session).await?;
    Ok(web::Json(state.teams.list().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 200, description = "Created team", body = Team),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["teams"],
    operation_id = "createTeam"
)]
#[post("/teams")]
pub async fn create_team(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateTeamRequest>,
) -> ApiResult<web::Json<Team>> {
    let actor = state.current_user(&session).await?;
    let team = state
        .teams
        .create(&actor, payload.into_inner().into())
        .await?;
    Ok(web::Json(team))
}

#[utoipa::path(
    get,
    path = "/api/v1/teams/{id}",
    params(("id" = String, Path, description = "Team id")),
    responses(
        (status = 200, description = "Team", body = Team),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["teams"],
    operation_id = "getTeam"
)]
#[get("/teams/{id}")]
pub async fn get_team(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Team>> {
    state.current_user(&session).await?;
    let id: TeamId = parse_id(&path, TEAM_ID)?;
    Ok(web::Json(state.teams.get(&id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/teams/{id}",
    params(("id" = String, Path, description = "Team id")),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Updated team", body = Team),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["teams"],
    operation_id = "updateTeam"
)]
#[put("/teams/{id}")]
pub async fn update_team(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateTeamRequest>,
) -> ApiResult<web::Json<Team>> {
    let actor = state.current_user(&session).await?;
    let id: TeamId = parse_id(&path, TEAM_ID)?;
    let team = state
        .teams
        .update(&actor, &id, payload.into_inner().into())
        .await?;
    Ok(web::Json(team))
}

/// Delete a team. Refused while the team still owns cases.
#[utoipa::path(
    delete,
    path = "/api/v1/teams/{id}",
    params(("id" = String, Path, description = "Team id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Team still owns cases", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["teams"],
    operation_id = "deleteTeam"
)]
#[delete("/teams/{id}")]
pub async fn delete_team(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let actor = state.current_user(&session).await?;
    let id: TeamId = parse_id(&path, TEAM_ID)?;
    state.teams.delete(&actor, &id).await?;
    Ok(web::Json(MessageResponse::new("Team deleted")))
}

#[utoipa::path(
    get,
    path = "/api/v1/teams/{id}/members",
    params(("id" = String, Path, description = "Team id")),
    responses(
        (status = 200, description = "Team members", body = [UserResponse]),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["teams"],
    operation_id = "listTeamMembers"
)]
#[get("/teams/{id}/members")]
pub async fn team_members(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    state.current_user(&session).await?;
    let id: TeamId = parse_id(&path, TEAM_ID)?;
    let members = state.teams.members(&id).await?;
    Ok(web::Json(members.into_iter().map(UserResponse::from).collect()))
}

/// Which teams may own each case type.
#[utoipa::path(
    get,
    path = "/api/v1/case-types/teams",
    responses((status = 200, description = "Case type routing", body = [CaseTypeTeams])),
    tags = ["teams"],
    operation_id = "caseTypeTeams"
)]
#[get("/case-types/teams")]
pub async fn case_type_teams(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CaseTypeTeams>>> {
    state.current_user(&session).await?;
    Ok(web::Json(state.teams.case_type_mapping().await?))
}
