//! User administration handlers.
//!
//! ```text
//! GET /api/v1/users
//! GET /api/v1/users/{id}
//! PUT /api/v1/users/{id} {"role":"supervisor","teams":[...]}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{delete, get, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Role, TeamId, User, UserId, UserPatch};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};
use crate::inbound::http::{ApiResult, MessageResponse};

/// Account as returned to clients. The password hash never leaves the
/// server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub teams: Vec<TeamId>,
    pub cross_team_access: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            teams: user.teams,
            cross_team_access: user.cross_team_access,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Partial account update. Omitted fields are left untouched.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub teams: Option<Vec<TeamId>>,
    pub cross_team_access: Option<bool>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            role: request.role,
            is_active: request.is_active,
            teams: request.teams,
            cross_team_access: request.cross_team_access,
        }
    }
}

const USER_ID: FieldName = FieldName::new("userId");

/// List every account. Supervisors and managers only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let actor = state.current_user(&session).await?;
    let users = state.users.list(&actor).await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    state.current_user(&session).await?;
    let id = parse_id(&path, USER_ID)?;
    Ok(web::Json(state.users.get(&id).await?.into()))
}

/// Patch an account. Managers only.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let actor = state.current_user(&session).await?;
    let id = parse_id(&path, USER_ID)?;
    let updated = state
        .users
        .update(&actor, &id, payload.into_inner().into())
        .await?;
    Ok(web::Json(updated.into()))
}

/// Delete an account. Managers only; never your own.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete yourself", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let actor = state.current_user(&session).await?;
    let id: UserId = parse_id(&path, USER_ID)?;
    state.users.delete(&actor, &id).await?;
    Ok(web::Json(MessageResponse::new("User deleted")))
}

#[cfg(test)]
mod tests;
