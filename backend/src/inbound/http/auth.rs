//! Authentication and account registration handlers.
//!
//! ```text
//! POST /api/v1/auth/login {"email":"officer@council.gov.uk","password":"..."}
//! POST /api/v1/auth/logout
//! GET /api/v1/auth/me
//! POST /api/v1/auth/register
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{Error, LoginCredentials, LoginValidationError, NewUser, Role, TeamId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;
use crate::inbound::http::{ApiResult, MessageResponse};

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let LoginRequest { email, password } = value;
        let password = Zeroizing::new(password);
        Self::try_from_parts(&email, &password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyEmail => ("email", "empty_email"),
        LoginValidationError::MalformedEmail => ("email", "malformed_email"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Account creation payload for `POST /api/v1/auth/register`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub teams: Vec<TeamId>,
    #[serde(default)]
    pub cross_team_access: bool,
}

impl From<RegisterRequest> for NewUser {
    fn from(request: RegisterRequest) -> Self {
        Self {
            email: request.email,
            password: Zeroizing::new(request.password),
            name: request.name,
            role: request.role,
            teams: request.teams,
            cross_team_access: request.cross_team_access,
        }
    }
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials or disabled account", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user = state.auth.login(&credentials).await?;
    session.persist_user(&user.id)?;
    Ok(web::Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Session cleared", body = MessageResponse)),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> web::Json<MessageResponse> {
    session.clear();
    web::Json(MessageResponse::new("Logged out"))
}

/// The signed-in user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    Ok(web::Json(state.current_user(&session).await?.into()))
}

/// Create an account. Managers only.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Created user", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let actor = state.current_user(&session).await?;
    let created = state
        .users
        .register(&actor, payload.into_inner().into())
        .await?;
    Ok(web::Json(created.into()))
}
