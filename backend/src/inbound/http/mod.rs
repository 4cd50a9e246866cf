//! HTTP inbound adapter exposing the REST API under `/api/v1`.
//!
//! Handlers stay thin: resolve the session user, parse path ids, call one
//! domain service and serialise its result. Authorisation lives in the
//! domain services.

pub mod auth;
pub mod case_records;
pub mod cases;
pub mod error;
pub mod health;
pub mod location;
pub mod notifications;
pub mod public;
pub mod session;
pub mod session_config;
pub mod settings;
pub mod state;
pub mod stats;
pub mod teams;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use error::ApiResult;

/// Upper bound for JSON bodies; evidence arrives base64 encoded inline.
pub const JSON_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Register every API handler on `cfg`. Mount under `/api/v1`.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_BODY_LIMIT)
            .error_handler(validation::json_error_handler),
    )
    .app_data(web::QueryConfig::default().error_handler(validation::query_error_handler))
    .service(auth::login)
    .service(auth::logout)
    .service(auth::current_user)
    .service(auth::register)
    .service(users::list_users)
    .service(users::get_user)
    .service(users::update_user)
    .service(users::delete_user)
    .service(teams::list_teams)
    .service(teams::create_team)
    .service(teams::get_team)
    .service(teams::update_team)
    .service(teams::delete_team)
    .service(teams::team_members)
    .service(teams::case_type_teams)
    .service(cases::create_case)
    .service(cases::list_cases)
    .service(cases::get_case)
    .service(cases::update_case)
    .service(cases::relocate_case)
    .service(cases::self_assign_case)
    .service(case_records::list_notes)
    .service(case_records::add_note)
    .service(case_records::list_evidence)
    .service(case_records::upload_evidence)
    .service(case_records::delete_evidence)
    .service(case_records::audit_log)
    .service(notifications::list_notifications)
    .service(notifications::mark_all_read)
    .service(notifications::mark_read)
    .service(public::submit_report)
    .service(settings::get_settings)
    .service(settings::update_settings)
    .service(stats::overview)
    .service(stats::officer_workload)
    .service(stats::fpn_summary)
    .service(stats::outstanding_fpns)
    .service(location::status)
    .service(location::words_to_coordinates)
    .service(location::coordinates_to_words);
}
