//! OpenAPI document for the REST API.
//!
//! Served through Swagger UI in debug builds and written to disk by the
//! `openapi-dump` binary for client generation.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AuditAction, AuditLog, Case, CaseNote, CaseStatus, CaseType, CaseTypeTeams, ClosureReason,
    Error, ErrorCode, EvidenceSummary, FpnDetails, FpnSummary, Location, LocationLookup,
    LocationStatus, Notification, OfficerWorkload, OutstandingFpn, Overview, ReportingSource,
    Role, SettingsPatch, SystemSettings, Team, TeamType, TypeSpecificFieldsWire,
};
use crate::inbound::http::{
    MessageResponse, auth, case_records, cases, health, location, notifications, public, settings,
    stats, teams, users,
};

/// Registers the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Casework API",
        description = "Enforcement case management: cases, teams, evidence, audit trail and notifications."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        auth::login,
        auth::logout,
        auth::current_user,
        auth::register,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        teams::list_teams,
        teams::create_team,
        teams::get_team,
        teams::update_team,
        teams::delete_team,
        teams::team_members,
        teams::case_type_teams,
        cases::create_case,
        cases::list_cases,
        cases::get_case,
        cases::update_case,
        cases::relocate_case,
        cases::self_assign_case,
        case_records::list_notes,
        case_records::add_note,
        case_records::list_evidence,
        case_records::upload_evidence,
        case_records::delete_evidence,
        case_records::audit_log,
        notifications::list_notifications,
        notifications::mark_all_read,
        notifications::mark_read,
        public::submit_report,
        settings::get_settings,
        settings::update_settings,
        stats::overview,
        stats::officer_workload,
        stats::fpn_summary,
        stats::outstanding_fpns,
        location::status,
        location::words_to_coordinates,
        location::coordinates_to_words,
        health::ready,
        health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        MessageResponse,
        users::UserResponse,
        users::UpdateUserRequest,
        auth::LoginRequest,
        auth::RegisterRequest,
        Role,
        Team,
        TeamType,
        teams::CreateTeamRequest,
        teams::UpdateTeamRequest,
        CaseTypeTeams,
        Case,
        CaseStatus,
        CaseType,
        ClosureReason,
        ReportingSource,
        Location,
        FpnDetails,
        TypeSpecificFieldsWire,
        cases::CreateCaseRequest,
        cases::UpdateCaseRequest,
        CaseNote,
        EvidenceSummary,
        case_records::CreateNoteRequest,
        case_records::UploadEvidenceRequest,
        AuditLog,
        AuditAction,
        Notification,
        notifications::MarkAllReadResponse,
        public::PublicReportRequest,
        public::PublicReportResponse,
        SystemSettings,
        SettingsPatch,
        Overview,
        OfficerWorkload,
        FpnSummary,
        OutstandingFpn,
        LocationStatus,
        LocationLookup,
        location::WordsRequest,
        location::CoordinatesRequest,
    )),
    tags(
        (name = "auth", description = "Session login and account registration"),
        (name = "users", description = "Account administration"),
        (name = "teams", description = "Teams and case type routing"),
        (name = "cases", description = "Cases, notes, evidence and audit trail"),
        (name = "notifications", description = "In-app notifications"),
        (name = "public", description = "Anonymous public reporting"),
        (name = "settings", description = "System settings"),
        (name = "stats", description = "Dashboard statistics"),
        (name = "location", description = "what3words conversion"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn properties(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schema = doc
            .components
            .as_ref()
            .and_then(|components| components.schemas.get(name))
            .cloned()
            .unwrap_or_else(|| panic!("schema {name} registered"));
        match schema {
            RefOr::T(Schema::Object(object)) => object.properties.keys().cloned().collect(),
            other => panic!("expected object schema for {name}, got {other:?}"),
        }
    }

    #[test]
    fn error_schema_uses_camel_case_envelope() {
        let fields = properties("Error");
        for field in ["code", "message", "traceId", "details"] {
            assert!(fields.iter().any(|f| f == field), "missing {field}");
        }
    }

    #[test]
    fn user_schema_never_exposes_password_hash() {
        let fields = properties("UserResponse");
        assert!(fields.iter().any(|f| f == "email"));
        assert!(!fields.iter().any(|f| f == "password_hash"));
    }

    #[test]
    fn every_case_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/cases",
            "/api/v1/cases/{id}",
            "/api/v1/cases/{id}/self-assign",
            "/api/v1/cases/{id}/evidence/{evidence_id}",
            "/api/v1/public/report",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} undocumented");
        }
    }
}
