//! Domain primitives, policies and services.
//!
//! Purpose: hold the case-management rules independently of HTTP and
//! storage. Records are plain serde types; the rules that govern them live
//! in pure modules (`visibility`, `lifecycle`, `assignment`, `reference`)
//! and the services orchestrate those rules over the driven ports.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - User, Team, Case and friends: persisted records.
//! - `*Service`: use-cases invoked by the inbound adapters.

pub mod assignment;
pub mod audit;
pub mod audit_emitter;
pub mod auth;
pub mod auth_service;
pub mod case;
pub mod case_details;
pub mod case_records;
pub mod case_service;
pub mod case_type;
pub mod error;
pub mod ids;
pub mod lifecycle;
pub mod location_service;
pub mod notification_service;
pub mod ports;
pub mod reference;
pub mod settings;
pub mod settings_service;
pub mod stats;
pub mod stats_service;
pub mod team;
pub mod team_service;
pub mod trace_id;
pub mod user;
pub mod user_admin_service;
pub mod visibility;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::assignment::AssigneeChange;
pub use self::audit::{
    AccessDecision, AuditAction, AuditDeltas, AuditLog, Notification, PUBLIC_REPORTER_NAME,
    Resource,
};
pub use self::audit_emitter::AuditEmitter;
pub use self::auth::{LoginCredentials, LoginValidationError, normalise_email};
pub use self::auth_service::{AuthService, DEMO_ACCOUNTS, DemoAccount};
pub use self::case::{
    Case, CaseStatus, ClosureReason, FpnDetails, Location, LocationHistoryEntry, ReportingSource,
};
pub use self::case_details::{
    AbandonedVehicleDetails, CaseDetails, ClearanceOutcome, DogFoulingDetails, FlyTippingDetails,
    HighHedgesDetails, LitterType, LitteringDetails, MultipleDetailSections, NuisanceVehicleDetails,
    PspoBreachType, PspoDetails, TaxMotStatus, TypeSpecificFields, TypeSpecificFieldsWire,
    UntidyLandDetails, VehicleCondition, VehicleDetails, WasteCarrierDetails, WasteType,
    YesNoUnknown,
};
pub use self::case_records::{CaseNote, Evidence, EvidenceSummary};
pub use self::case_service::{
    CaseFilter, CaseService, CaseStores, NewCase, NewEvidence, PublicReceipt, PublicReport,
};
pub use self::case_type::{CaseType, DetailKind, FALLBACK_PREFIX};
pub use self::error::{Error, ErrorCode};
pub use self::ids::{CaseId, EvidenceId, LogEntryId, NoteId, NotificationId, TeamId, UserId};
pub use self::lifecycle::{CaseUpdate, TransitionError};
pub use self::location_service::{LocationLookup, LocationService, LocationStatus};
pub use self::notification_service::{NOTIFICATION_PAGE_SIZE, NotificationService};
pub use self::reference::reference_number;
pub use self::settings::{DEFAULT_RETENTION_DAYS, MapSettings, SettingsPatch, SystemSettings};
pub use self::settings_service::SettingsService;
pub use self::stats::{
    FpnSummary, FpnTypeBreakdown, OfficerWorkload, OutstandingFpn, Overview,
};
pub use self::stats_service::StatsService;
pub use self::team::{Team, TeamType};
pub use self::team_service::{CaseTypeTeams, NewTeam, TeamPatch, TeamService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{PasswordHash, Role, User};
pub use self::user_admin_service::{NewUser, UserAdminService, UserPatch};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use casework::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
