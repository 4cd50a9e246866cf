//! Driven ports: the traits the domain uses to reach storage, credentials and
//! location services. Adapters live under `outbound`.

mod macros;
pub(crate) use macros::define_port_error;

mod audit_repository;
mod case_record_repository;
mod case_repository;
mod credential_service;
mod location_resolver;
mod notification_repository;
mod repository_error;
mod settings_repository;
mod team_repository;
mod user_repository;

#[cfg(test)]
pub use audit_repository::MockAuditRepository;
pub use audit_repository::AuditRepository;
#[cfg(test)]
pub use case_record_repository::{MockCaseNoteRepository, MockEvidenceRepository};
pub use case_record_repository::{CaseNoteRepository, EvidenceRepository};
#[cfg(test)]
pub use case_repository::MockCaseRepository;
pub use case_repository::CaseRepository;
#[cfg(test)]
pub use credential_service::MockCredentialService;
pub use credential_service::{CredentialError, CredentialService};
#[cfg(test)]
pub use location_resolver::MockLocationResolver;
pub use location_resolver::{LocationResolver, LocationResolverError, ResolvedLocation};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::NotificationRepository;
pub use repository_error::RepositoryError;
#[cfg(test)]
pub use settings_repository::MockSettingsRepository;
pub use settings_repository::SettingsRepository;
#[cfg(test)]
pub use team_repository::MockTeamRepository;
pub use team_repository::TeamRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
