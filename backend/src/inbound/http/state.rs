//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AuditRepository, CaseNoteRepository, CaseRepository, CredentialService, EvidenceRepository,
    LocationResolver, NotificationRepository, SettingsRepository, TeamRepository, UserRepository,
};
use crate::domain::{
    AuditEmitter, AuthService, CaseService, CaseStores, Error, LocationService,
    NotificationService, SettingsService, StatsService, TeamService, User, UserAdminService,
};
use crate::inbound::http::session::SessionContext;

/// Parameter object bundling the driven ports the services need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub cases: Arc<dyn CaseRepository>,
    pub notes: Arc<dyn CaseNoteRepository>,
    pub evidence: Arc<dyn EvidenceRepository>,
    pub audit: Arc<dyn AuditRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub credentials: Arc<dyn CredentialService>,
    pub location: Arc<dyn LocationResolver>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: AuthService,
    pub users: UserAdminService,
    pub teams: TeamService,
    pub cases: CaseService,
    pub notifications: NotificationService,
    pub settings: SettingsService,
    pub stats: StatsService,
    pub location: LocationService,
}

impl HttpState {
    /// Wire every service over one set of ports.
    pub fn new(ports: HttpStatePorts) -> Self {
        let emitter = AuditEmitter::new(
            Arc::clone(&ports.audit),
            Arc::clone(&ports.notifications),
            Arc::clone(&ports.clock),
        );
        let stores = CaseStores {
            cases: Arc::clone(&ports.cases),
            teams: Arc::clone(&ports.teams),
            users: Arc::clone(&ports.users),
            notes: ports.notes,
            evidence: ports.evidence,
            settings: Arc::clone(&ports.settings),
        };
        Self {
            auth: AuthService::new(
                Arc::clone(&ports.users),
                Arc::clone(&ports.credentials),
                ports.clock,
            ),
            users: UserAdminService::new(
                Arc::clone(&ports.users),
                Arc::clone(&ports.teams),
                ports.credentials,
                emitter.clone(),
            ),
            teams: TeamService::new(
                Arc::clone(&ports.teams),
                Arc::clone(&ports.users),
                Arc::clone(&ports.cases),
                emitter.clone(),
            ),
            cases: CaseService::new(stores, emitter.clone()),
            notifications: NotificationService::new(ports.notifications),
            settings: SettingsService::new(Arc::clone(&ports.settings), emitter.clone()),
            stats: StatsService::new(ports.cases, emitter),
            location: LocationService::new(ports.location, ports.settings),
        }
    }

    /// Resolve the session to an active stored user or fail with
    /// `Unauthorized`.
    pub async fn current_user(&self, session: &SessionContext) -> Result<User, Error> {
        let id = session.require_user_id()?;
        self.auth.current_user(&id).await
    }
}
