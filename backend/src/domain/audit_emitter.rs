//! Audit, access-log and notification emitter shared by the services.
//!
//! Audit and access-log writes are part of the mutation and propagate
//! failures. Notifications are a best-effort side channel: a failed write is
//! logged and swallowed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{AuditRepository, NotificationRepository};
use crate::domain::{
    AccessDecision, AuditAction, AuditLog, CaseId, Error, Notification, Resource, User, UserId,
};

#[derive(Clone)]
pub struct AuditEmitter {
    audit: Arc<dyn AuditRepository>,
    notifications: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
}

impl AuditEmitter {
    pub fn new(
        audit: Arc<dyn AuditRepository>,
        notifications: Arc<dyn NotificationRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            audit,
            notifications,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Append one audit entry attributed to `actor`.
    pub async fn case_event(
        &self,
        case_id: CaseId,
        action: AuditAction,
        details: impl Into<String>,
        actor: &User,
    ) -> Result<(), Error> {
        let entry = AuditLog::by_user(case_id, action, details, actor, self.now());
        self.audit.record(&entry).await.map_err(Error::from)
    }

    /// Append one audit entry attributed to an anonymous public reporter.
    pub async fn public_case_event(
        &self,
        case_id: CaseId,
        action: AuditAction,
        details: impl Into<String>,
    ) -> Result<(), Error> {
        let entry = AuditLog::by_public(case_id, action, details, self.now());
        self.audit.record(&entry).await.map_err(Error::from)
    }

    /// Record a denial and build the matching `Forbidden` error.
    ///
    /// A failing access-log write is logged; the caller still gets the
    /// denial.
    pub async fn deny(
        &self,
        actor: &User,
        resource: Resource,
        action: &str,
        reason: &str,
        message: &str,
    ) -> Error {
        let decision = AccessDecision::new(actor, &resource, action, false, reason, self.now());
        if let Err(error) = self.audit.record_access(&decision).await {
            warn!(%error, %resource, action, "failed to record access denial");
        }
        Error::forbidden(message)
    }

    /// Gate an action on a role check, logging the refusal.
    pub async fn ensure(
        &self,
        permitted: bool,
        actor: &User,
        resource: Resource,
        action: &str,
        message: &str,
    ) -> Result<(), Error> {
        if permitted {
            return Ok(());
        }
        let reason = format!("Role {} not permitted", actor.role);
        Err(self.deny(actor, resource, action, &reason, message).await)
    }

    /// Record a permitted administrative action.
    pub async fn allow(
        &self,
        actor: &User,
        resource: Resource,
        action: &str,
        reason: impl Into<String>,
    ) -> Result<(), Error> {
        let decision = AccessDecision::new(actor, &resource, action, true, reason, self.now());
        self.audit.record_access(&decision).await.map_err(Error::from)
    }

    /// Audit trail for one case, newest first.
    pub async fn history(&self, case_id: &CaseId) -> Result<Vec<AuditLog>, Error> {
        self.audit.list_for_case(case_id).await.map_err(Error::from)
    }

    /// Every recorded access decision, newest first.
    pub async fn access_log(&self) -> Result<Vec<AccessDecision>, Error> {
        self.audit.list_access().await.map_err(Error::from)
    }

    /// Fire-and-forget notification.
    pub async fn notify(
        &self,
        user_id: UserId,
        title: &str,
        message: String,
        case_id: Option<CaseId>,
    ) {
        let notification = Notification::new(user_id, title, message, case_id, self.now());
        match self.notifications.add(&notification).await {
            Ok(()) => debug!(%user_id, title, "notification queued"),
            Err(error) => warn!(%error, %user_id, title, "notification delivery failed"),
        }
    }
}
