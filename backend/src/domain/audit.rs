//! Audit trail, access log and notification records.
//!
//! All three are append-only; only a notification's `is_read` flag changes
//! after creation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CaseId, LogEntryId, NotificationId, Role, User, UserId};

/// Kind of case mutation an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Created,
    Updated,
    LocationUpdated,
    SelfAssigned,
    NoteAdded,
    EvidenceUploaded,
    EvidenceDeleted,
}

/// Name recorded for mutations made through the public report form.
pub const PUBLIC_REPORTER_NAME: &str = "Public Reporter";

/// One human-readable summary of a case mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditLog {
    pub id: LogEntryId,
    pub case_id: CaseId,
    pub action: AuditAction,
    pub details: String,
    /// Absent for anonymous public submissions.
    pub performed_by: Option<UserId>,
    pub performed_by_name: String,
    pub performed_at: DateTime<Utc>,
}

impl AuditLog {
    /// Entry attributed to an authenticated user.
    pub fn by_user(
        case_id: CaseId,
        action: AuditAction,
        details: impl Into<String>,
        actor: &User,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LogEntryId::random(),
            case_id,
            action,
            details: details.into(),
            performed_by: Some(actor.id),
            performed_by_name: actor.name.clone(),
            performed_at: at,
        }
    }

    /// Entry attributed to an anonymous public reporter.
    pub fn by_public(
        case_id: CaseId,
        action: AuditAction,
        details: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LogEntryId::random(),
            case_id,
            action,
            details: details.into(),
            performed_by: None,
            performed_by_name: PUBLIC_REPORTER_NAME.to_owned(),
            performed_at: at,
        }
    }
}

/// Collects the deltas of one update call into a single audit summary.
///
/// # Examples
/// ```
/// use casework::domain::AuditDeltas;
///
/// let mut deltas = AuditDeltas::default();
/// deltas.push("Status changed to closed");
/// deltas.push("Assigned to Jane Smith");
/// assert_eq!(
///     deltas.summary().as_deref(),
///     Some("Status changed to closed; Assigned to Jane Smith")
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditDeltas(Vec<String>);

impl AuditDeltas {
    pub fn push(&mut self, delta: impl Into<String>) {
        self.0.push(delta.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Semicolon-joined summary, or `None` when nothing changed.
    pub fn summary(&self) -> Option<String> {
        (!self.0.is_empty()).then(|| self.0.join("; "))
    }
}

/// Resource an access decision concerns, rendered as `kind:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Case(CaseId),
    User(UserId),
    Team(super::TeamId),
    Evidence(super::EvidenceId),
    SystemSettings,
    /// A whole collection or report, such as `users` or `stats`.
    Collection(&'static str),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Case(id) => write!(f, "case:{id}"),
            Self::User(id) => write!(f, "user:{id}"),
            Self::Team(id) => write!(f, "team:{id}"),
            Self::Evidence(id) => write!(f, "evidence:{id}"),
            Self::SystemSettings => f.write_str("system_settings"),
            Self::Collection(name) => f.write_str(name),
        }
    }
}

/// A recorded allow or deny decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AccessDecision {
    pub id: LogEntryId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_role: Role,
    pub resource: String,
    pub action: String,
    pub allowed: bool,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl AccessDecision {
    pub fn new(
        actor: &User,
        resource: &Resource,
        action: &str,
        allowed: bool,
        reason: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LogEntryId::random(),
            user_id: actor.id,
            user_name: actor.name.clone(),
            user_role: actor.role,
            resource: resource.to_string(),
            action: action.to_owned(),
            allowed,
            reason: reason.into(),
            timestamp: at,
        }
    }
}

/// An in-app message for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub case_id: Option<CaseId>,
}

impl Notification {
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        case_id: Option<CaseId>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::random(),
            user_id,
            title: title.into(),
            message: message.into(),
            is_read: false,
            created_at: at,
            case_id,
        }
    }
}
