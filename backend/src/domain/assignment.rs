//! Assignment rules layered on the state machine.

use chrono::{DateTime, Utc};

use super::lifecycle::TransitionError;
use super::{AuditDeltas, Case, CaseStatus, User, UserId};

pub(crate) const ALREADY_ASSIGNED: &str = "Case is already assigned";

/// Requested change to a case's assignee.
///
/// `Clear` replaces the legacy `"unassigned"` sentinel string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeChange {
    Assign(UserId),
    Clear,
}

/// Officers may only (re)assign a case to themselves.
pub fn authorize(actor: &User, change: &AssigneeChange) -> Result<(), TransitionError> {
    if actor.role.is_officer() && *change != AssigneeChange::Assign(actor.id) {
        return Err(TransitionError::Forbidden("Officers cannot reassign cases"));
    }
    Ok(())
}

/// The named assignee must exist and be active.
pub fn validate_assignee(
    change: &AssigneeChange,
    assignee: Option<&User>,
) -> Result<(), TransitionError> {
    let AssigneeChange::Assign(id) = change else {
        return Ok(());
    };
    match assignee {
        Some(user) if user.id == *id && user.is_active => Ok(()),
        Some(user) if user.id == *id => Err(TransitionError::Invalid(format!(
            "Cannot assign a case to inactive user {}",
            user.name
        ))),
        _ => Err(TransitionError::Invalid(format!("Assignee {id} not found"))),
    }
}

/// Apply a validated change. Returns the user to notify, if any.
pub(crate) fn apply(
    case: &mut Case,
    change: &AssigneeChange,
    assignee: Option<&User>,
    deltas: &mut AuditDeltas,
) -> Option<UserId> {
    match (change, assignee) {
        (AssigneeChange::Clear, _) => {
            if case.assigned_to.take().is_some() {
                case.assigned_to_name = None;
                deltas.push("Case unassigned");
            }
            None
        }
        (AssigneeChange::Assign(_), Some(user)) => {
            if case.status == CaseStatus::New {
                case.status = CaseStatus::Assigned;
            }
            if case.is_assigned_to(&user.id) {
                return None;
            }
            case.assigned_to = Some(user.id);
            case.assigned_to_name = Some(user.name.clone());
            deltas.push(format!("Assigned to {}", user.name));
            Some(user.id)
        }
        (AssigneeChange::Assign(_), None) => None,
    }
}

/// Claim an unassigned, open case for `actor`.
///
/// # Errors
/// [`TransitionError::Invalid`] when the case is closed or already has an
/// assignee.
pub fn self_assign(
    current: &Case,
    actor: &User,
    now: DateTime<Utc>,
) -> Result<Case, TransitionError> {
    if current.status.is_closed() {
        return Err(TransitionError::invalid("Cannot self-assign a closed case"));
    }
    if !current.is_unassigned() {
        return Err(TransitionError::invalid(ALREADY_ASSIGNED));
    }
    let mut next = current.clone();
    next.assigned_to = Some(actor.id);
    next.assigned_to_name = Some(actor.name.clone());
    next.status = CaseStatus::Assigned;
    next.updated_at = now;
    Ok(next)
}
