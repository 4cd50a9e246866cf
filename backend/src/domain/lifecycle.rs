//! Case state machine and the update contract.
//!
//! [`apply_update`] evaluates every guard against the current record before
//! touching anything, then produces the next record together with the audit
//! summary and the user to notify. A rejected update therefore never applies
//! a subset of its fields.

use chrono::{DateTime, Utc};

use super::assignment::{self, AssigneeChange};
use super::{
    AuditDeltas, Case, CaseStatus, CaseType, ClosureReason, Error, FpnDetails, Location,
    LocationHistoryEntry, Team, TeamId, TypeSpecificFields, User, UserId,
};

/// Guard failure raised by the state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The actor's role does not permit the change.
    #[error("{0}")]
    Forbidden(&'static str),
    /// The request is incomplete or inconsistent.
    #[error("{0}")]
    Invalid(String),
}

impl TransitionError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

impl From<TransitionError> for Error {
    fn from(value: TransitionError) -> Self {
        match value {
            TransitionError::Forbidden(message) => Error::forbidden(message),
            TransitionError::Invalid(message) => Error::invalid_request(message),
        }
    }
}

/// Requested changes to a case. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseUpdate {
    pub description: Option<String>,
    pub status: Option<CaseStatus>,
    pub assignee: Option<AssigneeChange>,
    pub location: Option<Location>,
    pub type_specific_fields: Option<TypeSpecificFields>,
    pub owning_team: Option<TeamId>,
    pub closure_reason: Option<ClosureReason>,
    pub final_note: Option<String>,
    pub fpn_details: Option<FpnDetails>,
}

/// Records the service resolved for an update.
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext<'a> {
    pub actor: &'a User,
    pub now: DateTime<Utc>,
    /// The user named by [`AssigneeChange::Assign`], if they exist.
    pub assignee: Option<&'a User>,
    /// The team named by `owning_team`, if it exists.
    pub team: Option<&'a Team>,
}

/// Outcome of a successful update.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedUpdate {
    pub case: Case,
    /// Semicolon-joined audit summary; `None` when nothing visible changed.
    pub summary: Option<String>,
    /// User who became the assignee during this update.
    pub newly_assigned: Option<UserId>,
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Check type-specific fields against the case type.
pub fn validate_type_specific_fields(
    case_type: CaseType,
    fields: &TypeSpecificFields,
) -> Result<(), TransitionError> {
    if let Some(details) = &fields.details {
        if case_type.detail_kind() != Some(details.kind()) {
            return Err(TransitionError::invalid(format!(
                "type_specific_fields do not match case type {case_type}"
            )));
        }
    }
    if let Some(outcome) = &fields.clearance_outcome {
        if !case_type.is_fly_tipping() {
            return Err(TransitionError::invalid(
                "clearance_outcome is only valid for fly-tipping cases",
            ));
        }
        if !outcome.is_complete() {
            return Err(TransitionError::invalid(
                "reason_not_cleared is required when items were not cleared",
            ));
        }
    }
    Ok(())
}

fn validate_fpn(details: &FpnDetails) -> Result<(), TransitionError> {
    if details.fpn_amount.is_some_and(|amount| amount < 0.0 || !amount.is_finite()) {
        return Err(TransitionError::invalid("fpn_amount must be a non-negative number"));
    }
    if details.paid {
        if is_blank(details.fpn_ref.as_deref()) {
            return Err(TransitionError::invalid("fpn_ref is required before marking an FPN as paid"));
        }
        if details.date_paid.is_none() {
            return Err(TransitionError::invalid("date_paid is required when an FPN is paid"));
        }
    }
    Ok(())
}

fn check_role_gates(current: &Case, update: &CaseUpdate, actor: &User) -> Result<(), TransitionError> {
    if actor.role.is_officer() {
        if !current.is_assigned_to(&actor.id) {
            return Err(TransitionError::Forbidden("Can only update assigned cases"));
        }
        if update.owning_team.is_some() {
            return Err(TransitionError::Forbidden("Officers cannot change the owning team"));
        }
        let reopening = current.status.is_closed()
            && update.status.is_some_and(|status| !status.is_closed());
        if reopening {
            return Err(TransitionError::Forbidden("Officers cannot reopen closed cases"));
        }
    }
    if let Some(change) = &update.assignee {
        assignment::authorize(actor, change)?;
    }
    Ok(())
}

fn check_field_guards(
    current: &Case,
    update: &CaseUpdate,
    ctx: &UpdateContext<'_>,
) -> Result<(), TransitionError> {
    if update.status == Some(CaseStatus::Closed)
        && (update.closure_reason.is_none() || is_blank(update.final_note.as_deref()))
    {
        return Err(TransitionError::invalid(
            "A closure reason and final note are required to close a case",
        ));
    }
    if let Some(description) = &update.description {
        if description.trim().is_empty() {
            return Err(TransitionError::invalid("description must not be empty"));
        }
    }
    if let Some(team_id) = &update.owning_team {
        if ctx.team.is_none_or(|team| team.id != *team_id) {
            return Err(TransitionError::invalid(format!("Invalid team ID: {team_id}")));
        }
    }
    if let Some(fields) = &update.type_specific_fields {
        validate_type_specific_fields(current.case_type, fields)?;
    }
    if let Some(fpn) = &update.fpn_details {
        validate_fpn(fpn)?;
    }
    if let Some(change) = &update.assignee {
        assignment::validate_assignee(change, ctx.assignee)?;
    }
    Ok(())
}

/// Replace the location if it changed, archiving the previous value.
///
/// Returns `false` and leaves the case untouched when nothing differs.
fn move_location(case: &mut Case, location: Location, actor: &User, now: DateTime<Utc>) -> bool {
    if !location.differs_from(&case.location) {
        return false;
    }
    let previous = std::mem::replace(&mut case.location, location);
    case.location_history.push(LocationHistoryEntry {
        location: previous,
        changed_by: actor.id,
        changed_by_name: actor.name.clone(),
        changed_at: now,
    });
    case.location_resolved_at = Some(now);
    true
}

fn apply_status(
    case: &mut Case,
    status: CaseStatus,
    update: &mut CaseUpdate,
    ctx: &UpdateContext<'_>,
    deltas: &mut AuditDeltas,
) {
    if status == case.status {
        return;
    }
    if status.is_closed() {
        case.closed_at = Some(ctx.now);
        case.closed_by = Some(ctx.actor.id);
        case.closed_by_name = Some(ctx.actor.name.clone());
        case.closure_reason = update.closure_reason.take();
        case.final_note = update.final_note.take();
    } else if case.status.is_closed() {
        case.closed_at = None;
        case.closed_by = None;
        case.closed_by_name = None;
    }
    case.status = status;
    deltas.push(format!("Status changed to {status}"));
}

/// Validate `update` against `current` and compute the next record.
///
/// # Errors
/// Returns [`TransitionError::Forbidden`] for role violations and
/// [`TransitionError::Invalid`] for missing or inconsistent fields. No
/// partial update is ever produced.
pub fn apply_update(
    current: &Case,
    mut update: CaseUpdate,
    ctx: &UpdateContext<'_>,
) -> Result<AppliedUpdate, TransitionError> {
    check_role_gates(current, &update, ctx.actor)?;
    check_field_guards(current, &update, ctx)?;

    let mut next = current.clone();
    let mut deltas = AuditDeltas::default();

    if let Some(location) = update.location.take() {
        let old_address = next.location.address_label().to_owned();
        let new_address = location.address_label().to_owned();
        if move_location(&mut next, location, ctx.actor, ctx.now) {
            deltas.push(format!("Location updated from {old_address} to {new_address}"));
        }
    }
    if let Some(fields) = update.type_specific_fields.take() {
        next.type_specific_fields.merge(fields);
        deltas.push("Case-specific details updated");
    }
    if let Some(description) = update.description.take() {
        if description != next.description {
            next.description = description;
            deltas.push("Description updated");
        }
    }
    if let Some(status) = update.status {
        apply_status(&mut next, status, &mut update, ctx, &mut deltas);
    }
    let newly_assigned = match update.assignee.take() {
        Some(change) => assignment::apply(&mut next, &change, ctx.assignee, &mut deltas),
        None => None,
    };
    if let (Some(_), Some(team)) = (update.owning_team, ctx.team) {
        if next.owning_team != Some(team.id) {
            deltas.push(format!("Owning team changed to {}", team.name));
        }
        next.owning_team = Some(team.id);
        next.owning_team_name = Some(team.name.clone());
    }
    if let Some(fpn) = update.fpn_details.take() {
        let newly_paid = fpn.paid && !next.fpn_details.as_ref().is_some_and(|d| d.paid);
        next.fpn_details = Some(fpn);
        next.fpn_issued = true;
        deltas.push("FPN details updated");
        if newly_paid {
            deltas.push("FPN marked as paid");
        }
    }

    next.updated_at = ctx.now;
    Ok(AppliedUpdate {
        case: next,
        summary: deltas.summary(),
        newly_assigned,
    })
}

/// Outcome of the dedicated location endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Relocation {
    pub case: Case,
    /// Audit details; `None` when the location did not change.
    pub summary: Option<String>,
}

/// Move a case to `location` outside the general update contract.
pub fn relocate(
    current: &Case,
    location: Location,
    actor: &User,
    now: DateTime<Utc>,
) -> Result<Relocation, TransitionError> {
    if actor.role.is_officer() && !current.is_assigned_to(&actor.id) {
        return Err(TransitionError::Forbidden("Can only update assigned cases"));
    }
    let mut next = current.clone();
    let old_coords = next.location.coordinates_label();
    let new_coords = location.coordinates_label();
    let new_address = location.address.clone().unwrap_or_else(|| "N/A".to_owned());
    if !move_location(&mut next, location, actor, now) {
        return Ok(Relocation {
            case: next,
            summary: None,
        });
    }
    next.updated_at = now;
    Ok(Relocation {
        case: next,
        summary: Some(format!(
            "Location changed from {old_coords} to {new_coords}. Address: {new_address}"
        )),
    })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
