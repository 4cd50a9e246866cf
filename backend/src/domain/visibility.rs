//! Team and role based visibility policy.
//!
//! Rules, in precedence order:
//! 1. managers see everything;
//! 2. supervisors with cross-team access see everything;
//! 3. users in no team see everything;
//! 4. cases without an owning team are visible to all;
//! 5. otherwise the owning team must be one of the user's teams (case view),
//!    or the case type must map to one of the user's team types (type view).
//!
//! Officers are additionally limited to cases assigned to them or unassigned.
//! Both layers must pass.

use super::{Case, CaseType, Role, TeamType, User};

/// Why the policy refused a case-scoped request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenial {
    /// The case belongs to a team the user is not in.
    TeamAccessDenied,
    /// The case is assigned to a different officer.
    AssignedElsewhere,
}

impl AccessDenial {
    /// Short reason recorded in the access log.
    pub const fn reason(self) -> &'static str {
        match self {
            Self::TeamAccessDenied => "Team access denied",
            Self::AssignedElsewhere => "Case assigned to another officer",
        }
    }

    /// Message returned to the caller.
    pub const fn message(self) -> &'static str {
        match self {
            Self::TeamAccessDenied => "Not authorized to view this case - team access denied",
            Self::AssignedElsewhere => "Not authorized to view this case",
        }
    }
}

/// Managers and cross-team supervisors bypass team scoping.
pub fn has_unrestricted_view(user: &User) -> bool {
    match user.role {
        Role::Manager => true,
        Role::Supervisor => user.cross_team_access,
        Role::Officer => false,
    }
}

fn passes_team_scope(user: &User, case: &Case) -> bool {
    if has_unrestricted_view(user) || user.teams.is_empty() {
        return true;
    }
    match &case.owning_team {
        None => true,
        Some(team) => user.is_member_of(team),
    }
}

/// Officer-only filter: own or unassigned cases.
pub fn passes_assignment_scope(user: &User, case: &Case) -> bool {
    if !user.role.is_officer() {
        return true;
    }
    case.assigned_to.as_ref().is_none_or(|assignee| *assignee == user.id)
}

/// Evaluate both policy layers for a single case.
pub fn check_case_access(user: &User, case: &Case) -> Result<(), AccessDenial> {
    if !passes_team_scope(user, case) {
        return Err(AccessDenial::TeamAccessDenied);
    }
    if !passes_assignment_scope(user, case) {
        return Err(AccessDenial::AssignedElsewhere);
    }
    Ok(())
}

/// Whether `user` may see `case`.
pub fn can_view(user: &User, case: &Case) -> bool {
    check_case_access(user, case).is_ok()
}

/// Whether `user` may work on `case_type`, given the team types of the
/// user's teams.
pub fn can_view_case_type(user: &User, user_team_types: &[TeamType], case_type: CaseType) -> bool {
    if has_unrestricted_view(user) || user.teams.is_empty() {
        return true;
    }
    team_types_handle(user_team_types, case_type)
}

/// Whether any of `team_types` is registered to handle `case_type`.
///
/// This is the type-view layer without the role and zero-team bypasses;
/// owning-team routing applies it to a single team at a time.
pub fn team_types_handle(team_types: &[TeamType], case_type: CaseType) -> bool {
    case_type
        .team_types()
        .iter()
        .any(|team_type| team_types.contains(team_type))
}

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;
