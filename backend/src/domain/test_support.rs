//! Builders for domain records used across unit tests.

use chrono::{DateTime, TimeZone, Utc};

use super::{
    Case, CaseId, CaseStatus, CaseType, Location, PasswordHash, ReportingSource, Role, Team,
    TeamId, TeamType, TypeSpecificFields, User, UserId,
};

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 10, 30, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub(crate) fn user(role: Role) -> User {
    User {
        id: UserId::random(),
        email: format!("{}@council.gov.uk", role.as_str()),
        name: format!("Test {}", role.as_str()),
        role,
        teams: Vec::new(),
        cross_team_access: false,
        is_active: true,
        created_at: fixed_now(),
        password_hash: PasswordHash::new("salt$digest"),
    }
}

pub(crate) fn user_in(role: Role, teams: &[TeamId]) -> User {
    User {
        teams: teams.to_vec(),
        ..user(role)
    }
}

pub(crate) fn team(name: &str, team_type: TeamType) -> Team {
    Team {
        id: TeamId::random(),
        name: name.to_owned(),
        team_type,
        description: String::new(),
        is_active: true,
        created_at: fixed_now(),
    }
}

pub(crate) fn case(case_type: CaseType) -> Case {
    Case {
        id: CaseId::random(),
        reference_number: format!("{}-26-00001", case_type.reference_prefix()),
        case_type,
        status: CaseStatus::New,
        description: "Bags dumped behind the parade".to_owned(),
        location: Location {
            latitude: Some(51.5),
            longitude: Some(-0.1),
            address: Some("1 High Street".to_owned()),
            ..Location::default()
        },
        location_history: Vec::new(),
        location_resolved_at: None,
        reporter_name: None,
        reporter_contact: None,
        reporting_source: ReportingSource::Officer,
        type_specific_fields: TypeSpecificFields::default(),
        owning_team: None,
        owning_team_name: None,
        assigned_to: None,
        assigned_to_name: None,
        created_by: None,
        created_at: fixed_now(),
        updated_at: fixed_now(),
        closure_reason: None,
        final_note: None,
        closed_by: None,
        closed_by_name: None,
        closed_at: None,
        fpn_issued: false,
        fpn_details: None,
        revision: 1,
    }
}

pub(crate) fn case_owned_by(case_type: CaseType, team: TeamId) -> Case {
    Case {
        owning_team: Some(team),
        ..case(case_type)
    }
}

/// Clock pinned to [`fixed_now`].
pub(crate) struct FixtureClock;

impl mockable::Clock for FixtureClock {
    fn local(&self) -> DateTime<chrono::Local> {
        self.utc().with_timezone(&chrono::Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixed_now()
    }
}

pub(crate) fn fixture_clock() -> std::sync::Arc<dyn mockable::Clock> {
    std::sync::Arc::new(FixtureClock)
}
