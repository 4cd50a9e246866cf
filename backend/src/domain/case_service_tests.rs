//! Orchestration tests for the case service over mocked ports.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockAuditRepository, MockCaseNoteRepository, MockCaseRepository, MockEvidenceRepository,
    MockNotificationRepository, MockSettingsRepository, MockTeamRepository, MockUserRepository,
    RepositoryError,
};
use crate::domain::test_support::{
    case, case_owned_by, fixed_now, fixture_clock, team, user, user_in,
};
use crate::domain::{ErrorCode, SystemSettings, TeamType};

#[derive(Default)]
struct Ports {
    cases: MockCaseRepository,
    teams: MockTeamRepository,
    users: MockUserRepository,
    notes: MockCaseNoteRepository,
    evidence: MockEvidenceRepository,
    settings: MockSettingsRepository,
    audit: MockAuditRepository,
    notifications: MockNotificationRepository,
}

impl Ports {
    fn with_case(stored: Case) -> Self {
        let mut ports = Self::default();
        ports
            .cases
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        ports
    }

    fn accept_audit(&mut self) {
        self.audit.expect_record().returning(|_| Ok(()));
    }

    fn build(self) -> CaseService {
        let emitter = AuditEmitter::new(
            Arc::new(self.audit),
            Arc::new(self.notifications),
            fixture_clock(),
        );
        CaseService::new(
            CaseStores {
                cases: Arc::new(self.cases),
                teams: Arc::new(self.teams),
                users: Arc::new(self.users),
                notes: Arc::new(self.notes),
                evidence: Arc::new(self.evidence),
                settings: Arc::new(self.settings),
            },
            emitter,
        )
    }
}

fn new_case(case_type: CaseType) -> NewCase {
    NewCase {
        case_type,
        description: "Mattress on the verge".into(),
        location: Location::default(),
        reporter_name: None,
        reporter_contact: None,
        type_specific_fields: TypeSpecificFields::default(),
        reporting_source: ReportingSource::Officer,
        owning_team: None,
    }
}

#[tokio::test]
async fn create_numbers_the_case_from_the_existing_count() {
    let officer = user(Role::Officer);
    let mut ports = Ports::default();
    ports.cases.expect_count().return_once(|| Ok(41));
    ports
        .cases
        .expect_insert()
        .withf(|case| case.reference_number == "FT-26-00042" && case.revision == 1)
        .times(1)
        .return_once(|_| Ok(()));
    ports
        .audit
        .expect_record()
        .withf(|entry| entry.details == "Case FT-26-00042 created")
        .times(1)
        .return_once(|_| Ok(()));

    let created = ports
        .build()
        .create(&officer, new_case(CaseType::FlyTipping))
        .await
        .expect("case created");

    assert_eq!(created.status, CaseStatus::New);
    assert_eq!(created.created_by, Some(officer.id));
    assert!(created.owning_team.is_none());
}

#[tokio::test]
async fn create_prefers_a_team_able_to_handle_the_case_type() {
    let enforcement = team("Enforcement North", TeamType::Enforcement);
    let waste = team("Waste Ops", TeamType::WasteManagement);
    let officer = user_in(Role::Officer, &[enforcement.id, waste.id]);
    let mut ports = Ports::default();
    let listed = vec![enforcement.clone(), waste.clone()];
    ports.teams.expect_list().return_once(move || Ok(listed));
    ports.cases.expect_count().return_once(|| Ok(0));
    ports.cases.expect_insert().return_once(|_| Ok(()));
    ports.accept_audit();

    let created = ports
        .build()
        .create(&officer, new_case(CaseType::ComplexEnvironmental))
        .await
        .expect("case created");
    // No environmental crimes team: fall back to the first membership.
    assert_eq!(created.owning_team, Some(enforcement.id));

    let mut ports = Ports::default();
    let listed = vec![enforcement.clone(), waste.clone()];
    ports.teams.expect_list().return_once(move || Ok(listed));
    ports.cases.expect_count().return_once(|| Ok(0));
    ports.cases.expect_insert().return_once(|_| Ok(()));
    ports.accept_audit();
    let created = ports
        .build()
        .create(&officer, new_case(CaseType::Littering))
        .await
        .expect("case created");
    assert_eq!(created.owning_team, Some(waste.id));
    assert_eq!(created.owning_team_name.as_deref(), Some("Waste Ops"));
}

#[tokio::test]
async fn unrestricted_roles_still_route_to_a_handling_team() {
    let enforcement = team("Enforcement North", TeamType::Enforcement);
    let environmental = team("Environmental Crimes", TeamType::EnvironmentalCrimes);
    let manager = user_in(Role::Manager, &[enforcement.id, environmental.id]);
    let mut ports = Ports::default();
    let listed = vec![enforcement.clone(), environmental.clone()];
    ports.teams.expect_list().return_once(move || Ok(listed));
    ports.cases.expect_count().return_once(|| Ok(0));
    ports.cases.expect_insert().return_once(|_| Ok(()));
    ports.accept_audit();

    let created = ports
        .build()
        .create(&manager, new_case(CaseType::ComplexEnvironmental))
        .await
        .expect("case created");
    assert_eq!(created.owning_team, Some(environmental.id));
}

#[tokio::test]
async fn create_rejects_unknown_explicit_team() {
    let manager = user(Role::Manager);
    let mut ports = Ports::default();
    ports.teams.expect_find_by_id().return_once(|_| Ok(None));
    ports.cases.expect_insert().never();

    let mut request = new_case(CaseType::DogFouling);
    request.owning_team = Some(TeamId::random());
    let error = ports
        .build()
        .create(&manager, request)
        .await
        .expect_err("unknown team");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(error.message().starts_with("Invalid team ID"));
}

#[tokio::test]
async fn hidden_case_is_refused_and_logged() {
    let mine = team("North", TeamType::Enforcement);
    let theirs = team("South", TeamType::Enforcement);
    let officer = user_in(Role::Officer, &[mine.id]);
    let stored = case_owned_by(CaseType::HighHedges, theirs.id);
    let mut ports = Ports::with_case(stored.clone());
    ports
        .audit
        .expect_record_access()
        .withf(move |decision| {
            !decision.allowed
                && decision.reason == "Team access denied"
                && decision.resource == Resource::Case(stored.id).to_string()
        })
        .times(1)
        .return_once(|_| Ok(()));

    let error = ports
        .build()
        .get(&officer, &CaseId::random())
        .await
        .expect_err("denied");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn missing_case_is_not_found() {
    let mut ports = Ports::default();
    ports.cases.expect_find_by_id().return_once(|_| Ok(None));
    let error = ports
        .build()
        .get(&user(Role::Manager), &CaseId::random())
        .await
        .expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn self_assign_losing_a_race_reports_already_assigned() {
    let officer = user(Role::Officer);
    let mut ports = Ports::with_case(case(CaseType::UntidyLand));
    ports
        .cases
        .expect_update()
        .withf(|case, expected| *expected == 1 && case.revision == 2)
        .times(1)
        .return_once(|_, _| Err(RepositoryError::revision_mismatch(1_u64, 2_u64)));
    ports.audit.expect_record().never();

    let error = ports
        .build()
        .self_assign(&officer, &CaseId::random())
        .await
        .expect_err("stale write");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Case is already assigned");
}

#[tokio::test]
async fn self_assign_on_assigned_case_never_writes() {
    let supervisor = user(Role::Supervisor);
    let mut stored = case(CaseType::UntidyLand);
    stored.assigned_to = Some(UserId::random());
    let mut ports = Ports::with_case(stored);
    ports.cases.expect_update().never();

    let error = ports
        .build()
        .self_assign(&supervisor, &CaseId::random())
        .await
        .expect_err("already assigned");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Case is already assigned");
}

#[tokio::test]
async fn self_assign_on_closed_case_never_writes() {
    let officer = user(Role::Officer);
    let mut stored = case(CaseType::Littering);
    stored.status = CaseStatus::Closed;
    stored.closed_at = Some(fixed_now());
    stored.closed_by = Some(UserId::random());
    stored.closed_by_name = Some("Jane Smith".into());
    let mut ports = Ports::with_case(stored);
    ports.cases.expect_update().never();
    ports.audit.expect_record().never();

    let error = ports
        .build()
        .self_assign(&officer, &CaseId::random())
        .await
        .expect_err("closed case");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Cannot self-assign a closed case");
}

#[tokio::test]
async fn self_assign_records_the_claim() {
    let officer = user(Role::Officer);
    let mut ports = Ports::with_case(case(CaseType::UntidyLand));
    ports.cases.expect_update().return_once(|_, _| Ok(()));
    let expected = format!("Self-assigned by {}", officer.name);
    ports
        .audit
        .expect_record()
        .withf(move |entry| entry.action == AuditAction::SelfAssigned && entry.details == expected)
        .times(1)
        .return_once(|_| Ok(()));

    let claimed = ports
        .build()
        .self_assign(&officer, &CaseId::random())
        .await
        .expect("claimed");
    assert_eq!(claimed.assigned_to, Some(officer.id));
    assert_eq!(claimed.status, CaseStatus::Assigned);
    assert_eq!(claimed.revision, 2);
}

#[tokio::test]
async fn assignment_notifies_even_when_delivery_fails() {
    let supervisor = user(Role::Supervisor);
    let officer = user(Role::Officer);
    let officer_id = officer.id;
    let mut ports = Ports::with_case(case(CaseType::FlyTipping));
    ports
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(officer)));
    ports.cases.expect_update().return_once(|_, _| Ok(()));
    ports
        .audit
        .expect_record()
        .withf(|entry| entry.details.contains("Assigned to"))
        .times(1)
        .return_once(|_| Ok(()));
    ports
        .notifications
        .expect_add()
        .withf(move |note| note.user_id == officer_id && note.title == "Case Assigned")
        .times(1)
        .return_once(|_| Err(RepositoryError::connection("queue offline")));

    let updated = ports
        .build()
        .update(
            &supervisor,
            &CaseId::random(),
            CaseUpdate {
                assignee: Some(AssigneeChange::Assign(officer_id)),
                ..CaseUpdate::default()
            },
        )
        .await
        .expect("assignment succeeds");
    assert_eq!(updated.status, CaseStatus::Assigned);
}

#[tokio::test]
async fn officer_reassignment_is_refused_and_logged() {
    let officer = user(Role::Officer);
    let mut stored = case(CaseType::FlyTipping);
    stored.assigned_to = Some(officer.id);
    let mut ports = Ports::with_case(stored);
    ports.users.expect_find_by_id().returning(|_| Ok(None));
    ports
        .audit
        .expect_record_access()
        .withf(|decision| !decision.allowed && decision.action == "update")
        .times(1)
        .return_once(|_| Ok(()));
    ports.cases.expect_update().never();

    let error = ports
        .build()
        .update(
            &officer,
            &CaseId::random(),
            CaseUpdate {
                assignee: Some(AssigneeChange::Assign(UserId::random())),
                ..CaseUpdate::default()
            },
        )
        .await
        .expect_err("officer cannot reassign");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn unchanged_relocation_skips_the_write() {
    let manager = user(Role::Manager);
    let stored = case(CaseType::FlyTipping);
    let same = stored.location.clone();
    let mut ports = Ports::with_case(stored);
    ports.cases.expect_update().never();
    ports.audit.expect_record().never();

    let result = ports
        .build()
        .relocate(&manager, &CaseId::random(), same)
        .await
        .expect("no-op relocation");
    assert!(result.location_history.is_empty());
}

#[tokio::test]
async fn public_reports_respect_the_settings_switch() {
    let mut ports = Ports::default();
    ports.settings.expect_load().return_once(|| {
        Ok(Some(SystemSettings {
            enable_public_reporting: false,
            ..SystemSettings::default()
        }))
    });
    ports.cases.expect_insert().never();

    let error = ports
        .build()
        .submit_public_report(PublicReport {
            case_type: CaseType::Littering,
            description: "Litter outside school".into(),
            location: Location::default(),
            reporter_name: None,
            reporter_contact: None,
            type_specific_fields: TypeSpecificFields::default(),
            evidence_files: Vec::new(),
        })
        .await
        .expect_err("disabled");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn public_reports_store_evidence_and_alert_supervisors() {
    let supervisor = user(Role::Supervisor);
    let supervisor_id = supervisor.id;
    let staff = vec![supervisor, user(Role::Officer), user(Role::Manager)];
    let mut ports = Ports::default();
    ports.settings.expect_load().return_once(|| Ok(None));
    ports.cases.expect_count().return_once(|| Ok(6));
    ports
        .cases
        .expect_insert()
        .withf(|case| case.reporting_source == ReportingSource::Public && case.created_by.is_none())
        .return_once(|_| Ok(()));
    ports
        .evidence
        .expect_add()
        .withf(|item| item.filename == "public_upload_1" && item.uploaded_by.is_none())
        .times(1)
        .return_once(|_| Ok(()));
    ports
        .audit
        .expect_record()
        .withf(|entry| entry.performed_by.is_none() && entry.performed_by_name == PUBLIC_REPORTER_NAME)
        .return_once(|_| Ok(()));
    ports.users.expect_list().return_once(move || Ok(staff));
    ports
        .notifications
        .expect_add()
        .withf(move |note| note.user_id == supervisor_id && note.title == "New Public Report")
        .times(1)
        .return_once(|_| Ok(()));

    let receipt = ports
        .build()
        .submit_public_report(PublicReport {
            case_type: CaseType::DogFouling,
            description: "Repeated fouling by the park gate".into(),
            location: Location::default(),
            reporter_name: Some("A Resident".into()),
            reporter_contact: None,
            type_specific_fields: TypeSpecificFields::default(),
            evidence_files: vec!["aGVsbG8=".into()],
        })
        .await
        .expect("report accepted");
    assert_eq!(receipt.reference_number, "DF-26-00007");
}

#[rstest]
#[case("")]
#[case("not base64!")]
#[tokio::test]
async fn evidence_uploads_validate_before_loading(#[case] data: &str) {
    let mut ports = Ports::default();
    ports.cases.expect_find_by_id().never();
    let error = ports
        .build()
        .add_evidence(
            &user(Role::Manager),
            &CaseId::random(),
            NewEvidence {
                filename: if data.is_empty() { String::new() } else { "photo.jpg".into() },
                file_type: "image/jpeg".into(),
                file_data: data.to_owned(),
            },
        )
        .await
        .expect_err("rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn officers_cannot_delete_evidence() {
    let mut ports = Ports::default();
    ports
        .audit
        .expect_record_access()
        .times(1)
        .return_once(|_| Ok(()));
    ports.evidence.expect_delete().never();

    let error = ports
        .build()
        .delete_evidence(&user(Role::Officer), &CaseId::random(), &EvidenceId::random())
        .await
        .expect_err("officer");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn list_applies_visibility_then_filters() {
    let north = team("North", TeamType::Enforcement);
    let south = team("South", TeamType::Enforcement);
    let officer = user_in(Role::Officer, &[north.id]);

    let open_north = case_owned_by(CaseType::FlyTipping, north.id);
    let mut mine = case_owned_by(CaseType::DogFouling, north.id);
    mine.assigned_to = Some(officer.id);
    let mut someone_elses = case_owned_by(CaseType::DogFouling, north.id);
    someone_elses.assigned_to = Some(UserId::random());
    let other_team = case_owned_by(CaseType::FlyTipping, south.id);
    let unowned = case(CaseType::Littering);

    let all = vec![
        open_north.clone(),
        mine.clone(),
        someone_elses,
        other_team,
        unowned.clone(),
    ];
    let mut ports = Ports::default();
    ports.cases.expect_list().returning(move || Ok(all.clone()));
    let service = ports.build();

    let visible = service
        .list(&officer, &CaseFilter::default())
        .await
        .expect("listed");
    let ids: Vec<_> = visible.iter().map(|case| case.id).collect();
    assert_eq!(ids, vec![open_north.id, mine.id, unowned.id]);

    let unassigned = service
        .list(
            &officer,
            &CaseFilter {
                unassigned: true,
                ..CaseFilter::default()
            },
        )
        .await
        .expect("listed");
    assert_eq!(unassigned.len(), 2);

    let by_type = service
        .list(
            &officer,
            &CaseFilter {
                case_type: Some(CaseType::DogFouling),
                ..CaseFilter::default()
            },
        )
        .await
        .expect("listed");
    assert_eq!(by_type.len(), 1);
}
