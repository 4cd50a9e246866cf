//! Case use-cases: creation, listing, the update contract, self-assignment,
//! notes, evidence and the audit trail.
//!
//! Every case-scoped operation loads the case and consults the visibility
//! policy before doing anything else. Writes go through the revision-checked
//! repository so a guard evaluated on a stale read cannot be overtaken.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::info;

use crate::domain::assignment::{self, AssigneeChange};
use crate::domain::lifecycle::{self, CaseUpdate, TransitionError, UpdateContext};
use crate::domain::ports::{
    CaseNoteRepository, CaseRepository, EvidenceRepository, SettingsRepository, TeamRepository,
    UserRepository,
};
use crate::domain::visibility::{self, AccessDenial};
use crate::domain::{
    AuditAction, AuditEmitter, AuditLog, Case, CaseId, CaseNote, CaseStatus, CaseType, Error,
    Evidence, EvidenceId, EvidenceSummary, Location, NoteId, PUBLIC_REPORTER_NAME,
    ReportingSource, Resource, Role, Team, TeamId, TypeSpecificFields, User, UserId,
    reference_number,
};

/// Stores the case service reads and writes.
#[derive(Clone)]
pub struct CaseStores {
    pub cases: Arc<dyn CaseRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub users: Arc<dyn UserRepository>,
    pub notes: Arc<dyn CaseNoteRepository>,
    pub evidence: Arc<dyn EvidenceRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

/// A case submitted by an authenticated user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCase {
    pub case_type: CaseType,
    pub description: String,
    pub location: Location,
    pub reporter_name: Option<String>,
    pub reporter_contact: Option<String>,
    pub type_specific_fields: TypeSpecificFields,
    pub reporting_source: ReportingSource,
    pub owning_team: Option<TeamId>,
}

/// A case submitted anonymously through the public form.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicReport {
    pub case_type: CaseType,
    pub description: String,
    pub location: Location,
    pub reporter_name: Option<String>,
    pub reporter_contact: Option<String>,
    pub type_specific_fields: TypeSpecificFields,
    /// Base64 encoded attachments.
    pub evidence_files: Vec<String>,
}

/// Acknowledgement returned to public reporters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicReceipt {
    pub case_id: CaseId,
    pub reference_number: String,
}

/// Optional list filters; all supplied filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    pub status: Option<CaseStatus>,
    pub case_type: Option<CaseType>,
    pub assigned_to: Option<UserId>,
    pub unassigned: bool,
    pub team_id: Option<TeamId>,
}

impl CaseFilter {
    fn matches(&self, case: &Case) -> bool {
        self.status.is_none_or(|status| case.status == status)
            && self.case_type.is_none_or(|case_type| case.case_type == case_type)
            && self.assigned_to.is_none_or(|user| case.assigned_to == Some(user))
            && (!self.unassigned || case.is_unassigned())
            && self.team_id.is_none_or(|team| case.owning_team == Some(team))
    }
}

/// An uploaded evidence file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvidence {
    pub filename: String,
    pub file_type: String,
    /// Base64 encoded payload.
    pub file_data: String,
}

fn require_text(value: &str, field: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::invalid_request(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_base64(data: &str, label: &str) -> Result<(), Error> {
    BASE64
        .decode(data.trim())
        .map(drop)
        .map_err(|_| Error::invalid_request(format!("{label} is not valid base64 data")))
}

#[derive(Clone)]
pub struct CaseService {
    stores: CaseStores,
    emitter: AuditEmitter,
}

impl CaseService {
    pub fn new(stores: CaseStores, emitter: AuditEmitter) -> Self {
        Self { stores, emitter }
    }

    /// Pick the owning team for a new case.
    ///
    /// An explicit team must exist. Otherwise the creator's first team able
    /// to handle the case type wins, then simply their first team.
    async fn resolve_owning_team(
        &self,
        actor: &User,
        case_type: CaseType,
        requested: Option<TeamId>,
    ) -> Result<Option<Team>, Error> {
        if let Some(team_id) = requested {
            return match self.stores.teams.find_by_id(&team_id).await? {
                Some(team) => Ok(Some(team)),
                None => Err(Error::invalid_request(format!("Invalid team ID: {team_id}"))),
            };
        }
        if actor.teams.is_empty() {
            return Ok(None);
        }
        let all = self.stores.teams.list().await?;
        let mine: Vec<Team> = actor
            .teams
            .iter()
            .filter_map(|id| all.iter().find(|team| team.id == *id).cloned())
            .collect();
        let preferred = mine
            .iter()
            .find(|team| visibility::team_types_handle(&[team.team_type], case_type));
        Ok(preferred.or(mine.first()).cloned())
    }

    async fn next_reference(&self, case_type: CaseType) -> Result<String, Error> {
        let existing = self.stores.cases.count().await?;
        Ok(reference_number(case_type, self.emitter.now(), existing))
    }

    fn blank_case(
        &self,
        case_type: CaseType,
        reference: String,
        description: String,
        location: Location,
        type_specific_fields: TypeSpecificFields,
    ) -> Case {
        let now = self.emitter.now();
        Case {
            id: CaseId::random(),
            reference_number: reference,
            case_type,
            status: CaseStatus::New,
            description,
            location,
            location_history: Vec::new(),
            location_resolved_at: None,
            reporter_name: None,
            reporter_contact: None,
            reporting_source: ReportingSource::Officer,
            type_specific_fields,
            owning_team: None,
            owning_team_name: None,
            assigned_to: None,
            assigned_to_name: None,
            created_by: None,
            created_at: now,
            updated_at: now,
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

    /// Open a new case on behalf of `actor`.
    pub async fn create(&self, actor: &User, request: NewCase) -> Result<Case, Error> {
        require_text(&request.description, "description")?;
        lifecycle::validate_type_specific_fields(request.case_type, &request.type_specific_fields)?;
        let team = self
            .resolve_owning_team(actor, request.case_type, request.owning_team)
            .await?;
        let reference = self.next_reference(request.case_type).await?;

        let mut case = self.blank_case(
            request.case_type,
            reference,
            request.description,
            request.location,
            request.type_specific_fields,
        );
        case.reporter_name = request.reporter_name;
        case.reporter_contact = request.reporter_contact;
        case.reporting_source = request.reporting_source;
        case.created_by = Some(actor.id);
        if let Some(team) = team {
            case.owning_team = Some(team.id);
            case.owning_team_name = Some(team.name);
        }

        self.stores.cases.insert(&case).await?;
        self.emitter
            .case_event(
                case.id,
                AuditAction::Created,
                format!("Case {} created", case.reference_number),
                actor,
            )
            .await?;
        info!(case_id = %case.id, reference = %case.reference_number, "case created");
        Ok(case)
    }

    /// Accept an anonymous public report.
    pub async fn submit_public_report(&self, report: PublicReport) -> Result<PublicReceipt, Error> {
        let settings = self.stores.settings.load().await?.unwrap_or_default();
        if !settings.enable_public_reporting {
            return Err(Error::forbidden("Public reporting is disabled"));
        }
        require_text(&report.description, "description")?;
        lifecycle::validate_type_specific_fields(report.case_type, &report.type_specific_fields)?;
        for (index, data) in report.evidence_files.iter().enumerate() {
            require_base64(data, &format!("evidence file {}", index + 1))?;
        }

        let reference = self.next_reference(report.case_type).await?;
        let mut case = self.blank_case(
            report.case_type,
            reference,
            report.description,
            report.location,
            report.type_specific_fields,
        );
        case.reporter_name = report.reporter_name;
        case.reporter_contact = report.reporter_contact;
        case.reporting_source = ReportingSource::Public;
        self.stores.cases.insert(&case).await?;

        for (index, file_data) in report.evidence_files.into_iter().enumerate() {
            let evidence = Evidence {
                id: EvidenceId::random(),
                case_id: case.id,
                filename: format!("public_upload_{}", index + 1),
                file_type: "image/jpeg".to_owned(),
                file_data,
                uploaded_by: None,
                uploaded_by_name: PUBLIC_REPORTER_NAME.to_owned(),
                uploaded_at: self.emitter.now(),
            };
            self.stores.evidence.add(&evidence).await?;
        }
        self.emitter
            .public_case_event(
                case.id,
                AuditAction::Created,
                format!("Case {} submitted by public report", case.reference_number),
            )
            .await?;
        self.notify_supervisors(&case).await;
        info!(case_id = %case.id, reference = %case.reference_number, "public report received");
        Ok(PublicReceipt {
            case_id: case.id,
            reference_number: case.reference_number,
        })
    }

    async fn notify_supervisors(&self, case: &Case) {
        let supervisors = match self.stores.users.list().await {
            Ok(users) => users,
            Err(error) => {
                tracing::warn!(%error, "could not load supervisors to notify");
                return;
            }
        };
        let message = format!(
            "A new {} report ({}) has been submitted",
            case.case_type.label(),
            case.reference_number
        );
        for supervisor in supervisors
            .iter()
            .filter(|user| user.role == Role::Supervisor && user.is_active)
        {
            self.emitter
                .notify(supervisor.id, "New Public Report", message.clone(), Some(case.id))
                .await;
        }
    }

    /// Cases visible to `actor`, newest first.
    pub async fn list(&self, actor: &User, filter: &CaseFilter) -> Result<Vec<Case>, Error> {
        let cases = self.stores.cases.list().await?;
        Ok(cases
            .into_iter()
            .filter(|case| visibility::can_view(actor, case) && filter.matches(case))
            .collect())
    }

    async fn deny(&self, actor: &User, case_id: CaseId, action: &str, denial: AccessDenial) -> Error {
        self.emitter
            .deny(
                actor,
                Resource::Case(case_id),
                action,
                denial.reason(),
                denial.message(),
            )
            .await
    }

    /// Load a case and apply the visibility policy.
    async fn load_visible(&self, actor: &User, id: &CaseId, action: &str) -> Result<Case, Error> {
        let case = self
            .stores
            .cases
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Case not found"))?;
        if let Err(denial) = visibility::check_case_access(actor, &case) {
            return Err(self.deny(actor, case.id, action, denial).await);
        }
        Ok(case)
    }

    async fn reject(&self, actor: &User, case_id: CaseId, action: &str, error: TransitionError) -> Error {
        match error {
            TransitionError::Forbidden(message) => {
                self.emitter
                    .deny(actor, Resource::Case(case_id), action, message, message)
                    .await
            }
            other => other.into(),
        }
    }

    async fn persist(&self, current: &Case, mut next: Case) -> Result<Case, Error> {
        next.revision = current.revision + 1;
        self.stores.cases.update(&next, current.revision).await?;
        Ok(next)
    }

    pub async fn get(&self, actor: &User, id: &CaseId) -> Result<Case, Error> {
        self.load_visible(actor, id, "view").await
    }

    /// Apply the update contract.
    pub async fn update(&self, actor: &User, id: &CaseId, update: CaseUpdate) -> Result<Case, Error> {
        let current = self.load_visible(actor, id, "update").await?;
        let assignee = match update.assignee {
            Some(AssigneeChange::Assign(user_id)) => self.stores.users.find_by_id(&user_id).await?,
            _ => None,
        };
        let team = match update.owning_team {
            Some(team_id) => self.stores.teams.find_by_id(&team_id).await?,
            None => None,
        };
        let ctx = UpdateContext {
            actor,
            now: self.emitter.now(),
            assignee: assignee.as_ref(),
            team: team.as_ref(),
        };
        let applied = match lifecycle::apply_update(&current, update, &ctx) {
            Ok(applied) => applied,
            Err(error) => return Err(self.reject(actor, current.id, "update", error).await),
        };

        let saved = self.persist(&current, applied.case).await?;
        if let Some(summary) = applied.summary {
            self.emitter
                .case_event(saved.id, AuditAction::Updated, summary, actor)
                .await?;
        }
        if let Some(assignee) = applied.newly_assigned {
            self.emitter
                .notify(
                    assignee,
                    "Case Assigned",
                    format!("Case {} has been assigned to you", saved.reference_number),
                    Some(saved.id),
                )
                .await;
        }
        if saved.status != current.status {
            info!(case_id = %saved.id, from = %current.status, to = %saved.status, "case status changed");
        }
        Ok(saved)
    }

    /// Move a case pin, archiving the previous location.
    pub async fn relocate(&self, actor: &User, id: &CaseId, location: Location) -> Result<Case, Error> {
        let current = self.load_visible(actor, id, "update_location").await?;
        let relocation = match lifecycle::relocate(&current, location, actor, self.emitter.now()) {
            Ok(relocation) => relocation,
            Err(error) => return Err(self.reject(actor, current.id, "update_location", error).await),
        };
        let Some(summary) = relocation.summary else {
            return Ok(current);
        };
        let saved = self.persist(&current, relocation.case).await?;
        self.emitter
            .case_event(saved.id, AuditAction::LocationUpdated, summary, actor)
            .await?;
        Ok(saved)
    }

    /// Claim an unassigned, open case for `actor`.
    ///
    /// # Errors
    /// `InvalidRequest` when the case is closed or already has an assignee,
    /// including when a concurrent claim lands between the read and the
    /// write.
    pub async fn self_assign(&self, actor: &User, id: &CaseId) -> Result<Case, Error> {
        let current = self.load_visible(actor, id, "self_assign").await?;
        let next = assignment::self_assign(&current, actor, self.emitter.now())?;
        let saved = self.persist(&current, next).await.map_err(|error| {
            if error.code() == crate::domain::ErrorCode::Conflict {
                Error::invalid_request(assignment::ALREADY_ASSIGNED)
            } else {
                error
            }
        })?;
        self.emitter
            .case_event(
                saved.id,
                AuditAction::SelfAssigned,
                format!("Self-assigned by {}", actor.name),
                actor,
            )
            .await?;
        info!(case_id = %saved.id, user_id = %actor.id, "case self-assigned");
        Ok(saved)
    }

    pub async fn add_note(&self, actor: &User, id: &CaseId, content: String) -> Result<CaseNote, Error> {
        require_text(&content, "content")?;
        let case = self.load_visible(actor, id, "add_note").await?;
        let note = CaseNote {
            id: NoteId::random(),
            case_id: case.id,
            content,
            created_by: actor.id,
            created_by_name: actor.name.clone(),
            created_at: self.emitter.now(),
        };
        self.stores.notes.add(&note).await?;
        self.emitter
            .case_event(case.id, AuditAction::NoteAdded, "Added a note", actor)
            .await?;
        Ok(note)
    }

    pub async fn notes(&self, actor: &User, id: &CaseId) -> Result<Vec<CaseNote>, Error> {
        let case = self.load_visible(actor, id, "view_notes").await?;
        Ok(self.stores.notes.list_for_case(&case.id).await?)
    }

    pub async fn add_evidence(
        &self,
        actor: &User,
        id: &CaseId,
        upload: NewEvidence,
    ) -> Result<EvidenceSummary, Error> {
        require_text(&upload.filename, "filename")?;
        require_base64(&upload.file_data, "file_data")?;
        let case = self.load_visible(actor, id, "upload_evidence").await?;
        let evidence = Evidence {
            id: EvidenceId::random(),
            case_id: case.id,
            filename: upload.filename,
            file_type: upload.file_type,
            file_data: upload.file_data,
            uploaded_by: Some(actor.id),
            uploaded_by_name: actor.name.clone(),
            uploaded_at: self.emitter.now(),
        };
        self.stores.evidence.add(&evidence).await?;
        self.emitter
            .case_event(
                case.id,
                AuditAction::EvidenceUploaded,
                format!("Uploaded: {}", evidence.filename),
                actor,
            )
            .await?;
        Ok(EvidenceSummary::from(&evidence))
    }

    pub async fn evidence(&self, actor: &User, id: &CaseId) -> Result<Vec<EvidenceSummary>, Error> {
        let case = self.load_visible(actor, id, "view_evidence").await?;
        let items = self.stores.evidence.list_for_case(&case.id).await?;
        Ok(items.iter().map(EvidenceSummary::from).collect())
    }

    /// Remove an evidence item. Officers may not delete evidence.
    pub async fn delete_evidence(
        &self,
        actor: &User,
        case_id: &CaseId,
        evidence_id: &EvidenceId,
    ) -> Result<(), Error> {
        if actor.role.is_officer() {
            return Err(self
                .emitter
                .deny(
                    actor,
                    Resource::Evidence(*evidence_id),
                    "delete",
                    "Officer role",
                    "Officers cannot delete evidence",
                )
                .await);
        }
        let case = self.load_visible(actor, case_id, "delete_evidence").await?;
        if !self.stores.evidence.delete(&case.id, evidence_id).await? {
            return Err(Error::not_found("Evidence not found"));
        }
        self.emitter
            .case_event(
                case.id,
                AuditAction::EvidenceDeleted,
                format!("Deleted evidence {evidence_id}"),
                actor,
            )
            .await
    }

    pub async fn audit_log(&self, actor: &User, id: &CaseId) -> Result<Vec<AuditLog>, Error> {
        let case = self.load_visible(actor, id, "view_audit_log").await?;
        self.emitter.history(&case.id).await
    }
}

#[cfg(test)]
#[path = "case_service_tests.rs"]
mod tests;
