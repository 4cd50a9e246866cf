//! Team administration and the case-type to team mapping.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::{CaseRepository, TeamRepository, UserRepository};
use crate::domain::{AuditEmitter, CaseType, Error, Resource, Team, TeamId, TeamType, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    pub team_type: TeamType,
    pub description: String,
}

/// Partial team update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl TeamPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_active.is_none()
    }
}

/// Teams eligible for one case type.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CaseTypeTeams {
    pub case_type: CaseType,
    pub allowed_team_types: Vec<TeamType>,
    /// Active teams whose type is allowed.
    pub available_teams: Vec<Team>,
}

#[derive(Clone)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
    cases: Arc<dyn CaseRepository>,
    emitter: AuditEmitter,
}

impl TeamService {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        users: Arc<dyn UserRepository>,
        cases: Arc<dyn CaseRepository>,
        emitter: AuditEmitter,
    ) -> Self {
        Self {
            teams,
            users,
            cases,
            emitter,
        }
    }

    pub async fn list(&self) -> Result<Vec<Team>, Error> {
        Ok(self.teams.list().await?)
    }

    pub async fn get(&self, id: &TeamId) -> Result<Team, Error> {
        self.teams
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Team not found"))
    }

    pub async fn members(&self, id: &TeamId) -> Result<Vec<User>, Error> {
        let team = self.get(id).await?;
        let users = self.users.list().await?;
        Ok(users
            .into_iter()
            .filter(|user| user.is_member_of(&team.id))
            .collect())
    }

    async fn ensure_name_free(&self, name: &str, except: Option<TeamId>) -> Result<(), Error> {
        match self.teams.find_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => Err(Error::invalid_request(
                "Team with this name already exists",
            )),
            _ => Ok(()),
        }
    }

    /// Create a team. Managers only; names are unique.
    pub async fn create(&self, actor: &User, request: NewTeam) -> Result<Team, Error> {
        self.emitter
            .ensure(
                actor.role.is_manager(),
                actor,
                Resource::Collection("teams"),
                "create",
                "Only managers can create teams",
            )
            .await?;
        let name = request.name.trim();
        if name.is_empty() {
            return Err(Error::invalid_request("name must not be empty"));
        }
        self.ensure_name_free(name, None).await?;

        let team = Team {
            id: TeamId::random(),
            name: name.to_owned(),
            team_type: request.team_type,
            description: request.description,
            is_active: true,
            created_at: self.emitter.now(),
        };
        self.teams.save(&team).await?;
        self.emitter
            .allow(
                actor,
                Resource::Team(team.id),
                "create",
                format!("Created team {}", team.name),
            )
            .await?;
        info!(team_id = %team.id, team_type = team.team_type.as_str(), "team created");
        Ok(team)
    }

    /// Patch a team. Managers only.
    pub async fn update(&self, actor: &User, id: &TeamId, patch: TeamPatch) -> Result<Team, Error> {
        self.emitter
            .ensure(
                actor.role.is_manager(),
                actor,
                Resource::Team(*id),
                "update",
                "Only managers can update teams",
            )
            .await?;
        let mut team = self.get(id).await?;
        if patch.is_empty() {
            return Err(Error::invalid_request("No valid fields to update"));
        }
        if let Some(name) = &patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::invalid_request("name must not be empty"));
            }
            self.ensure_name_free(name, Some(team.id)).await?;
            team.name = name.to_owned();
        }
        if let Some(description) = patch.description {
            team.description = description;
        }
        if let Some(is_active) = patch.is_active {
            team.is_active = is_active;
        }
        self.teams.save(&team).await?;
        self.emitter
            .allow(
                actor,
                Resource::Team(team.id),
                "update",
                format!("Updated team {}", team.name),
            )
            .await?;
        Ok(team)
    }

    /// Delete a team that owns no cases and drop it from every membership.
    pub async fn delete(&self, actor: &User, id: &TeamId) -> Result<(), Error> {
        self.emitter
            .ensure(
                actor.role.is_manager(),
                actor,
                Resource::Team(*id),
                "delete",
                "Only managers can delete teams",
            )
            .await?;
        let owned = self
            .cases
            .list()
            .await?
            .iter()
            .filter(|case| case.owning_team == Some(*id))
            .count();
        if owned > 0 {
            return Err(Error::invalid_request(format!(
                "Cannot delete team with {owned} assigned cases"
            )));
        }
        if !self.teams.delete(id).await? {
            return Err(Error::not_found("Team not found"));
        }
        for mut member in self.users.list().await? {
            if member.is_member_of(id) {
                member.teams.retain(|team| team != id);
                self.users.save(&member).await?;
            }
        }
        self.emitter
            .allow(actor, Resource::Team(*id), "delete", "Deleted team")
            .await?;
        info!(team_id = %id, "team deleted");
        Ok(())
    }

    /// For every case type, its allowed team types and the active teams of
    /// those types.
    pub async fn case_type_mapping(&self) -> Result<Vec<CaseTypeTeams>, Error> {
        let teams = self.teams.list().await?;
        Ok(CaseType::ALL
            .iter()
            .map(|case_type| {
                let allowed = case_type.team_types();
                CaseTypeTeams {
                    case_type: *case_type,
                    allowed_team_types: allowed.to_vec(),
                    available_teams: teams
                        .iter()
                        .filter(|team| team.is_active && allowed.contains(&team.team_type))
                        .cloned()
                        .collect(),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockAuditRepository, MockCaseRepository, MockNotificationRepository, MockTeamRepository,
        MockUserRepository,
    };
    use crate::domain::test_support::{case_owned_by, fixture_clock, team, user, user_in};
    use crate::domain::{ErrorCode, Role};

    #[derive(Default)]
    struct Ports {
        teams: MockTeamRepository,
        users: MockUserRepository,
        cases: MockCaseRepository,
        audit: MockAuditRepository,
    }

    impl Ports {
        fn build(self) -> TeamService {
            TeamService::new(
                Arc::new(self.teams),
                Arc::new(self.users),
                Arc::new(self.cases),
                AuditEmitter::new(
                    Arc::new(self.audit),
                    Arc::new(MockNotificationRepository::new()),
                    fixture_clock(),
                ),
            )
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_names() {
        let mut ports = Ports::default();
        ports
            .teams
            .expect_find_by_name()
            .withf(|name| name == "Waste Ops")
            .return_once(|_| Ok(Some(team("Waste Ops", TeamType::WasteManagement))));
        ports.teams.expect_save().never();

        let error = ports
            .build()
            .create(
                &user(Role::Manager),
                NewTeam {
                    name: "  Waste Ops ".into(),
                    team_type: TeamType::WasteManagement,
                    description: String::new(),
                },
            )
            .await
            .expect_err("duplicate");
        assert_eq!(error.message(), "Team with this name already exists");
    }

    #[tokio::test]
    async fn supervisors_cannot_create_teams() {
        let mut ports = Ports::default();
        ports
            .audit
            .expect_record_access()
            .times(1)
            .return_once(|_| Ok(()));
        let error = ports
            .build()
            .create(
                &user(Role::Supervisor),
                NewTeam {
                    name: "North".into(),
                    team_type: TeamType::Enforcement,
                    description: String::new(),
                },
            )
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn renaming_onto_the_same_team_is_allowed() {
        let existing = team("North", TeamType::Enforcement);
        let id = existing.id;
        let lookup = existing.clone();
        let mut ports = Ports::default();
        ports
            .teams
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        ports
            .teams
            .expect_find_by_name()
            .return_once(move |_| Ok(Some(lookup)));
        ports.teams.expect_save().times(1).return_once(|_| Ok(()));
        ports.audit.expect_record_access().return_once(|_| Ok(()));

        let updated = ports
            .build()
            .update(
                &user(Role::Manager),
                &id,
                TeamPatch {
                    name: Some("North".into()),
                    is_active: Some(false),
                    ..TeamPatch::default()
                },
            )
            .await
            .expect("updated");
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn teams_owning_cases_cannot_be_deleted() {
        let north = team("North", TeamType::Enforcement);
        let id = north.id;
        let mut ports = Ports::default();
        ports.cases.expect_list().return_once(move || {
            Ok(vec![
                case_owned_by(CaseType::DogFouling, id),
                case_owned_by(CaseType::HighHedges, id),
            ])
        });
        ports.teams.expect_delete().never();

        let error = ports
            .build()
            .delete(&user(Role::Manager), &id)
            .await
            .expect_err("in use");
        assert_eq!(error.message(), "Cannot delete team with 2 assigned cases");
    }

    #[tokio::test]
    async fn deleting_a_team_prunes_memberships() {
        let north = team("North", TeamType::Enforcement);
        let south = team("South", TeamType::Enforcement);
        let id = north.id;
        let keep = south.id;
        let member = user_in(Role::Officer, &[north.id, south.id]);
        let outsider = user_in(Role::Officer, &[south.id]);
        let mut ports = Ports::default();
        ports.cases.expect_list().return_once(|| Ok(Vec::new()));
        ports.teams.expect_delete().return_once(|_| Ok(true));
        ports
            .users
            .expect_list()
            .return_once(move || Ok(vec![member, outsider]));
        ports
            .users
            .expect_save()
            .withf(move |saved| saved.teams == vec![keep])
            .times(1)
            .return_once(|_| Ok(()));
        ports.audit.expect_record_access().return_once(|_| Ok(()));

        ports
            .build()
            .delete(&user(Role::Manager), &id)
            .await
            .expect("deleted");
    }

    #[tokio::test]
    async fn mapping_lists_active_teams_of_allowed_types() {
        let waste = team("Waste Ops", TeamType::WasteManagement);
        let enforcement = team("Enforcement", TeamType::Enforcement);
        let retired = Team {
            is_active: false,
            ..team("Old Waste", TeamType::WasteManagement)
        };
        let crimes = team("Env Crimes", TeamType::EnvironmentalCrimes);
        let all = vec![waste.clone(), enforcement.clone(), retired, crimes.clone()];
        let mut ports = Ports::default();
        ports.teams.expect_list().return_once(move || Ok(all));

        let mapping = ports.build().case_type_mapping().await.expect("mapping");
        assert_eq!(mapping.len(), CaseType::ALL.len());

        let fly_tipping = mapping
            .iter()
            .find(|entry| entry.case_type == CaseType::FlyTipping)
            .expect("fly tipping entry");
        let names: Vec<_> = fly_tipping
            .available_teams
            .iter()
            .map(|team| team.name.as_str())
            .collect();
        assert_eq!(names, vec!["Waste Ops", "Enforcement"]);

        let complex = mapping
            .iter()
            .find(|entry| entry.case_type == CaseType::ComplexEnvironmental)
            .expect("complex entry");
        assert_eq!(complex.allowed_team_types, vec![TeamType::EnvironmentalCrimes]);
        assert_eq!(complex.available_teams, vec![crimes]);
    }
}
