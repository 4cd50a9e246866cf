//! Staff account administration.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{CredentialService, TeamRepository, UserRepository};
use crate::domain::{
    AuditEmitter, Error, Resource, Role, TeamId, User, UserId, normalise_email,
};

/// Input for creating an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: zeroize::Zeroizing<String>,
    pub name: String,
    pub role: Role,
    pub teams: Vec<TeamId>,
    pub cross_team_access: bool,
}

/// Partial account update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub teams: Option<Vec<TeamId>>,
    pub cross_team_access: Option<bool>,
}

impl UserPatch {
    /// Names of the supplied fields, in declaration order.
    pub fn field_names(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_some()),
            ("role", self.role.is_some()),
            ("is_active", self.is_active.is_some()),
            ("teams", self.teams.is_some()),
            ("cross_team_access", self.cross_team_access.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }

    fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        if let Some(teams) = self.teams {
            user.teams = teams;
        }
        if let Some(cross_team_access) = self.cross_team_access {
            user.cross_team_access = cross_team_access;
        }
    }
}

#[derive(Clone)]
pub struct UserAdminService {
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    credentials: Arc<dyn CredentialService>,
    emitter: AuditEmitter,
}

impl UserAdminService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
        credentials: Arc<dyn CredentialService>,
        emitter: AuditEmitter,
    ) -> Self {
        Self {
            users,
            teams,
            credentials,
            emitter,
        }
    }

    /// Reject team ids that do not resolve to a stored team.
    async fn check_team_ids(&self, ids: &[TeamId]) -> Result<(), Error> {
        if ids.is_empty() {
            return Ok(());
        }
        let known = self.teams.list().await?;
        let invalid: Vec<String> = ids
            .iter()
            .filter(|id| !known.iter().any(|team| team.id == **id))
            .map(ToString::to_string)
            .collect();
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(Error::invalid_request(format!(
                "Invalid team IDs: {}",
                invalid.join(", ")
            )))
        }
    }

    /// Create an account. Managers only.
    pub async fn register(&self, actor: &User, request: NewUser) -> Result<User, Error> {
        self.emitter
            .ensure(
                actor.role.is_manager(),
                actor,
                Resource::Collection("users"),
                "create",
                "Only managers can create users",
            )
            .await?;
        let email = normalise_email(&request.email)
            .map_err(|error| Error::invalid_request(error.to_string()))?;
        if request.password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        if request.name.trim().is_empty() {
            return Err(Error::invalid_request("name must not be empty"));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(Error::invalid_request("Email already registered"));
        }
        self.check_team_ids(&request.teams).await?;

        let user = User {
            id: UserId::random(),
            email,
            name: request.name.trim().to_owned(),
            role: request.role,
            teams: request.teams,
            cross_team_access: request.cross_team_access,
            is_active: true,
            created_at: self.emitter.now(),
            password_hash: self.credentials.hash(&request.password)?,
        };
        self.users.save(&user).await?;
        self.emitter
            .allow(
                actor,
                Resource::User(user.id),
                "create",
                format!("Created user {}", user.email),
            )
            .await?;
        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Every account. Supervisors and managers only.
    pub async fn list(&self, actor: &User) -> Result<Vec<User>, Error> {
        self.emitter
            .ensure(
                actor.role.is_supervisory(),
                actor,
                Resource::Collection("users"),
                "list",
                "Insufficient permissions",
            )
            .await?;
        Ok(self.users.list().await?)
    }

    pub async fn get(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Patch an account. Managers only.
    pub async fn update(&self, actor: &User, id: &UserId, patch: UserPatch) -> Result<User, Error> {
        self.emitter
            .ensure(
                actor.role.is_manager(),
                actor,
                Resource::User(*id),
                "update",
                "Only managers can update users",
            )
            .await?;
        let fields = patch.field_names();
        if fields.is_empty() {
            return Err(Error::invalid_request("No valid fields to update"));
        }
        if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(Error::invalid_request("name must not be empty"));
        }
        if let Some(teams) = &patch.teams {
            self.check_team_ids(teams).await?;
        }
        let mut user = self.get(id).await?;
        patch.apply(&mut user);
        self.users.save(&user).await?;
        self.emitter
            .allow(
                actor,
                Resource::User(user.id),
                "update",
                format!("Updated fields: {}", fields.join(", ")),
            )
            .await?;
        Ok(user)
    }

    /// Remove an account. Managers only; nobody may delete themselves.
    pub async fn delete(&self, actor: &User, id: &UserId) -> Result<(), Error> {
        self.emitter
            .ensure(
                actor.role.is_manager(),
                actor,
                Resource::User(*id),
                "delete",
                "Only managers can delete users",
            )
            .await?;
        if *id == actor.id {
            return Err(Error::invalid_request("Cannot delete yourself"));
        }
        if !self.users.delete(id).await? {
            return Err(Error::not_found("User not found"));
        }
        self.emitter
            .allow(actor, Resource::User(*id), "delete", "Deleted user")
            .await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_admin_service_tests.rs"]
mod tests;
