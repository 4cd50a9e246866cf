//! User accounts and roles.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{TeamId, UserId};

/// Fixed role set. Ordering reflects increasing privilege.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Officer,
    Supervisor,
    Manager,
}

impl Role {
    /// Wire representation of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Officer => "officer",
            Self::Supervisor => "supervisor",
            Self::Manager => "manager",
        }
    }

    pub const fn is_officer(self) -> bool {
        matches!(self, Self::Officer)
    }

    pub const fn is_manager(self) -> bool {
        matches!(self, Self::Manager)
    }

    /// Supervisors and managers.
    pub const fn is_supervisory(self) -> bool {
        matches!(self, Self::Supervisor | Self::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque stored password digest produced by the credential service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// A council staff account.
///
/// `cross_team_access` only has an effect for supervisors; the visibility
/// policy ignores it for other roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub teams: Vec<TeamId>,
    #[serde(default)]
    pub cross_team_access: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub password_hash: PasswordHash,
}

impl User {
    /// Whether the user belongs to `team`.
    pub fn is_member_of(&self, team: &TeamId) -> bool {
        self.teams.contains(team)
    }
}
