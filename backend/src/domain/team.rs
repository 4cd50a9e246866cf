//! Teams and team types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TeamId;

/// Organisational function of a team; gates which case types it handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamType {
    Enforcement,
    EnvironmentalCrimes,
    WasteManagement,
}

impl TeamType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enforcement => "enforcement",
            Self::EnvironmentalCrimes => "environmental_crimes",
            Self::WasteManagement => "waste_management",
        }
    }
}

/// A council team that can own cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Team {
    pub id: TeamId,
    /// Unique across all teams.
    pub name: String,
    pub team_type: TeamType,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
