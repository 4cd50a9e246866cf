//! The enforcement case record and its value types.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CaseId, CaseType, TeamId, TypeSpecificFields, TypeSpecificFieldsWire, UserId};

/// Lifecycle state of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    New,
    Assigned,
    Investigating,
    Closed,
}

impl CaseStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Assigned => "assigned",
            Self::Investigating => "investigating",
            Self::Closed => "closed",
        }
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who reported the case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportingSource {
    Public,
    #[default]
    Officer,
    Other,
}

/// Why a case was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClosureReason {
    Resolved,
    NoFurtherAction,
    FpnIssued,
    Prosecution,
    Duplicate,
    InsufficientEvidence,
    Other,
}

impl ClosureReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::NoFurtherAction => "no_further_action",
            Self::FpnIssued => "fpn_issued",
            Self::Prosecution => "prosecution",
            Self::Duplicate => "duplicate",
            Self::InsufficientEvidence => "insufficient_evidence",
            Self::Other => "other",
        }
    }
}

/// Where the offence happened. Every component is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub postcode: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub what3words: Option<String>,
}

impl Location {
    /// Whether any tracked component differs from `other`.
    pub fn differs_from(&self, other: &Location) -> bool {
        self.latitude != other.latitude
            || self.longitude != other.longitude
            || self.address != other.address
            || self.postcode != other.postcode
            || self.what3words != other.what3words
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `(lat, lng)` with `N/A` for missing components.
    pub fn coordinates_label(&self) -> String {
        let show = |v: Option<f64>| v.map_or_else(|| "N/A".to_owned(), |v| v.to_string());
        format!("({}, {})", show(self.latitude), show(self.longitude))
    }

    pub fn address_label(&self) -> &str {
        self.address.as_deref().unwrap_or("unknown")
    }
}

/// A superseded location with who replaced it and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationHistoryEntry {
    pub location: Location,
    pub changed_by: UserId,
    pub changed_by_name: String,
    pub changed_at: DateTime<Utc>,
}

/// Fixed Penalty Notice record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FpnDetails {
    pub fpn_ref: Option<String>,
    pub date_issued: Option<NaiveDate>,
    pub fpn_amount: Option<f64>,
    #[serde(default)]
    pub paid: bool,
    pub date_paid: Option<NaiveDate>,
    pub pay_reference: Option<String>,
}

/// An enforcement case.
///
/// `revision` increments on every successful write and guards against lost
/// updates; see the case repository port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Case {
    pub id: CaseId,
    pub reference_number: String,
    pub case_type: CaseType,
    pub status: CaseStatus,
    pub description: String,
    pub location: Location,
    #[serde(default)]
    pub location_history: Vec<LocationHistoryEntry>,
    pub location_resolved_at: Option<DateTime<Utc>>,
    pub reporter_name: Option<String>,
    pub reporter_contact: Option<String>,
    #[serde(default)]
    pub reporting_source: ReportingSource,
    #[serde(default)]
    #[schema(value_type = TypeSpecificFieldsWire)]
    pub type_specific_fields: TypeSpecificFields,
    pub owning_team: Option<TeamId>,
    pub owning_team_name: Option<String>,
    pub assigned_to: Option<UserId>,
    pub assigned_to_name: Option<String>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closure_reason: Option<ClosureReason>,
    pub final_note: Option<String>,
    pub closed_by: Option<UserId>,
    pub closed_by_name: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fpn_issued: bool,
    pub fpn_details: Option<FpnDetails>,
    #[serde(default)]
    pub revision: u64,
}

impl Case {
    pub fn is_assigned_to(&self, user: &UserId) -> bool {
        self.assigned_to.as_ref() == Some(user)
    }

    pub fn is_unassigned(&self) -> bool {
        self.assigned_to.is_none()
    }
}
