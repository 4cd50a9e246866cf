//! Append-only child records of a case: notes and evidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CaseId, EvidenceId, NoteId, UserId};

/// Free-text note left on a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CaseNote {
    pub id: NoteId,
    pub case_id: CaseId,
    pub content: String,
    pub created_by: UserId,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
}

/// An uploaded evidence file, stored base64 encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: EvidenceId,
    pub case_id: CaseId,
    pub filename: String,
    pub file_type: String,
    pub file_data: String,
    /// Absent for files attached to public reports.
    pub uploaded_by: Option<UserId>,
    pub uploaded_by_name: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Evidence metadata without the payload, as listed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EvidenceSummary {
    pub id: EvidenceId,
    pub case_id: CaseId,
    pub filename: String,
    pub file_type: String,
    pub size_bytes: usize,
    pub uploaded_by_name: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&Evidence> for EvidenceSummary {
    fn from(evidence: &Evidence) -> Self {
        // base64 expands every 3 bytes to 4 characters
        let padding = evidence.file_data.bytes().rev().take_while(|b| *b == b'=').count();
        let size_bytes = (evidence.file_data.len() / 4 * 3).saturating_sub(padding);
        Self {
            id: evidence.id,
            case_id: evidence.case_id,
            filename: evidence.filename.clone(),
            file_type: evidence.file_type.clone(),
            size_bytes,
            uploaded_by_name: evidence.uploaded_by_name.clone(),
            uploaded_at: evidence.uploaded_at,
        }
    }
}
