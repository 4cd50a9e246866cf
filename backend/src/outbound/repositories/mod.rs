//! Domain repository ports implemented over a [`DocumentStore`].
//!
//! Collections are append-ordered, so "newest first" listings reverse the
//! store order.

mod audit;
mod case_records;
mod cases;
mod notifications;
mod settings;
mod teams;
mod users;

use std::sync::Arc;

pub use audit::DocumentAuditRepository;
pub use case_records::{DocumentCaseNoteRepository, DocumentEvidenceRepository};
pub use cases::DocumentCaseRepository;
pub use notifications::DocumentNotificationRepository;
pub use settings::DocumentSettingsRepository;
pub use teams::DocumentTeamRepository;
pub use users::DocumentUserRepository;

use crate::outbound::store::DocumentStore;

/// Every repository, sharing one store.
#[derive(Clone)]
pub struct DocumentRepositories {
    pub users: Arc<DocumentUserRepository>,
    pub teams: Arc<DocumentTeamRepository>,
    pub cases: Arc<DocumentCaseRepository>,
    pub notes: Arc<DocumentCaseNoteRepository>,
    pub evidence: Arc<DocumentEvidenceRepository>,
    pub audit: Arc<DocumentAuditRepository>,
    pub notifications: Arc<DocumentNotificationRepository>,
    pub settings: Arc<DocumentSettingsRepository>,
}

impl DocumentRepositories {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            users: Arc::new(DocumentUserRepository::new(Arc::clone(&store))),
            teams: Arc::new(DocumentTeamRepository::new(Arc::clone(&store))),
            cases: Arc::new(DocumentCaseRepository::new(Arc::clone(&store))),
            notes: Arc::new(DocumentCaseNoteRepository::new(Arc::clone(&store))),
            evidence: Arc::new(DocumentEvidenceRepository::new(Arc::clone(&store))),
            audit: Arc::new(DocumentAuditRepository::new(Arc::clone(&store))),
            notifications: Arc::new(DocumentNotificationRepository::new(Arc::clone(&store))),
            settings: Arc::new(DocumentSettingsRepository::new(store)),
        }
    }
}

/// Newest-first view of append-ordered records.
fn newest_first<T>(mut records: Vec<T>) -> Vec<T> {
    records.reverse();
    records
}
