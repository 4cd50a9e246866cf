//! Error shared by the document-backed repositories.

use super::define_port_error;

define_port_error! {
    /// Failures raised by repository adapters.
    pub enum RepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } => "repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "repository query failed: {message}",
        /// A stored document could not be decoded or encoded.
        Serialization { message: String } => "repository document invalid: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u64, actual: u64 } =>
            "revision mismatch: expected {expected}, found {actual}",
    }
}

impl From<RepositoryError> for crate::domain::Error {
    fn from(error: RepositoryError) -> Self {
        use crate::domain::Error;
        match error {
            RepositoryError::Connection { message } => {
                Error::service_unavailable(format!("store unavailable: {message}"))
            }
            RepositoryError::RevisionMismatch { .. } => Error::conflict(
                "The record was modified by another request; reload and try again",
            ),
            RepositoryError::Query { message } | RepositoryError::Serialization { message } => {
                Error::internal(format!("store error: {message}"))
            }
        }
    }
}
