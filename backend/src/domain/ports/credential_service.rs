//! Port for password hashing and verification.
//!
//! The domain never inspects hashes; adapters own the encoding.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential adapters.
    pub enum CredentialError {
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
        /// A new hash could not be derived.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

impl From<CredentialError> for crate::domain::Error {
    fn from(error: CredentialError) -> Self {
        Self::internal(error.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait CredentialService: Send + Sync {
    /// Derive a storable hash for a new password.
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError>;

    /// Check `password` against a stored hash.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialError>;
}
