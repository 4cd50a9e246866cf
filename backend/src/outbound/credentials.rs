//! bcrypt password hashes.
//!
//! Stored form is the standard modular crypt string (`$2b$<cost>$...`), so
//! the cost travels with each hash and can be raised without a migration.

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialError, CredentialService};

pub use bcrypt::DEFAULT_COST;

#[derive(Debug, Clone, Copy)]
pub struct BcryptCredentialService {
    cost: u32,
}

impl BcryptCredentialService {
    pub const fn new() -> Self {
        Self::with_cost(DEFAULT_COST)
    }

    /// Use a work factor other than [`DEFAULT_COST`]; bcrypt accepts 4..=31.
    pub const fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptCredentialService {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialService for BcryptCredentialService {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError> {
        bcrypt::hash(password, self.cost)
            .map(PasswordHash::new)
            .map_err(|error| CredentialError::hashing(error.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialError> {
        bcrypt::verify(password, hash.as_str())
            .map_err(|error| CredentialError::malformed_hash(error.to_string()))
    }
}
