//! Login, session resolution and first-run account seeding.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{CredentialService, UserRepository};
use crate::domain::{Error, LoginCredentials, Role, User, UserId};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Account created on an empty store when demo seeding is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoAccount {
    pub email: &'static str,
    pub name: &'static str,
    pub role: Role,
    pub password: &'static str,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        email: "admin@council.gov.uk",
        name: "System Admin",
        role: Role::Manager,
        password: "admin123",
    },
    DemoAccount {
        email: "supervisor@council.gov.uk",
        name: "Jane Smith",
        role: Role::Supervisor,
        password: "super123",
    },
    DemoAccount {
        email: "officer@council.gov.uk",
        name: "John Officer",
        role: Role::Officer,
        password: "officer123",
    },
];

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialService>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        credentials: Arc<dyn CredentialService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            credentials,
            clock,
        }
    }

    /// Verify credentials and return the matching active user.
    ///
    /// Unknown emails and wrong passwords share one message so callers
    /// cannot probe for accounts.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(user) = self.users.find_by_email(credentials.email()).await? else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let verified = self
            .credentials
            .verify(credentials.password(), &user.password_hash)
            .map_err(|error| {
                debug!(%error, user_id = %user.id, "stored hash rejected");
                Error::internal("Unable to verify credentials")
            })?;
        if !verified {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if !user.is_active {
            return Err(Error::unauthorized("Account is disabled"));
        }
        info!(user_id = %user.id, "login succeeded");
        Ok(user)
    }

    /// Resolve a session's user id to a live account.
    pub async fn current_user(&self, id: &UserId) -> Result<User, Error> {
        match self.users.find_by_id(id).await? {
            Some(user) if user.is_active => Ok(user),
            Some(_) => Err(Error::unauthorized("Account is disabled")),
            None => Err(Error::unauthorized("User not found")),
        }
    }

    /// Create the demo accounts when the store holds no users.
    ///
    /// Returns how many accounts were written.
    pub async fn seed_demo_users(&self) -> Result<usize, Error> {
        if !self.users.list().await?.is_empty() {
            return Ok(0);
        }
        for account in &DEMO_ACCOUNTS {
            let user = User {
                id: UserId::random(),
                email: account.email.to_owned(),
                name: account.name.to_owned(),
                role: account.role,
                teams: Vec::new(),
                cross_team_access: false,
                is_active: true,
                created_at: self.clock.utc(),
                password_hash: self.credentials.hash(account.password)?,
            };
            self.users.save(&user).await?;
        }
        info!(count = DEMO_ACCOUNTS.len(), "demo users created");
        Ok(DEMO_ACCOUNTS.len())
    }
}
