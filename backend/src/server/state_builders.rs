//! Builds the document store, repositories and services behind the HTTP
//! state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};
use url::Url;

use casework::domain::ports::RepositoryError;
use casework::inbound::http::state::{HttpState, HttpStatePorts};
use casework::outbound::credentials::BcryptCredentialService;
use casework::outbound::persistence::{
    DbPool, DieselDocumentStore, PoolConfig, PoolError, run_pending_migrations,
};
use casework::outbound::repositories::DocumentRepositories;
use casework::outbound::store::{DocumentStore, InMemoryDocumentStore};
use casework::outbound::what3words::What3WordsHttpResolver;

use super::config::AppSettings;

/// Failures that stop the process before it binds.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database pool: {0}")]
    Pool(#[from] PoolError),
    #[error("database migrations: {0}")]
    Migrations(#[source] RepositoryError),
    #[error("invalid what3words endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("what3words client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("demo account seeding: {0}")]
    Seed(#[source] casework::domain::Error),
}

async fn build_store(
    settings: &AppSettings,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn DocumentStore>, StartupError> {
    let Some(url) = settings.database_url.as_deref() else {
        warn!("CASEWORK_DATABASE_URL not set; records are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryDocumentStore::new(clock)));
    };
    run_pending_migrations(url)
        .await
        .map_err(StartupError::Migrations)?;
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections())).await?;
    info!("using PostgreSQL document store");
    Ok(Arc::new(DieselDocumentStore::new(pool, clock)))
}

/// Wire every service and optionally seed the demo accounts.
///
/// # Errors
///
/// See [`StartupError`].
pub async fn build_http_state(settings: &AppSettings) -> Result<HttpState, StartupError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let store = build_store(settings, Arc::clone(&clock)).await?;
    let repositories = DocumentRepositories::new(store);
    let location = What3WordsHttpResolver::new(
        Url::parse(settings.what3words_endpoint())?,
        settings.what3words_api_key.clone(),
        settings.request_timeout(),
    )?;

    let state = HttpState::new(HttpStatePorts {
        users: repositories.users,
        teams: repositories.teams,
        cases: repositories.cases,
        notes: repositories.notes,
        evidence: repositories.evidence,
        audit: repositories.audit,
        notifications: repositories.notifications,
        settings: repositories.settings,
        credentials: Arc::new(BcryptCredentialService::new()),
        location: Arc::new(location),
        clock,
    });

    if settings.seed_demo_users {
        let created = state
            .auth
            .seed_demo_users()
            .await
            .map_err(StartupError::Seed)?;
        info!(created, "demo accounts seeded");
    }
    Ok(state)
}
