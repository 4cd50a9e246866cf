//! Runtime configuration loaded through OrthoConfig, plus the server
//! parameter object built from it.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use casework::inbound::http::session_config::SessionSettings;
use casework::outbound::what3words::DEFAULT_WHAT3WORDS_ENDPOINT;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Process settings. Every field can come from `CASEWORK_*` environment
/// variables, a configuration file or the command line.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CASEWORK")]
pub struct AppSettings {
    /// Listen address; defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Without one, records live in memory only.
    pub database_url: Option<String>,
    pub db_max_connections: Option<u32>,
    /// what3words API key; lookups report "not configured" without it.
    pub what3words_api_key: Option<String>,
    pub what3words_endpoint: Option<String>,
    /// Timeout for outbound what3words calls.
    pub request_timeout_secs: Option<u64>,
    /// Create the demo manager, supervisor and officer accounts when absent.
    #[ortho_config(default = false)]
    pub seed_demo_users: bool,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn what3words_endpoint(&self) -> &str {
        self.what3words_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_WHAT3WORDS_ENDPOINT)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

/// Everything `create_server` needs besides the application state.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_ttl: Duration,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            key: session.key,
            cookie_secure: session.cookie_secure,
            same_site: session.same_site,
            session_ttl: session.ttl,
            bind_addr,
        }
    }
}
