//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};

use crate::domain::ports::MockLocationResolver;
use crate::domain::test_support::fixture_clock;
use crate::inbound::http::api_routes;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::credentials::BcryptCredentialService;
use crate::outbound::repositories::DocumentRepositories;
use crate::outbound::store::InMemoryDocumentStore;

/// Lowest bcrypt work factor; keeps seeded logins fast in tests.
const FAST_HASH_COST: u32 = 4;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Services over an empty in-memory store with the demo accounts seeded and
/// an unconfigured location resolver.
pub async fn seeded_state() -> HttpState {
    let store = Arc::new(InMemoryDocumentStore::new(fixture_clock()));
    let repositories = DocumentRepositories::new(store);
    let mut location = MockLocationResolver::new();
    location.expect_is_configured().return_const(false);
    let state = HttpState::new(HttpStatePorts {
        users: repositories.users,
        teams: repositories.teams,
        cases: repositories.cases,
        notes: repositories.notes,
        evidence: repositories.evidence,
        audit: repositories.audit,
        notifications: repositories.notifications,
        settings: repositories.settings,
        credentials: Arc::new(BcryptCredentialService::with_cost(FAST_HASH_COST)),
        location: Arc::new(location),
        clock: fixture_clock(),
    });
    state.auth.seed_demo_users().await.expect("seed demo users");
    state
}

pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(api_routes))
}

pub async fn login_as(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
    password: &str,
) -> Cookie<'static> {
    let request = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({ "email": email, "password": password }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "login as {email} failed");
    session_cookie(&response)
}
