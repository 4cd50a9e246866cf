//! Handler tests for user administration.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::LoginCredentials;
use crate::inbound::http::test_utils::{login_as, seeded_state, test_app};

async fn user_id_for(state: &HttpState, email: &str, password: &str) -> UserId {
    let credentials = LoginCredentials::try_from_parts(email, password).expect("valid credentials");
    state.auth.login(&credentials).await.expect("seeded login").id
}

#[rstest]
#[case("officer@council.gov.uk", "officer123", StatusCode::FORBIDDEN)]
#[case("supervisor@council.gov.uk", "super123", StatusCode::OK)]
#[case("admin@council.gov.uk", "admin123", StatusCode::OK)]
#[actix_web::test]
async fn listing_users_requires_a_supervisory_role(
    #[case] email: &str,
    #[case] password: &str,
    #[case] expected: StatusCode,
) {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;
    let cookie = login_as(&app, email, password).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), expected);
}

#[actix_web::test]
async fn listed_users_omit_password_hashes() {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;
    let cookie = login_as(&app, "admin@council.gov.uk", "admin123").await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Vec<Value> = actix_test::read_body_json(response).await;
    assert_eq!(body.len(), 3);
    assert!(body.iter().all(|user| user.get("password_hash").is_none()));
}

#[actix_web::test]
async fn malformed_user_id_is_rejected() {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;
    let cookie = login_as(&app, "admin@council.gov.uk", "admin123").await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/not-a-uuid")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some("userId")
    );
}

#[actix_web::test]
async fn managers_promote_officers() {
    let state = seeded_state().await;
    let officer_id = user_id_for(&state, "officer@council.gov.uk", "officer123").await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_as(&app, "admin@council.gov.uk", "admin123").await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/users/{officer_id}"))
            .cookie(cookie)
            .set_json(json!({ "role": "supervisor", "cross_team_access": true }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: UserResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.role, Role::Supervisor);
    assert!(body.cross_team_access);
}

#[actix_web::test]
async fn managers_cannot_delete_themselves() {
    let state = seeded_state().await;
    let manager_id = user_id_for(&state, "admin@council.gov.uk", "admin123").await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_as(&app, "admin@council.gov.uk", "admin123").await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/users/{manager_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn deleted_users_disappear() {
    let state = seeded_state().await;
    let officer_id = user_id_for(&state, "officer@council.gov.uk", "officer123").await;
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_as(&app, "admin@council.gov.uk", "admin123").await;
    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/users/{officer_id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let body: MessageResponse = actix_test::read_body_json(deleted).await;
    assert_eq!(body.message, "User deleted");

    let lookup = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{officer_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
}
