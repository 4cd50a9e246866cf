//! System settings.

use actix_web::{get, put, web};

use crate::domain::{Error, SettingsPatch, SystemSettings};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Current settings", body = SystemSettings),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["settings"],
    operation_id = "getSettings"
)]
#[get("/settings")]
pub async fn get_settings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SystemSettings>> {
    state.current_user(&session).await?;
    Ok(web::Json(state.settings.get().await?))
}

/// Overlay a partial update. Managers only.
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    request_body = SettingsPatch,
    responses(
        (status = 200, description = "Updated settings", body = SystemSettings),
        (status = 400, description = "Invalid settings", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["settings"],
    operation_id = "updateSettings"
)]
#[put("/settings")]
pub async fn update_settings(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SettingsPatch>,
) -> ApiResult<web::Json<SystemSettings>> {
    let actor = state.current_user(&session).await?;
    let settings = state.settings.update(&actor, payload.into_inner()).await?;
    Ok(web::Json(settings))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::inbound::http::test_utils::{login_as, seeded_state, test_app};

    #[actix_web::test]
    async fn defaults_are_served_before_any_update() {
        let app = actix_test::init_service(test_app(seeded_state().await)).await;
        let officer = login_as(&app, "officer@council.gov.uk", "officer123").await;
        let settings: SystemSettings = actix_test::read_body_json(
            actix_test::call_service(
                &app,
                actix_test::TestRequest::get()
                    .uri("/api/v1/settings")
                    .cookie(officer)
                    .to_request(),
            )
            .await,
        )
        .await;
        assert_eq!(settings, SystemSettings::default());
    }

    #[rstest]
    #[case("officer@council.gov.uk", "officer123", StatusCode::FORBIDDEN)]
    #[case("supervisor@council.gov.uk", "super123", StatusCode::FORBIDDEN)]
    #[case("admin@council.gov.uk", "admin123", StatusCode::OK)]
    #[actix_web::test]
    async fn only_managers_update_settings(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: StatusCode,
    ) {
        let app = actix_test::init_service(test_app(seeded_state().await)).await;
        let cookie = login_as(&app, email, password).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/settings")
                .cookie(cookie)
                .set_json(json!({ "organisation_name": "Borough Council" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), expected);
    }

    #[actix_web::test]
    async fn out_of_range_map_centre_is_rejected() {
        let app = actix_test::init_service(test_app(seeded_state().await)).await;
        let manager = login_as(&app, "admin@council.gov.uk", "admin123").await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/settings")
                .cookie(manager)
                .set_json(json!({
                    "map_settings": { "default_latitude": 123.0, "default_longitude": 0.0, "default_zoom": 10 }
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
