//! Liveness and readiness probes.
//!
//! Readiness flips once the document store is reachable and the demo seed
//! (if enabled) has run; liveness drops when shutdown begins so load
//! balancers stop routing before connections are drained.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde_json::json;

/// Probe flags shared with the server lifecycle.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn mark_draining(&self) {
        self.live.store(false, Ordering::Release);
        self.ready.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

fn probe(ok: bool) -> HttpResponse {
    let mut response = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(json!({ "status": if ok { "ok" } else { "unavailable" } }))
}

#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Accepting traffic"),
        (status = 503, description = "Starting up or draining")
    ),
    tags = ["health"],
    security([])
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_ready())
}

#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Process is alive"),
        (status = 503, description = "Shutting down")
    ),
    tags = ["health"],
    security([])
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_alive())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};

    use super::*;

    #[actix_web::test]
    async fn probes_follow_lifecycle() {
        let state = web::Data::new(HealthState::new());
        let app = actix_test::init_service(
            App::new()
                .app_data(state.clone())
                .service(ready)
                .service(live),
        )
        .await;
        let status = |uri: &'static str| actix_test::TestRequest::get().uri(uri).to_request();

        let starting = actix_test::call_service(&app, status("/health/ready")).await;
        assert_eq!(starting.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            starting.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(b"no-store".as_slice())
        );

        state.mark_ready();
        let ready_now = actix_test::call_service(&app, status("/health/ready")).await;
        assert_eq!(ready_now.status(), StatusCode::OK);

        state.mark_draining();
        let live_now = actix_test::call_service(&app, status("/health/live")).await;
        assert_eq!(live_now.status(), StatusCode::SERVICE_UNAVAILABLE);
        let ready_after = actix_test::call_service(&app, status("/health/ready")).await;
        assert_eq!(ready_after.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
