//! Dashboard statistics.
//!
//! The overview is open to every signed-in user; the workload and FPN
//! reports are limited to supervisors and managers.

use actix_web::{get, web};

use crate::domain::{Error, FpnSummary, OfficerWorkload, OutstandingFpn, Overview};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[utoipa::path(
    get,
    path = "/api/v1/stats/overview",
    responses(
        (status = 200, description = "Case counts", body = Overview),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["stats"],
    operation_id = "statsOverview"
)]
#[get("/stats/overview")]
pub async fn overview(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Overview>> {
    state.current_user(&session).await?;
    Ok(web::Json(state.stats.overview().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/stats/officer-workload",
    responses(
        (status = 200, description = "Open cases per officer", body = [OfficerWorkload]),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["stats"],
    operation_id = "statsOfficerWorkload"
)]
#[get("/stats/officer-workload")]
pub async fn officer_workload(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<OfficerWorkload>>> {
    let actor = state.current_user(&session).await?;
    Ok(web::Json(state.stats.officer_workload(&actor).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/stats/fpn",
    responses(
        (status = 200, description = "Fixed penalty totals", body = FpnSummary),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["stats"],
    operation_id = "statsFpnSummary"
)]
#[get("/stats/fpn")]
pub async fn fpn_summary(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<FpnSummary>> {
    let actor = state.current_user(&session).await?;
    Ok(web::Json(state.stats.fpn_summary(&actor).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/stats/fpn/outstanding",
    responses(
        (status = 200, description = "Unpaid fixed penalties", body = [OutstandingFpn]),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["stats"],
    operation_id = "statsOutstandingFpns"
)]
#[get("/stats/fpn/outstanding")]
pub async fn outstanding_fpns(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<OutstandingFpn>>> {
    let actor = state.current_user(&session).await?;
    Ok(web::Json(state.stats.outstanding_fpns(&actor).await?))
}
