use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{app_state::AppState, database};

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    status: &'static str,
}

#[utoipa::path(
    get,
    path = "/api/liveness",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthStatus)
    )
)]
#[get("/liveness")]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus { status: "ok" })
}

#[utoipa::path(
    get,
    path = "/api/readiness",
    tag = "Health",
    responses(
        (status = 200, description = "Database is reachable", body = HealthStatus),
        (status = 503, description = "Database is unreachable", body = HealthStatus)
    )
)]
#[get("/readiness")]
pub async fn readiness(app_state: web::Data<AppState>) -> HttpResponse {
    match database::ping(&app_state.db).await {
        Ok(()) => HttpResponse::Ok().json(HealthStatus { status: "ok" }),
        Err(e) => {
            log::warn!("Readiness check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(HealthStatus {
                status: "database unavailable",
            })
        }
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}
