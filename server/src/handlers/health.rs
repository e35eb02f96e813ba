use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::{db::JobBoardStore, error::Result};

#[get("/")]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Work Atlas is running")
}

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub store: String,
}

#[get("/health")]
pub async fn health_check(store: web::Data<dyn JobBoardStore>) -> Result<HttpResponse> {
    match store.ping().await {
        Ok(()) => Ok(HttpResponse::Ok().json(HealthCheckResponse {
            status: "healthy".to_string(),
            store: "up".to_string(),
        })),
        Err(err) => {
            log::error!("Health check: store ping failed: {}", err);
            Ok(HttpResponse::ServiceUnavailable().json(HealthCheckResponse {
                status: "degraded".to_string(),
                store: "down".to_string(),
            }))
        }
    }
}
