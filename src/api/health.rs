use actix_web::{HttpResponse, Responder, get};
use serde_json::json;

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = Object, example = json!({
            "message": "Attendance tracker API",
            "version": "0.1.0",
            "docs": "/swagger-ui/"
        }))
    ),
    tag = "Health"
)]
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Attendance tracker API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/swagger-ui/"
    }))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "healthy"
        }))
    ),
    tag = "Health"
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "healthy" }))
}
