use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// `GET /`: service name and crate version.
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "ProjectPro API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /health`: liveness probe. Does not touch the database.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": Utc::now()
    }))
}
