//! Health endpoint.

use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

use crate::chat::ChatService;

/// GET /health
/// Reports liveness and database reachability.
#[tracing::instrument(name = "Health check.", skip(service))]
#[get("/health")]
pub async fn health(service: web::Data<ChatService>) -> impl Responder {
    match service.database().ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "database": "ok",
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(json!({
            "status": "degraded",
            "database": e.message(),
        })),
    }
}
