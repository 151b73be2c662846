//! Chat endpoint.

use actix_web::{post, web, HttpResponse, Responder};

use crate::chat::{ChatRequest, ChatService};

/// POST /api/chat
/// Answers a free-text question with LLM-generated SQL.
///
/// Always responds HTTP 200; pipeline failures are reported inside the
/// error envelope, not as transport-level status codes.
#[tracing::instrument(name = "Chat request.", skip(service, body))]
#[post("/api/chat")]
pub async fn chat(
    service: web::Data<ChatService>,
    web::Json(body): web::Json<ChatRequest>,
) -> impl Responder {
    let reply = service.handle(&body).await;
    HttpResponse::Ok().json(reply)
}
