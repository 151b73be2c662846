//! End-to-end tests for the HTTP surface, driven against the mock LLM and
//! database clients.

use std::sync::Arc;

use actix_web::{test, web, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value as JsonValue};

use inventory_chat::chat::ChatService;
use inventory_chat::db::{
    DatabaseClient, FailingDatabaseClient, MockDatabaseClient, Value,
};
use inventory_chat::llm::{FailingLlmClient, LlmClient, MockLlmClient};
use inventory_chat::routes;

fn service(llm: Arc<dyn LlmClient>, db: Arc<dyn DatabaseClient>) -> ChatService {
    ChatService::new(llm, db, "gemini", "gemini-2.0-flash")
}

macro_rules! init_app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($service))
                .service(routes::chat::chat)
                .service(routes::health::health),
        )
        .await
    };
}

fn chat_request(message: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({ "session_id": "it-session", "message": message }))
}

#[actix_web::test]
async fn chat_returns_success_envelope() {
    let app = init_app!(service(
        Arc::new(MockLlmClient::new()),
        Arc::new(MockDatabaseClient::new()),
    ));

    let resp = test::call_service(&app, chat_request("how many assets are there").to_request())
        .await;
    assert!(resp.status().is_success());

    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["natural_language_answer"],
        "You have 42 items matching your query."
    );
    assert_eq!(body["provider"], "gemini");
    assert_eq!(body["model"], "gemini-2.0-flash");
    assert!(body["sql_query"].as_str().unwrap().starts_with("SELECT"));
    assert!(body["latency_ms"].is_u64());

    let usage = &body["token_usage"];
    assert_eq!(
        usage["total_tokens"].as_u64().unwrap(),
        usage["prompt_tokens"].as_u64().unwrap() + usage["completion_tokens"].as_u64().unwrap()
    );
}

#[actix_web::test]
async fn chat_model_failure_still_returns_http_200() {
    let app = init_app!(service(
        Arc::new(FailingLlmClient::new("quota exceeded")),
        Arc::new(MockDatabaseClient::new()),
    ));

    let resp = test::call_service(&app, chat_request("anything").to_request()).await;
    assert!(resp.status().is_success());

    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["error_stage"], "model_call");
    assert_eq!(body["error_message"], "quota exceeded");
    assert!(body.get("sql_query").is_none());
}

#[actix_web::test]
async fn chat_sql_failure_includes_attempted_statement() {
    let app = init_app!(service(
        Arc::new(MockLlmClient::new()),
        Arc::new(FailingDatabaseClient::new("Invalid object name 'Assets'")),
    ));

    let resp = test::call_service(&app, chat_request("how many assets are there").to_request())
        .await;
    assert!(resp.status().is_success());

    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["error_stage"], "sql_execution");
    assert_eq!(body["error_message"], "Invalid object name 'Assets'");
    assert!(body["sql_query"].as_str().unwrap().contains("Assets"));
}

#[actix_web::test]
async fn chat_rejects_mutating_statement_before_execution() {
    let llm = MockLlmClient::new().with_response("purge", "DROP TABLE Assets");
    // A failing database proves the guard fires first: reaching the driver
    // would produce a sql_execution stage instead.
    let app = init_app!(service(
        Arc::new(llm),
        Arc::new(FailingDatabaseClient::new("must not be reached")),
    ));

    let resp = test::call_service(&app, chat_request("purge the asset table").to_request()).await;
    assert!(resp.status().is_success());

    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["error_stage"], "query_rejected");
    assert_eq!(body["sql_query"], "DROP TABLE Assets");
    assert!(body["error_message"]
        .as_str()
        .unwrap()
        .contains("only SELECT statements may be executed"));
}

#[actix_web::test]
async fn chat_answers_site_count_scenario() {
    let question = "how many active assets are at site code 'WH1'";
    let generated = "SELECT COUNT(*) FROM Assets a JOIN Sites s ON a.SiteId = s.SiteId \
                     WHERE s.SiteCode = 'WH1' AND a.Status <> 'Disposed'";

    let llm = MockLlmClient::new().with_response(question, generated);
    let db = MockDatabaseClient::with_rows(vec!["(No column name)"], vec![vec![Value::Int(7)]]);
    let app = init_app!(service(Arc::new(llm), Arc::new(db)));

    let resp = test::call_service(&app, chat_request(question).to_request()).await;
    let body: JsonValue = test::read_body_json(resp).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["natural_language_answer"],
        "You have 7 items matching your query."
    );
    assert_eq!(body["sql_query"], generated);
}

#[actix_web::test]
async fn chat_renders_tabular_results_line_per_row() {
    let llm = MockLlmClient::new();
    let db = MockDatabaseClient::with_rows(
        vec!["SiteCode", "SiteName"],
        vec![
            vec![Value::String("WH1".into()), Value::String("Main Warehouse".into())],
            vec![Value::String("WH2".into()), Value::String("Overflow".into())],
        ],
    );
    let app = init_app!(service(Arc::new(llm), Arc::new(db)));

    let resp = test::call_service(&app, chat_request("list all sites").to_request()).await;
    let body: JsonValue = test::read_body_json(resp).await;

    assert_eq!(
        body["natural_language_answer"],
        "Here are the results:\nWH1, Main Warehouse\nWH2, Overflow"
    );
}

#[actix_web::test]
async fn chat_rejects_malformed_request_body() {
    let app = init_app!(service(
        Arc::new(MockLlmClient::new()),
        Arc::new(MockDatabaseClient::new()),
    ));

    // Missing the required message field.
    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({ "session_id": "it-session" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn health_reports_ok_when_database_reachable() {
    let app = init_app!(service(
        Arc::new(MockLlmClient::new()),
        Arc::new(MockDatabaseClient::new()),
    ));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[actix_web::test]
async fn health_reports_degraded_when_database_down() {
    let app = init_app!(service(
        Arc::new(MockLlmClient::new()),
        Arc::new(FailingDatabaseClient::new("host unreachable")),
    ));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 503);

    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "host unreachable");
}
