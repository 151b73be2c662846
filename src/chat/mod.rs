//! Request orchestration for the chat pipeline.
//!
//! One request runs the linear pipeline prompt → completion → fence-strip →
//! read-only guard → execute → format. Each failure stage is terminal and
//! maps to its own error envelope; there is no retry.

pub mod formatter;
pub mod types;

pub use formatter::format_answer;
pub use types::{
    ChatErrorResponse, ChatReply, ChatRequest, ChatResponse, ErrorStage, ResponseStatus,
    TokenUsage,
};

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::db::{inventory_schema, DatabaseClient};
use crate::llm::{build_prompt, strip_code_fences, LlmClient};
use crate::safety;

/// The chat pipeline over an LLM client and a database client.
pub struct ChatService {
    llm: Arc<dyn LlmClient>,
    db: Arc<dyn DatabaseClient>,
    provider: String,
    model: String,
}

impl ChatService {
    /// Creates a new service.
    ///
    /// `provider` and `model` are echoed into every success envelope.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        db: Arc<dyn DatabaseClient>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            db,
            provider: provider.into(),
            model: model.into(),
        }
    }

    /// Returns the database client, for health reporting.
    pub fn database(&self) -> &Arc<dyn DatabaseClient> {
        &self.db
    }

    /// Runs one request through the pipeline.
    ///
    /// Always returns an envelope; failures become error envelopes rather
    /// than transport errors.
    #[tracing::instrument(
        name = "Handle chat request.",
        skip(self, request),
        fields(session_id = %request.session_id)
    )]
    pub async fn handle(&self, request: &ChatRequest) -> ChatReply {
        let started = Instant::now();

        let prompt = build_prompt(&request.message, inventory_schema());
        debug!(prompt_chars = prompt.chars().count(), "prompt built");

        let completion = match self.llm.complete(&prompt).await {
            Ok(completion) => completion,
            Err(e) => {
                warn!(error = %e, "model call failed");
                return ChatReply::Err(ChatErrorResponse::model_call(e.message()));
            }
        };

        let sql = strip_code_fences(&completion);
        debug!(%sql, "completion received");

        if let Err(violation) = safety::ensure_read_only(&sql) {
            warn!(error = %violation, "generated statement rejected");
            return ChatReply::Err(ChatErrorResponse::query_rejected(
                sql,
                violation.to_string(),
            ));
        }

        let result = match self.db.execute_query(&sql).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "sql execution failed");
                return ChatReply::Err(ChatErrorResponse::sql_execution(sql, e.message()));
            }
        };

        let natural_language_answer = format_answer(&result);
        let token_usage = TokenUsage::approximate(&prompt, &sql);
        let latency_ms = started.elapsed().as_millis() as u64;

        debug!(rows = result.row_count, latency_ms, "request formatted");

        ChatReply::Ok(ChatResponse {
            natural_language_answer,
            sql_query: sql,
            token_usage,
            latency_ms,
            provider: self.provider.clone(),
            model: self.model.clone(),
            status: ResponseStatus::Ok,
        })
    }
}
