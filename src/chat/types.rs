//! Request and response envelopes for the chat endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// An incoming chat request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Caller-supplied session identifier, echoed into tracing spans.
    pub session_id: String,

    /// The free-text question.
    pub message: String,

    /// Open key-value map reserved for future use; currently unused.
    #[serde(default)]
    pub context: Map<String, JsonValue>,
}

/// Overall request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Where in the pipeline a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStage {
    /// The generation call failed (network, auth, quota, malformed response).
    ModelCall,
    /// The generated statement failed the read-only guard.
    QueryRejected,
    /// The database driver raised while executing the statement.
    SqlExecution,
}

/// Approximate token accounting for one request.
///
/// Counts are character counts of the prompt and the cleaned SQL, not real
/// tokenizer output. This mirrors what callers have historically been shown
/// and must not be silently replaced with true tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Approximates usage from the prompt and completion texts.
    pub fn approximate(prompt: &str, completion: &str) -> Self {
        let prompt_tokens = prompt.chars().count();
        let completion_tokens = completion.chars().count();
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub natural_language_answer: String,
    pub sql_query: String,
    pub token_usage: TokenUsage,
    pub latency_ms: u64,
    pub provider: String,
    pub model: String,
    pub status: ResponseStatus,
}

/// Error envelope.
///
/// `sql_query` is present when a generated statement existed at the point
/// of failure, so the caller can inspect what was attempted.
#[derive(Debug, Clone, Serialize)]
pub struct ChatErrorResponse {
    pub status: ResponseStatus,
    pub error_stage: ErrorStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,
    pub error_message: String,
}

impl ChatErrorResponse {
    /// The generation call failed; no statement exists yet.
    pub fn model_call(error_message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            error_stage: ErrorStage::ModelCall,
            sql_query: None,
            error_message: error_message.into(),
        }
    }

    /// The generated statement was refused by the read-only guard.
    pub fn query_rejected(sql_query: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            error_stage: ErrorStage::QueryRejected,
            sql_query: Some(sql_query.into()),
            error_message: error_message.into(),
        }
    }

    /// The database raised while executing the statement.
    pub fn sql_execution(sql_query: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            error_stage: ErrorStage::SqlExecution,
            sql_query: Some(sql_query.into()),
            error_message: error_message.into(),
        }
    }
}

/// The body returned by the chat endpoint: success or error envelope,
/// always with HTTP 200.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ChatReply {
    Ok(ChatResponse),
    Err(ChatErrorResponse),
}

impl ChatReply {
    /// Returns true for the success envelope.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}
