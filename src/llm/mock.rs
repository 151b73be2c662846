//! Mock LLM clients for testing.
//!
//! Provides deterministic responses based on input patterns, without making
//! real API calls.

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::llm::LlmClient;

/// Mock LLM client that returns canned SQL based on prompt patterns.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response).
    custom_responses: Vec<(String, String)>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the prompt contains `pattern`, the mock returns `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Extracts the question from a full instruction prompt.
    ///
    /// The prompt template ends with `Question: <text>`; matching against
    /// the whole template would trip on schema table names.
    fn question_of(prompt: &str) -> &str {
        prompt
            .rsplit("Question:")
            .next()
            .unwrap_or(prompt)
            .trim()
    }

    fn mock_response(&self, prompt: &str) -> String {
        let prompt_lower = Self::question_of(prompt).to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        if prompt_lower.contains("how many assets") || prompt_lower.contains("count assets") {
            return "SELECT COUNT(*) FROM Assets WHERE Status <> 'Disposed'".to_string();
        }

        if prompt_lower.contains("vendors") {
            return "```sql\nSELECT VendorName FROM Vendors WHERE IsActive = 1\n```".to_string();
        }

        if prompt_lower.contains("sites") {
            return "SELECT SiteCode, SiteName FROM Sites WHERE IsActive = 1".to_string();
        }

        "SELECT COUNT(*) FROM Items WHERE IsActive = 1".to_string()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(self.mock_response(prompt))
    }
}

/// Mock LLM client whose calls always fail.
///
/// Used to exercise the `model_call` error path.
#[derive(Debug, Clone)]
pub struct FailingLlmClient {
    message: String,
}

impl FailingLlmClient {
    /// Creates a failing client that reports the given error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl LlmClient for FailingLlmClient {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(AppError::llm(self.message.clone()))
    }
}
