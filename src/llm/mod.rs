//! LLM integration.
//!
//! Provides the trait and implementations for the external text-generation
//! endpoint that turns questions into SQL.

pub mod gemini;
pub mod mock;
pub mod parser;
pub mod prompt;

pub use gemini::{GeminiClient, GeminiConfig, ModelInfo};
pub use mock::{FailingLlmClient, MockLlmClient};
pub use parser::strip_code_fences;
pub use prompt::build_prompt;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::error::{AppError, Result};

/// Trait for LLM clients that can generate completions.
///
/// Implementations must be thread-safe (Send + Sync) to support async
/// operations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates one completion for the given instruction prompt.
    ///
    /// Any failure is terminal for the request; there is no retry.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Google Generative Language API (Gemini).
    #[default]
    Gemini,
    /// Mock client for testing (no API key required).
    Mock,
}

impl LlmProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown LLM provider: {}", s)),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Creates an LLM client for the configured provider.
///
/// The API key is resolved from the configuration (which in turn reads
/// `MODEL_API_KEY`); providers that require one fail here rather than on
/// the first request.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    let provider: LlmProvider = config
        .provider
        .parse()
        .map_err(AppError::config)?;

    match provider {
        LlmProvider::Gemini => {
            let key = config.api_key.clone().ok_or_else(|| {
                AppError::config("No API key configured. Set MODEL_API_KEY.")
            })?;
            let client = GeminiClient::new(GeminiConfig::new(key, config.model.clone()))?;
            Ok(Arc::new(client))
        }
        LlmProvider::Mock => Ok(Arc::new(MockLlmClient::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("gemini".parse::<LlmProvider>().unwrap(), LlmProvider::Gemini);
        assert_eq!("Google".parse::<LlmProvider>().unwrap(), LlmProvider::Gemini);
        assert_eq!("mock".parse::<LlmProvider>().unwrap(), LlmProvider::Mock);
        assert!("unknown".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_provider_display() {
        assert_eq!(format!("{}", LlmProvider::Gemini), "gemini");
        assert_eq!(format!("{}", LlmProvider::Mock), "mock");
    }

    #[test]
    fn test_create_mock_client() {
        let config = LlmConfig {
            provider: "mock".to_string(),
            model: "canned".to_string(),
            api_key: None,
        };
        assert!(create_client(&config).is_ok());
    }

    #[test]
    fn test_create_gemini_without_key_fails() {
        let config = LlmConfig {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
        };
        let err = create_client(&config).err().unwrap();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn test_create_gemini_with_key() {
        let config = LlmConfig {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: Some("test-key".to_string()),
        };
        assert!(create_client(&config).is_ok());
    }

    #[test]
    fn test_create_unknown_provider_fails() {
        let config = LlmConfig {
            provider: "acme".to_string(),
            model: "m".to_string(),
            api_key: None,
        };
        let err = create_client(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown LLM provider"));
    }

    #[tokio::test]
    async fn test_mock_client_implements_trait() {
        let client: Box<dyn LlmClient> = Box::new(MockLlmClient::new());
        let response = client.complete("how many assets are there").await.unwrap();
        assert!(response.contains("SELECT"));
    }
}
