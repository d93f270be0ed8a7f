//! Provider gateway: one call shape for every LLM vendor.
//!
//! [`ProviderGateway`] is the seam between the HTTP layer and the
//! multi-provider completion client. The production implementation is
//! [`genai_gateway::GenaiGateway`]; tests substitute a recording stub.

pub mod genai_gateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub use genai_gateway::GenaiGateway;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Embedding model used when the caller does not name one.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Hand-maintained list of model identifiers known to work through the
/// gateway. It is not derived from the providers and may be stale.
pub const SUPPORTED_MODELS: &[&str] = &[
    "gpt-3.5-turbo",
    "gpt-4",
    "gpt-4-turbo",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240307",
    "claude-3-opus-20240229",
];

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// `"system"`, `"user"` or `"assistant"`.
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Normalised result of a chat completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    /// Model that actually served the request.
    pub model: String,
    pub usage: Option<TokenUsage>,
    pub finish_reason: String,
}

/// Failure of a provider call. The underlying cause is kept for logging but
/// callers only distinguish completion from embedding failures.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("completion failed for model '{model}': {source}")]
    Completion {
        model: String,
        #[source]
        source: BoxError,
    },

    #[error("embedding failed for model '{model}': {source}")]
    Embedding {
        model: String,
        #[source]
        source: BoxError,
    },
}

/// Sends role-tagged messages to a named model.
///
/// Implementations perform exactly one outbound call per method and never
/// validate generation parameters; bounds are left to the provider.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Run a chat completion against `model`.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, ProviderError>;

    /// Embed `text` with `model`.
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>, ProviderError>;

    /// Model identifiers advertised to clients. Advisory only.
    fn list_supported_models(&self) -> Vec<String> {
        SUPPORTED_MODELS.iter().map(|m| (*m).to_owned()).collect()
    }
}
