use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::provider::{ChatMessage, TokenUsage};

/// Request body for `POST /ai/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct AiChatRequest {
    #[validate(length(min = 1))]
    pub messages: Vec<ChatMessage>,
    /// Model identifier (default `"gpt-3.5-turbo"`).
    #[serde(default)]
    pub model: Option<String>,
    /// Sampling temperature in [0, 2] (default `0.7`).
    #[serde(default)]
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f32>,
    /// Generation length cap (default `1000`).
    #[serde(default)]
    #[validate(range(min = 1))]
    pub max_tokens: Option<u32>,
}

/// Response body for `POST /ai/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AiChatResponse {
    pub message: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub usage: Option<TokenUsage>,
}

/// Request body for `POST /ai/embeddings`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct EmbeddingRequest {
    #[validate(length(min = 1))]
    pub input: String,
    /// Embedding model (default `"text-embedding-ada-002"`).
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmbeddingResponse {
    pub embedding: Vec<f32>,
    pub model: String,
}

/// Response body for `GET /ai/models`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelListResponse {
    pub models: Vec<String>,
    /// Always `true`: the list is maintained by hand and is not checked
    /// against what the providers currently serve.
    pub advisory: bool,
}
