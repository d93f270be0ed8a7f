use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{Agent, AgentPatch, NewAgent};
use crate::provider::{ChatMessage, TokenUsage};
use crate::services::AgentReply;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

/// Request body for `POST /agents`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateAgentRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub system_prompt: String,
    /// Provider model identifier (default `"gpt-3.5-turbo"`).
    #[serde(default = "default_model")]
    #[validate(length(min = 1))]
    pub model: String,
    /// Sampling temperature in [0, 2] (default `0.7`).
    #[serde(default = "default_temperature")]
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    /// Generation length cap (default `1000`).
    #[serde(default = "default_max_tokens")]
    #[validate(range(min = 1))]
    pub max_tokens: u32,
}

impl CreateAgentRequest {
    pub fn into_new_agent(self, owner_id: &str) -> NewAgent {
        NewAgent {
            owner_id: owner_id.to_owned(),
            name: self.name,
            description: self.description,
            system_prompt: self.system_prompt,
            model: self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Request body for `PUT /agents/{id}`. Omitted or `null` fields are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateAgentRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub system_prompt: Option<String>,
    #[validate(length(min = 1))]
    pub model: Option<String>,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f32>,
    #[validate(range(min = 1))]
    pub max_tokens: Option<u32>,
    pub is_active: Option<bool>,
}

impl From<UpdateAgentRequest> for AgentPatch {
    fn from(req: UpdateAgentRequest) -> Self {
        AgentPatch {
            name: req.name,
            description: req.description,
            system_prompt: req.system_prompt,
            model: req.model,
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AgentResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub system_prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Agent {
    pub fn to_response(&self) -> AgentResponse {
        AgentResponse {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            system_prompt: self.system_prompt.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            is_active: self.is_active,
            created_at: self.created_at.to_rfc3339(),
            updated_at: self.updated_at.to_rfc3339(),
        }
    }
}

/// Request body for `POST /agents/{id}/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct AgentChatRequest {
    #[validate(length(min = 1))]
    pub message: String,
    /// Prior turns, replayed verbatim between the system prompt and `message`.
    #[serde(default)]
    pub conversation_context: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AgentChatResponse {
    pub response: String,
    pub agent_id: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub usage: Option<TokenUsage>,
}

impl From<AgentReply> for AgentChatResponse {
    fn from(reply: AgentReply) -> Self {
        AgentChatResponse {
            response: reply.response,
            agent_id: reply.agent_id,
            model: reply.model,
            usage: reply.usage,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteAgentResponse {
    pub message: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn create_defaults_generation_parameters() {
        let req: CreateAgentRequest =
            serde_json::from_str(r#"{"name":"n","system_prompt":"p"}"#).unwrap();
        assert_eq!(req.model, DEFAULT_MODEL);
        assert_eq!(req.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(req.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn create_rejects_out_of_range_temperature() {
        let req: CreateAgentRequest =
            serde_json::from_str(r#"{"name":"n","system_prompt":"p","temperature":3.5}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_rejects_empty_name_and_zero_tokens() {
        let req: CreateAgentRequest =
            serde_json::from_str(r#"{"name":"","system_prompt":"p","max_tokens":0}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("max_tokens"));
    }

    #[test]
    fn null_update_fields_are_absent_from_patch() {
        let req: UpdateAgentRequest =
            serde_json::from_str(r#"{"name":null,"is_active":false}"#).unwrap();
        let patch = AgentPatch::from(req);
        assert_eq!(patch.name, None);
        assert_eq!(patch.is_active, Some(false));
    }

    #[test]
    fn chat_context_accepts_null() {
        let req: AgentChatRequest =
            serde_json::from_str(r#"{"message":"hi","conversation_context":null}"#).unwrap();
        assert!(req.conversation_context.is_none());
    }
}
