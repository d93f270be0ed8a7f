//! Agent chat pipeline.
//!
//! A chat turn is stateless: the caller replays prior turns as context and
//! the exchange sent to the provider is rebuilt from scratch every time as
//! `[system prompt] ++ context ++ [user message]`.

use std::sync::Arc;

use tracing::{debug, info};

use super::{owned_by, AgentError};
use crate::entities::AgentStore;
use crate::provider::{ChatMessage, ProviderGateway, TokenUsage};

/// Message sent by the smoke-test entry point.
pub const TEST_GREETING: &str = "Hello! Please introduce yourself and describe your capabilities.";

/// Reply of one agent chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub response: String,
    pub agent_id: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

pub struct AgentChat<S> {
    store: Arc<S>,
    gateway: Arc<dyn ProviderGateway>,
}

impl<S> Clone for AgentChat<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), gateway: Arc::clone(&self.gateway) }
    }
}

/// Assemble the provider exchange. `context` is kept verbatim and in order.
pub fn build_exchange(system_prompt: &str, context: Vec<ChatMessage>, message: &str) -> Vec<ChatMessage> {
    let mut exchange = Vec::with_capacity(context.len() + 2);
    exchange.push(ChatMessage::system(system_prompt));
    exchange.extend(context);
    exchange.push(ChatMessage::user(message));
    exchange
}

impl<S: AgentStore> AgentChat<S> {
    pub fn new(store: Arc<S>, gateway: Arc<dyn ProviderGateway>) -> Self {
        Self { store, gateway }
    }

    /// Run one chat turn against the agent `agent_id` owned by `owner_id`.
    ///
    /// Missing (or foreign) agents fail with [`AgentError::NotFound`] and
    /// inactive ones with [`AgentError::InactiveAgent`]; in both cases the
    /// provider is never called.
    pub async fn chat(
        &self,
        owner_id: &str,
        agent_id: &str,
        message: &str,
        context: Vec<ChatMessage>,
    ) -> Result<AgentReply, AgentError> {
        let agent = owned_by(self.store.get_agent(agent_id).await?, owner_id, agent_id)?;
        if !agent.is_active {
            return Err(AgentError::InactiveAgent(agent.id));
        }

        let exchange = build_exchange(&agent.system_prompt, context, message);
        debug!(agent_id, model = %agent.model, messages = exchange.len(), "agent chat turn");

        let completion = self
            .gateway
            .complete(&exchange, &agent.model, agent.temperature, agent.max_tokens)
            .await?;

        info!(
            agent_id,
            model = %completion.model,
            finish_reason = %completion.finish_reason,
            total_tokens = completion.usage.map(|u| u.total_tokens),
            "agent chat done"
        );

        Ok(AgentReply {
            response: completion.content,
            agent_id: agent.id,
            model: completion.model,
            usage: completion.usage,
        })
    }

    /// Smoke test: a fixed greeting with no prior context.
    pub async fn test(&self, owner_id: &str, agent_id: &str) -> Result<AgentReply, AgentError> {
        self.chat(owner_id, agent_id, TEST_GREETING, Vec::new()).await
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
