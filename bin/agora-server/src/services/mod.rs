//! Agent operations shared by the HTTP handlers.
//!
//! [`agents::AgentService`] wraps the store with ownership checks;
//! [`agent_chat::AgentChat`] is the chat pipeline (record → prompt →
//! provider → reply).

pub mod agent_chat;
pub mod agents;

use thiserror::Error;

use crate::entities::Agent;
use crate::provider::ProviderError;

pub use agent_chat::{AgentChat, AgentReply};
pub use agents::AgentService;

#[derive(Debug, Error)]
pub enum AgentError {
    /// No agent with this id is visible to the caller.
    #[error("agent {0} not found")]
    NotFound(String),

    #[error("agent {0} is not active")]
    InactiveAgent(String),

    #[error(transparent)]
    Store(#[from] sqlx::Error),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Agents owned by someone else are reported as missing so their existence
/// does not leak across users.
pub(crate) fn owned_by(agent: Option<Agent>, owner_id: &str, id: &str) -> Result<Agent, AgentError> {
    match agent {
        Some(agent) if agent.owner_id == owner_id => Ok(agent),
        _ => Err(AgentError::NotFound(id.to_owned())),
    }
}
