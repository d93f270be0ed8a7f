use std::sync::Arc;

use tracing::info;

use super::{owned_by, AgentError};
use crate::entities::{Agent, AgentPatch, AgentStore, NewAgent};

/// CRUD over agents, scoped to the calling user.
pub struct AgentService<S> {
    store: Arc<S>,
}

impl<S> Clone for AgentService<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<S: AgentStore> AgentService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(&self, agent: NewAgent) -> Result<Agent, AgentError> {
        let created = self.store.create_agent(agent).await?;
        info!(agent_id = %created.id, owner_id = %created.owner_id, "agent created");
        Ok(created)
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<Agent>, AgentError> {
        Ok(self.store.list_agents(owner_id).await?)
    }

    pub async fn get(&self, owner_id: &str, id: &str) -> Result<Agent, AgentError> {
        owned_by(self.store.get_agent(id).await?, owner_id, id)
    }

    pub async fn update(&self, owner_id: &str, id: &str, patch: AgentPatch) -> Result<Agent, AgentError> {
        let current = self.get(owner_id, id).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        let updated = self
            .store
            .update_agent(id, patch)
            .await?
            .ok_or_else(|| AgentError::NotFound(id.to_owned()))?;
        info!(agent_id = %id, "agent updated");
        Ok(updated)
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<(), AgentError> {
        self.get(owner_id, id).await?;
        if !self.store.delete_agent(id).await? {
            return Err(AgentError::NotFound(id.to_owned()));
        }
        info!(agent_id = %id, "agent deleted");
        Ok(())
    }
}
