use chrono::{DateTime, Utc};

/// A row in the `agents` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: String,
    /// Identity id of the user that created the agent.
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub system_prompt: String,
    /// Provider model identifier, e.g. `"gpt-4"` or `"claude-3-haiku-20240307"`.
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Inactive agents refuse chat requests.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new agent. The store assigns `id`,
/// timestamps and `is_active = true`.
#[derive(Debug, Clone)]
pub struct NewAgent {
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub system_prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Partial update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default)]
pub struct AgentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub system_prompt: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub is_active: Option<bool>,
}

impl AgentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.system_prompt.is_none()
            && self.model.is_none()
            && self.temperature.is_none()
            && self.max_tokens.is_none()
            && self.is_active.is_none()
    }
}
