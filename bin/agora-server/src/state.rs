//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::config::Config;
use crate::entities::SqliteStore;
use crate::provider::ProviderGateway;
use crate::services::{AgentChat, AgentService};

/// State shared across all HTTP handlers.
///
/// Every collaborator is built once in `main` and is read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// LLM provider gateway.
    pub gateway: Arc<dyn ProviderGateway>,
    /// Resolves bearer tokens and handles sign-up / sign-in.
    pub identity: Arc<dyn IdentityProvider>,
    /// Owner-scoped agent CRUD.
    pub agents: AgentService<SqliteStore>,
    /// Agent chat pipeline.
    pub chat: AgentChat<SqliteStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<SqliteStore>,
        gateway: Arc<dyn ProviderGateway>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            agents: AgentService::new(Arc::clone(&store)),
            chat: AgentChat::new(store, Arc::clone(&gateway)),
            gateway,
            identity,
        }
    }
}
