//! Agent CRUD and agent chat routes.
//!
//! Every route here sits behind the bearer-token middleware; the resolved
//! [`Identity`] scopes all reads and writes to the caller's own agents.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use utoipa::OpenApi;
use validator::Validate;

use crate::auth::Identity;
use crate::error::ServerError;
use crate::provider::{ChatMessage, Role, TokenUsage};
use crate::schemas::agents::{
    AgentChatRequest, AgentChatResponse, AgentResponse, CreateAgentRequest, DeleteAgentResponse,
    UpdateAgentRequest,
};
use crate::state::AppState;

use super::extract::ApiJson;

#[derive(OpenApi)]
#[openapi(
    paths(create_agent, list_agents, get_agent, update_agent, delete_agent, chat_with_agent, test_agent),
    components(schemas(
        CreateAgentRequest,
        UpdateAgentRequest,
        AgentResponse,
        AgentChatRequest,
        AgentChatResponse,
        DeleteAgentResponse,
        ChatMessage,
        Role,
        TokenUsage
    ))
)]
pub struct AgentsApi;

/// Register agent routes. The trailing-slash collection paths are kept for
/// clients written against `/agents/`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/agents", post(create_agent).get(list_agents))
        .route("/agents/", post(create_agent).get(list_agents))
        .route("/agents/{id}", get(get_agent).put(update_agent).delete(delete_agent))
        .route("/agents/{id}/chat", post(chat_with_agent))
        .route("/agents/{id}/test", get(test_agent))
}

#[utoipa::path(
    post,
    path = "/agents",
    tag = "agents",
    request_body = CreateAgentRequest,
    responses(
        (status = 200, description = "Agent created", body = AgentResponse),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn create_agent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Identity>,
    ApiJson(req): ApiJson<CreateAgentRequest>,
) -> Result<Json<AgentResponse>, ServerError> {
    req.validate()?;
    let agent = state.agents.create(req.into_new_agent(&user.id)).await?;
    Ok(Json(agent.to_response()))
}

#[utoipa::path(
    get,
    path = "/agents",
    tag = "agents",
    responses(
        (status = 200, description = "Agents owned by the caller", body = Vec<AgentResponse>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn list_agents(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Identity>,
) -> Result<Json<Vec<AgentResponse>>, ServerError> {
    let agents = state.agents.list(&user.id).await?;
    Ok(Json(agents.iter().map(|a| a.to_response()).collect()))
}

#[utoipa::path(
    get,
    path = "/agents/{id}",
    tag = "agents",
    params(("id" = String, Path, description = "Agent id")),
    responses(
        (status = 200, description = "Agent", body = AgentResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Agent not found"),
    )
)]
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<AgentResponse>, ServerError> {
    let agent = state.agents.get(&user.id, &id).await?;
    Ok(Json(agent.to_response()))
}

#[utoipa::path(
    put,
    path = "/agents/{id}",
    tag = "agents",
    params(("id" = String, Path, description = "Agent id")),
    request_body = UpdateAgentRequest,
    responses(
        (status = 200, description = "Updated agent", body = AgentResponse),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Agent not found"),
    )
)]
pub async fn update_agent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Identity>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateAgentRequest>,
) -> Result<Json<AgentResponse>, ServerError> {
    req.validate()?;
    let agent = state.agents.update(&user.id, &id, req.into()).await?;
    Ok(Json(agent.to_response()))
}

#[utoipa::path(
    delete,
    path = "/agents/{id}",
    tag = "agents",
    params(("id" = String, Path, description = "Agent id")),
    responses(
        (status = 200, description = "Agent deleted", body = DeleteAgentResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Agent not found"),
    )
)]
pub async fn delete_agent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAgentResponse>, ServerError> {
    state.agents.delete(&user.id, &id).await?;
    Ok(Json(DeleteAgentResponse { message: "Agent deleted successfully".into() }))
}

#[utoipa::path(
    post,
    path = "/agents/{id}/chat",
    tag = "agents",
    params(("id" = String, Path, description = "Agent id")),
    request_body = AgentChatRequest,
    responses(
        (status = 200, description = "Agent reply", body = AgentChatResponse),
        (status = 400, description = "Bad request or agent not active"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Agent not found"),
        (status = 502, description = "Provider error"),
    )
)]
pub async fn chat_with_agent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Identity>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AgentChatRequest>,
) -> Result<Json<AgentChatResponse>, ServerError> {
    req.validate()?;
    let context = req.conversation_context.unwrap_or_default();
    let reply = state.chat.chat(&user.id, &id, &req.message, context).await?;
    Ok(Json(reply.into()))
}

#[utoipa::path(
    get,
    path = "/agents/{id}/test",
    tag = "agents",
    params(("id" = String, Path, description = "Agent id")),
    responses(
        (status = 200, description = "Agent reply to a canned greeting", body = AgentChatResponse),
        (status = 400, description = "Agent not active"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Agent not found"),
        (status = 502, description = "Provider error"),
    )
)]
pub async fn test_agent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<AgentChatResponse>, ServerError> {
    let reply = state.chat.test(&user.id, &id).await?;
    Ok(Json(reply.into()))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
