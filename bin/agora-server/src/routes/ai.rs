//! Direct provider access: ad-hoc chat, embeddings and the model list.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

use crate::error::ServerError;
use crate::provider::DEFAULT_EMBEDDING_MODEL;
use crate::schemas::agents::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::schemas::ai::{
    AiChatRequest, AiChatResponse, EmbeddingRequest, EmbeddingResponse, ModelListResponse,
};
use crate::state::AppState;

use super::extract::ApiJson;

#[derive(OpenApi)]
#[openapi(
    paths(chat, embeddings, list_models),
    components(schemas(
        AiChatRequest,
        AiChatResponse,
        EmbeddingRequest,
        EmbeddingResponse,
        ModelListResponse
    ))
)]
pub struct AiApi;

/// Routes that require a bearer token.
pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ai/chat", post(chat))
        .route("/ai/embeddings", post(embeddings))
}

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new().route("/ai/models", get(list_models))
}

#[utoipa::path(
    post,
    path = "/ai/chat",
    tag = "ai",
    request_body = AiChatRequest,
    responses(
        (status = 200, description = "Completion", body = AiChatResponse),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 502, description = "Provider error"),
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<AiChatRequest>,
) -> Result<Json<AiChatResponse>, ServerError> {
    req.validate()?;
    let model = req.model.as_deref().unwrap_or(DEFAULT_MODEL);
    let completion = state
        .gateway
        .complete(
            &req.messages,
            model,
            req.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        )
        .await?;

    info!(model = %completion.model, messages = req.messages.len(), "ai chat done");
    Ok(Json(AiChatResponse {
        message: completion.content,
        model: completion.model,
        usage: completion.usage,
    }))
}

#[utoipa::path(
    post,
    path = "/ai/embeddings",
    tag = "ai",
    request_body = EmbeddingRequest,
    responses(
        (status = 200, description = "Embedding vector", body = EmbeddingResponse),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 502, description = "Provider error"),
    )
)]
pub async fn embeddings(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<EmbeddingRequest>,
) -> Result<Json<EmbeddingResponse>, ServerError> {
    req.validate()?;
    let model = req.model.unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_owned());
    let embedding = state.gateway.embed(&req.input, &model).await?;
    Ok(Json(EmbeddingResponse { embedding, model }))
}

#[utoipa::path(
    get,
    path = "/ai/models",
    tag = "ai",
    responses(
        (status = 200, description = "Advisory model list", body = ModelListResponse),
    )
)]
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelListResponse> {
    Json(ModelListResponse { models: state.gateway.list_supported_models(), advisory: true })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::provider::Role;
    use crate::test_support::{send, test_app, token_for, RecordingGateway};

    #[tokio::test]
    async fn chat_applies_defaults() {
        let (app, gateway) = test_app(RecordingGateway::replying("pong")).await;
        let (status, body) = send(
            &app,
            "POST",
            "/ai/chat",
            Some(token_for("alice")),
            Some(json!({ "messages": [{ "role": "user", "content": "ping" }] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["message"], "pong");
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["usage"]["prompt_tokens"], 5);

        let call = gateway.last_call().unwrap();
        assert_eq!(call.model, "gpt-3.5-turbo");
        assert_eq!(call.temperature, 0.7);
        assert_eq!(call.max_tokens, 1000);
        assert_eq!(call.messages[0].role, Role::User);
    }

    #[tokio::test]
    async fn chat_forwards_explicit_parameters() {
        let (app, gateway) = test_app(RecordingGateway::replying("pong")).await;
        let (status, _) = send(
            &app,
            "POST",
            "/ai/chat",
            Some(token_for("alice")),
            Some(json!({
                "messages": [{ "role": "system", "content": "s" }, { "role": "user", "content": "u" }],
                "model": "claude-3-haiku-20240307",
                "temperature": 0.1,
                "max_tokens": 32
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let call = gateway.last_call().unwrap();
        assert_eq!(call.model, "claude-3-haiku-20240307");
        assert_eq!(call.temperature, 0.1);
        assert_eq!(call.max_tokens, 32);
        assert_eq!(call.messages.len(), 2);
    }

    #[tokio::test]
    async fn chat_rejects_empty_messages_without_calling_provider() {
        let (app, gateway) = test_app(RecordingGateway::replying("pong")).await;
        let (status, _) = send(
            &app,
            "POST",
            "/ai/chat",
            Some(token_for("alice")),
            Some(json!({ "messages": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn chat_requires_token() {
        let (app, gateway) = test_app(RecordingGateway::replying("pong")).await;
        let (status, _) = send(
            &app,
            "POST",
            "/ai/chat",
            None,
            Some(json!({ "messages": [{ "role": "user", "content": "ping" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn embeddings_default_model() {
        let (app, _) = test_app(RecordingGateway::replying("")).await;
        let (status, body) = send(
            &app,
            "POST",
            "/ai/embeddings",
            Some(token_for("alice")),
            Some(json!({ "input": "hello" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], "text-embedding-ada-002");
        assert_eq!(body["embedding"], json!([0.25, -0.5, 1.0]));
    }

    #[tokio::test]
    async fn embedding_failure_is_bad_gateway() {
        let (app, _) = test_app(RecordingGateway::failing()).await;
        let (status, body) = send(
            &app,
            "POST",
            "/ai/embeddings",
            Some(token_for("alice")),
            Some(json!({ "input": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "embedding generation failed");
    }

    #[tokio::test]
    async fn models_are_public_and_advisory() {
        let (app, _) = test_app(RecordingGateway::replying("")).await;
        let (status, body) = send(&app, "GET", "/ai/models", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["advisory"], true);
        let models = body["models"].as_array().unwrap();
        assert!(models.iter().any(|m| m == "gpt-3.5-turbo"));
    }

    #[tokio::test]
    async fn chat_rejects_unknown_role_as_json_error() {
        let (app, gateway) = test_app(RecordingGateway::replying("pong")).await;
        let (status, body) = send(
            &app,
            "POST",
            "/ai/chat",
            Some(token_for("alice")),
            Some(json!({ "messages": [{ "role": "tool", "content": "ping" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string(), "{body}");
        assert_eq!(gateway.call_count(), 0);
    }
}
