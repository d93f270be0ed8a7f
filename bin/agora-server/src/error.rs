//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! **Security note:** Internal errors (Database, Provider, auth transport) are
//! logged with full detail but only a generic message is returned to the
//! caller so that SQL, provider payloads or upstream URLs never leak.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::AuthError;
use crate::provider::ProviderError;
use crate::services::AgentError;

/// All errors that can occur in the agora-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the SQLite store.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Propagated from the LLM provider gateway.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Propagated from the identity provider.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// The caller referenced a resource that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or unusable credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            // Client-facing errors: expose the message directly.
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),

            ServerError::Auth(e) => match e {
                AuthError::InvalidCredentials | AuthError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, e.to_string())
                }
                AuthError::Rejected { status, message } if (400..500).contains(status) => {
                    warn!(status, message = %message, "auth service rejected request");
                    let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST);
                    (status, message.clone())
                }
                _ => {
                    error!(error = %e, "auth service error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "authentication service unavailable".to_owned(),
                    )
                }
            },

            // Internal errors: log the full detail, return a generic message.
            ServerError::Provider(e) => {
                error!(error = %e, source = ?std::error::Error::source(e), "provider error");
                let message = match e {
                    ProviderError::Completion { .. } => "AI completion failed",
                    ProviderError::Embedding { .. } => "embedding generation failed",
                };
                (StatusCode::BAD_GATEWAY, message.to_owned())
            }
            ServerError::Database(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

impl From<AgentError> for ServerError {
    fn from(e: AgentError) -> Self {
        match e {
            AgentError::NotFound(id) => ServerError::NotFound(format!("agent {id} not found")),
            AgentError::InactiveAgent(_) => ServerError::BadRequest("Agent is not active".into()),
            AgentError::Store(e) => ServerError::Database(e),
            AgentError::Provider(e) => ServerError::Provider(e),
        }
    }
}

impl From<validator::ValidationErrors> for ServerError {
    fn from(e: validator::ValidationErrors) -> Self {
        ServerError::BadRequest(e.to_string())
    }
}

/// Bodies that fail to parse (bad JSON, missing fields, unknown roles) are
/// reported like validation failures.
impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}
