//! Sign-up, sign-in and caller introspection, delegated to the identity
//! provider.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

use crate::auth::Identity;
use crate::error::ServerError;
use crate::schemas::auth::{LoginRequest, MeResponse, RegisterRequest, RegisterResponse, TokenResponse};
use crate::state::AppState;

use super::extract::ApiJson;

#[derive(OpenApi)]
#[openapi(
    paths(register, login, me),
    components(schemas(LoginRequest, RegisterRequest, RegisterResponse, TokenResponse, MeResponse))
)]
pub struct AuthApi;

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Routes that require a bearer token.
pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(me))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Bad request"),
        (status = 422, description = "Rejected by the identity provider"),
        (status = 502, description = "Identity provider unavailable"),
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ServerError> {
    req.validate()?;
    let registration = state
        .identity
        .register(&req.email, &req.password, req.full_name.as_deref())
        .await?;
    info!(user_id = %registration.user.id, confirmed = registration.session.is_some(), "user registered");
    Ok(Json(registration.into()))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token", body = TokenResponse),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Invalid credentials"),
        (status = 502, description = "Identity provider unavailable"),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ServerError> {
    req.validate()?;
    let session = state.identity.login(&req.email, &req.password).await?;
    info!(user_id = %session.user.id, "user logged in");
    Ok(Json(session.into()))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Caller identity", body = MeResponse),
        (status = 401, description = "Missing or invalid bearer token"),
    )
)]
pub async fn me(Extension(user): Extension<Identity>) -> Json<MeResponse> {
    Json(user.into())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
