use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::Span;

use crate::error::ServerError;
use crate::state::AppState;

/// Resolve the bearer token through the identity provider and attach the
/// resulting [`crate::auth::Identity`] to the request extensions.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        return ServerError::Unauthorized("missing bearer token".into()).into_response();
    };

    match state.identity.resolve(token).await {
        Ok(identity) => {
            Span::current().record("user_id", identity.id.as_str());
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(e) => ServerError::from(e).into_response(),
    }
}
