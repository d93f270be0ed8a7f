//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Optional Swagger UI / OpenAPI document endpoint (disable with `AGORA_ENABLE_SWAGGER=false`)
//! - Public banner, health, model list and sign-up / sign-in routes
//! - Bearer-protected agent, AI and `/auth/me` routes

mod agents;
mod ai;
mod auth;
mod extract;
pub mod doc;
mod health;

use axum::{
    middleware::{self},
    Router,
};
use crate::middleware::{auth::require_auth, cors, trace};
use crate::state::AppState;
use std::sync::Arc;
use tower::ServiceBuilder;
use utoipa_swagger_ui::SwaggerUi;
// ── Router builder ────────────────────────────────────────────────────────────

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .merge(health::router())
        .merge(ai::public_router())
        .merge(auth::public_router());

    // route_layer so unmatched paths still 404 instead of 401.
    let protected = Router::new()
        .merge(agents::router())
        .merge(ai::protected_router())
        .merge(auth::protected_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let mut app = Router::new().merge(public).merge(protected);

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    app
        // Outermost layers execute first on the way in.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(state.clone())))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            trace::trace_middleware,
        ))
        .with_state(state)
}
