//! Request body extractor.

use axum::extract::FromRequest;

use crate::error::ServerError;

/// `axum::Json` for request bodies. Parse failures are answered with a 400
/// and the usual `{"error": ...}` body instead of axum's plain-text 422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);
