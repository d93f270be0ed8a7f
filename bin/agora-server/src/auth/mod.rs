//! Caller identity.
//!
//! [`IdentityProvider`] registers users, exchanges credentials for bearer
//! tokens and resolves tokens back to an [`Identity`]. The production
//! implementation talks to a hosted GoTrue-compatible auth service
//! ([`hosted::HostedAuth`]).

pub mod hosted;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use hosted::HostedAuth;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
}

/// Tokens issued after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: String,
    pub user: Identity,
}

/// Outcome of a sign-up. `session` is `None` when the auth service requires
/// the address to be confirmed before the first sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user: Identity,
    pub session: Option<AuthSession>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    /// The auth service refused the request for another reason
    /// (duplicate user, weak password, rate limit, …).
    #[error("auth service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("auth service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<Registration, AuthError>;

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Resolve a bearer token to the user it was issued for.
    async fn resolve(&self, token: &str) -> Result<Identity, AuthError>;
}
