use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{AuthSession, Identity, Registration};

/// Request body for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl From<AuthSession> for TokenResponse {
    fn from(session: AuthSession) -> Self {
        TokenResponse { access_token: session.access_token, token_type: session.token_type }
    }
}

/// Response body for `POST /auth/register`.
///
/// `access_token` is absent when the address must be confirmed first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user_id: String,
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub access_token: Option<String>,
    pub token_type: String,
    pub confirmation_required: bool,
}

impl From<Registration> for RegisterResponse {
    fn from(reg: Registration) -> Self {
        RegisterResponse {
            user_id: reg.user.id,
            email: reg.user.email,
            confirmation_required: reg.session.is_none(),
            access_token: reg.session.map(|s| s.access_token),
            token_type: "bearer".to_owned(),
        }
    }
}

/// Response body for `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub user_id: String,
    pub email: Option<String>,
}

impl From<Identity> for MeResponse {
    fn from(identity: Identity) -> Self {
        MeResponse { user_id: identity.id, email: identity.email }
    }
}
