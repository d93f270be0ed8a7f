//! [`IdentityProvider`] backed by a hosted GoTrue-compatible auth service
//! (the `/auth/v1` API exposed by Supabase).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{AuthError, AuthSession, Identity, IdentityProvider, Registration};

#[derive(Debug, Clone)]
pub struct HostedAuth {
    client: reqwest::Client,
    base_url: String,
    public_key: String,
}

impl HostedAuth {
    /// `base_url` is the project URL, e.g. `https://xyz.supabase.co`;
    /// `public_key` is the anon key sent as the `apikey` header.
    pub fn new(base_url: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            public_key: public_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn anon_post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.endpoint(path))
            .header("apikey", &self.public_key)
            .bearer_auth(&self.public_key)
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UserBody {
    id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    access_token: String,
    token_type: Option<String>,
    user: UserBody,
}

/// Sign-up answers with a session when e-mail confirmation is disabled and
/// with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignupBody {
    Session(SessionBody),
    User(UserBody),
}

impl From<UserBody> for Identity {
    fn from(user: UserBody) -> Self {
        Identity { id: user.id, email: user.email }
    }
}

impl From<SessionBody> for AuthSession {
    fn from(body: SessionBody) -> Self {
        AuthSession {
            access_token: body.access_token,
            token_type: body.token_type.unwrap_or_else(|| "bearer".to_owned()),
            user: body.user.into(),
        }
    }
}

/// GoTrue versions put the human-readable text under different keys.
fn error_message(body: &serde_json::Value) -> String {
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|k| body.get(*k).and_then(|v| v.as_str()))
        .unwrap_or("unknown error")
        .to_owned()
}

async fn error_body(response: reqwest::Response) -> (u16, serde_json::Value) {
    let status = response.status().as_u16();
    (status, response.json().await.unwrap_or_default())
}

async fn rejection(response: reqwest::Response) -> AuthError {
    let (status, body) = error_body(response).await;
    AuthError::Rejected { status, message: error_message(&body) }
}

/// `/token` answers 400 both for a bad password and for an account that
/// cannot sign in yet; only the former is reported as bad credentials.
fn login_failure(status: u16, body: &serde_json::Value) -> AuthError {
    let code = body.get("error_code").and_then(|v| v.as_str());
    let message = error_message(body);
    let unconfirmed = code == Some("email_not_confirmed")
        || message.to_ascii_lowercase().contains("not confirmed");

    match code {
        _ if status == StatusCode::UNAUTHORIZED.as_u16() => AuthError::InvalidCredentials,
        Some("invalid_credentials") => AuthError::InvalidCredentials,
        None if !unconfirmed => AuthError::InvalidCredentials,
        _ => AuthError::Rejected { status, message },
    }
}

#[async_trait]
impl IdentityProvider for HostedAuth {
    async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<Registration, AuthError> {
        let response = self
            .anon_post("/signup")
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let registration = match response.json::<SignupBody>().await? {
            SignupBody::Session(body) => {
                let session = AuthSession::from(body);
                Registration { user: session.user.clone(), session: Some(session) }
            }
            SignupBody::User(user) => Registration { user: user.into(), session: None },
        };
        debug!(user_id = %registration.user.id, confirmed = registration.session.is_some(), "user registered");
        Ok(registration)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let response = self
            .anon_post("/token?grant_type=password")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(response.json::<SessionBody>().await?.into()),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                let (status, body) = error_body(response).await;
                Err(login_failure(status, &body))
            }
            _ => Err(rejection(response).await),
        }
    }

    async fn resolve(&self, token: &str) -> Result<Identity, AuthError> {
        let response = self
            .client
            .get(self.endpoint("/user"))
            .header("apikey", &self.public_key)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(response.json::<UserBody>().await?.into()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidToken),
            _ => Err(rejection(response).await),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
