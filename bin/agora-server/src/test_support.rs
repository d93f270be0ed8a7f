//! Stub collaborators shared by the unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::auth::{AuthError, AuthSession, Identity, IdentityProvider, Registration};
use crate::config::Config;
use crate::entities::SqliteStore;
use crate::provider::{ChatMessage, Completion, ProviderError, ProviderGateway, TokenUsage};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Gateway that records every call and answers with a canned reply.
#[derive(Debug)]
pub struct RecordingGateway {
    reply: String,
    fail: bool,
    calls: Mutex<Vec<RecordedCall>>,
}

pub const STUB_USAGE: TokenUsage = TokenUsage { prompt_tokens: 5, completion_tokens: 2, total_tokens: 7 };

impl RecordingGateway {
    pub fn replying(reply: &str) -> Self {
        Self { reply: reply.to_owned(), fail: false, calls: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::replying("") }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ProviderGateway for RecordingGateway {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, ProviderError> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            model: model.to_owned(),
            temperature,
            max_tokens,
        });
        if self.fail {
            return Err(ProviderError::Completion {
                model: model.to_owned(),
                source: "upstream exploded".into(),
            });
        }
        Ok(Completion {
            content: self.reply.clone(),
            model: model.to_owned(),
            usage: Some(STUB_USAGE),
            finish_reason: "stop".into(),
        })
    }

    async fn embed(&self, _text: &str, model: &str) -> Result<Vec<f32>, ProviderError> {
        if self.fail {
            return Err(ProviderError::Embedding {
                model: model.to_owned(),
                source: "upstream exploded".into(),
            });
        }
        Ok(vec![0.25, -0.5, 1.0])
    }
}

/// Accepts `token-<name>` bearer tokens and the password `secret`.
#[derive(Debug, Default)]
pub struct StubIdentity;

pub fn token_for(user: &str) -> String {
    format!("token-{user}")
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn register(
        &self,
        email: &str,
        _password: &str,
        _full_name: Option<&str>,
    ) -> Result<Registration, AuthError> {
        let session = self.login(email, "secret").await?;
        Ok(Registration { user: session.user.clone(), session: Some(session) })
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        if password != "secret" {
            return Err(AuthError::InvalidCredentials);
        }
        let name = email.split('@').next().unwrap_or(email);
        Ok(AuthSession {
            access_token: token_for(name),
            token_type: "bearer".into(),
            user: Identity { id: name.to_owned(), email: Some(email.to_owned()) },
        })
    }

    async fn resolve(&self, token: &str) -> Result<Identity, AuthError> {
        token
            .strip_prefix("token-")
            .map(|name| Identity { id: name.to_owned(), email: Some(format!("{name}@example.com")) })
            .ok_or(AuthError::InvalidToken)
    }
}

/// Application state over an in-memory store and the given gateway.
pub async fn test_state(gateway: Arc<RecordingGateway>) -> Arc<AppState> {
    test_state_with(Config { enable_swagger: false, ..Config::default() }, gateway).await
}

pub async fn test_state_with(config: Config, gateway: Arc<RecordingGateway>) -> Arc<AppState> {
    let store = Arc::new(SqliteStore::in_memory().await.expect("in-memory store"));
    Arc::new(AppState::new(config, store, gateway, Arc::new(StubIdentity)))
}

/// Full router over [`test_state`], plus a handle on the recording gateway.
pub async fn test_app(gateway: RecordingGateway) -> (Router, Arc<RecordingGateway>) {
    let gateway = Arc::new(gateway);
    let app = crate::routes::build(test_state(Arc::clone(&gateway)).await);
    (app, gateway)
}

/// Drive one request through `app`. Non-JSON bodies decode to `Value::Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<String>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}
