//! [`ProviderGateway`] backed by the `genai` multi-provider client.
//!
//! `genai` picks the vendor adapter from the model name (`gpt-*` → OpenAI,
//! `claude-*` → Anthropic, …). API keys come from [`ProviderKeys`]; when a
//! key is not configured the client falls back to its own environment
//! lookup, so a missing key only fails the request that needs it.

use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{ChatMessage as GenaiMessage, ChatOptions, ChatRequest};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, ModelIden};
use tracing::debug;

use super::{ChatMessage, Completion, ProviderError, ProviderGateway, Role, TokenUsage};
use crate::config::ProviderKeys;

/// Stop reason reported when the client does not surface one.
const DEFAULT_FINISH_REASON: &str = "stop";

pub struct GenaiGateway {
    client: Client,
}

impl std::fmt::Debug for GenaiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GenaiGateway")
    }
}

impl GenaiGateway {
    pub fn new(keys: ProviderKeys) -> Self {
        let auth_resolver = AuthResolver::from_resolver_fn(
            move |model_iden: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
                Ok(key_for(&keys, model_iden.adapter_kind).map(AuthData::from_single))
            },
        );
        let client = Client::builder().with_auth_resolver(auth_resolver).build();
        Self { client }
    }
}

#[async_trait]
impl ProviderGateway for GenaiGateway {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, ProviderError> {
        let request = ChatRequest::new(messages.iter().map(to_genai_message).collect());
        let options = ChatOptions::default()
            .with_temperature(f64::from(temperature))
            .with_max_tokens(max_tokens);

        debug!(model, messages = messages.len(), "dispatching chat completion");

        let response = self
            .client
            .exec_chat(model, request, Some(&options))
            .await
            .map_err(|e| ProviderError::Completion {
                model: model.to_owned(),
                source: Box::new(e),
            })?;

        let usage = usage_from_counts(
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            response.usage.total_tokens,
        );

        Ok(Completion {
            content: response.first_text().unwrap_or_default().to_owned(),
            model: response.model_iden.model_name.to_string(),
            usage,
            finish_reason: DEFAULT_FINISH_REASON.to_owned(),
        })
    }

    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>, ProviderError> {
        let response = self
            .client
            .embed(model, text.to_owned(), None)
            .await
            .map_err(|e| ProviderError::Embedding {
                model: model.to_owned(),
                source: Box::new(e),
            })?;

        response
            .first_embedding()
            .map(|embedding| embedding.vector().to_vec())
            .ok_or_else(|| ProviderError::Embedding {
                model: model.to_owned(),
                source: "provider returned no embedding".into(),
            })
    }
}

fn key_for(keys: &ProviderKeys, kind: AdapterKind) -> Option<String> {
    match kind {
        AdapterKind::OpenAI => keys.openai.clone(),
        AdapterKind::Anthropic => keys.anthropic.clone(),
        AdapterKind::Gemini => keys.gemini.clone(),
        AdapterKind::Groq => keys.groq.clone(),
        _ => None,
    }
}

fn to_genai_message(message: &ChatMessage) -> GenaiMessage {
    let content = message.content.clone();
    match message.role {
        Role::System => GenaiMessage::system(content),
        Role::User => GenaiMessage::user(content),
        Role::Assistant => GenaiMessage::assistant(content),
    }
}

/// Providers report counts as optional signed integers; `None` when nothing
/// was reported at all.
fn usage_from_counts(
    prompt: Option<i32>,
    completion: Option<i32>,
    total: Option<i32>,
) -> Option<TokenUsage> {
    if prompt.is_none() && completion.is_none() && total.is_none() {
        return None;
    }
    let count = |v: Option<i32>| v.map(|n| u32::try_from(n).unwrap_or(0)).unwrap_or(0);
    let prompt_tokens = count(prompt);
    let completion_tokens = count(completion);
    Some(TokenUsage {
        prompt_tokens,
        completion_tokens,
        total_tokens: total
            .map(|_| count(total))
            .unwrap_or(prompt_tokens + completion_tokens),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn keys() -> ProviderKeys {
        ProviderKeys {
            openai: Some("sk-openai".into()),
            anthropic: Some("sk-ant".into()),
            gemini: None,
            groq: None,
        }
    }

    #[test]
    fn keys_are_selected_by_adapter() {
        assert_eq!(key_for(&keys(), AdapterKind::OpenAI).as_deref(), Some("sk-openai"));
        assert_eq!(key_for(&keys(), AdapterKind::Anthropic).as_deref(), Some("sk-ant"));
        assert_eq!(key_for(&keys(), AdapterKind::Gemini), None);
        assert_eq!(key_for(&keys(), AdapterKind::Ollama), None);
    }

    #[test]
    fn usage_absent_when_provider_reports_nothing() {
        assert_eq!(usage_from_counts(None, None, None), None);
    }

    #[test]
    fn usage_total_is_derived_when_missing() {
        let usage = usage_from_counts(Some(12), Some(5), None).unwrap();
        assert_eq!(usage.total_tokens, 17);
    }

    #[test]
    fn usage_keeps_reported_total_and_clamps_negatives() {
        let usage = usage_from_counts(Some(-1), Some(4), Some(9)).unwrap();
        assert_eq!(usage.prompt_tokens, 0);
        assert_eq!(usage.completion_tokens, 4);
        assert_eq!(usage.total_tokens, 9);
    }
}
