//! OpenAI-compatible `/chat/completions` protocol, shared by OpenAI and DeepSeek.

use super::{parse_body, read_success_body, Adapter, InvocationError};
use crate::types::*;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Adapter that speaks OpenAI-compatible `/chat/completions` (and GET `/models`).
pub struct OpenAiCompatibleAdapter {
    provider: ProviderKind,
    base_url: String,
    client: Client,
}

impl OpenAiCompatibleAdapter {
    /// `base_url` is the API root; a full `.../chat/completions` URL is cut back to it.
    pub fn new(provider: ProviderKind, base_url: &str, client: Client) -> Self {
        let trimmed = base_url.trim_end_matches('/');
        let root = trimmed.strip_suffix("/chat/completions").unwrap_or(trimmed);
        Self {
            provider,
            base_url: root.to_string(),
            client,
        }
    }

    /// API root that every endpoint path hangs off.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }

    /// Text completion over the full conversation.
    pub async fn chat(
        &self,
        model: &ModelDescriptor,
        conversation: &[Turn],
        credential: &str,
        options: &RequestOptions,
    ) -> Result<String, InvocationError> {
        let body = ChatRequest {
            model: model.id,
            messages: conversation
                .iter()
                .map(|t| ChatMsg { role: t.role.as_str(), content: &t.content })
                .collect(),
            max_tokens: options.max_tokens_or_default(),
            temperature: options.temperature_or_default(),
        };

        let resp = self
            .client
            .post(self.chat_completions_url())
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await?;

        let text = read_success_body(resp).await?;
        let chat_resp: ChatResponse = parse_body(self.provider, &text)?;
        chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| InvocationError::malformed(self.provider, "missing choices[0].message.content"))
    }
}

// ---- Request/response types (OpenAI wire format) ----
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMsg<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMsg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResp>,
}

#[derive(Deserialize)]
struct ChatMessageResp {
    content: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct ModelsResponse {
    #[serde(default)]
    pub(crate) data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
pub(crate) struct ModelEntry {
    pub(crate) id: String,
}

#[async_trait]
impl Adapter for OpenAiCompatibleAdapter {
    async fn invoke(
        &self,
        model: &ModelDescriptor,
        conversation: &[Turn],
        credential: &str,
        options: &RequestOptions,
    ) -> Result<InvocationResult, InvocationError> {
        self.chat(model, conversation, credential, options)
            .await
            .map(|content| InvocationResult::Text { content })
    }

    async fn list_models(&self, credential: &str) -> Result<Vec<String>, InvocationError> {
        let resp = self
            .client
            .get(self.models_url())
            .bearer_auth(credential)
            .send()
            .await?;

        let text = read_success_body(resp).await?;
        let models: ModelsResponse = parse_body(self.provider, &text)?;
        Ok(models.data.into_iter().map(|m| m.id).collect())
    }

    fn provider(&self) -> ProviderKind {
        self.provider
    }
}
