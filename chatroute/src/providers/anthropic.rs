use super::{parse_body, read_success_body, Adapter, InvocationError};
use super::compatible::ModelsResponse;
use crate::types::*;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicAdapter {
    base_url: String,
    client: Client,
}

impl AnthropicAdapter {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn with_auth(req: RequestBuilder, credential: &str) -> RequestBuilder {
        req.header("x-api-key", credential)
            .header("anthropic-version", ANTHROPIC_VERSION)
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<AnthropicContentResp>,
}

#[derive(Deserialize)]
struct AnthropicContentResp {
    text: Option<String>,
}

#[async_trait]
impl Adapter for AnthropicAdapter {
    async fn invoke(
        &self,
        model: &ModelDescriptor,
        conversation: &[Turn],
        credential: &str,
        options: &RequestOptions,
    ) -> Result<InvocationResult, InvocationError> {
        let body = MessagesRequest {
            model: model.id,
            max_tokens: options.max_tokens_or_default(),
            temperature: options.temperature_or_default(),
            messages: conversation
                .iter()
                .map(|t| AnthropicMessage { role: t.role.as_str(), content: &t.content })
                .collect(),
        };

        let url = format!("{}/messages", self.base_url);
        let resp = Self::with_auth(self.client.post(&url), credential)
            .json(&body)
            .send()
            .await?;

        let text = read_success_body(resp).await?;
        let msg: MessagesResponse = parse_body(ProviderKind::Anthropic, &text)?;
        msg.content
            .into_iter()
            .next()
            .and_then(|c| c.text)
            .map(InvocationResult::text)
            .ok_or_else(|| InvocationError::malformed(ProviderKind::Anthropic, "missing content[0].text"))
    }

    async fn list_models(&self, credential: &str) -> Result<Vec<String>, InvocationError> {
        let url = format!("{}/models", self.base_url);
        let resp = Self::with_auth(self.client.get(&url), credential).send().await?;

        let text = read_success_body(resp).await?;
        let models: ModelsResponse = parse_body(ProviderKind::Anthropic, &text)?;
        Ok(models.data.into_iter().map(|m| m.id).collect())
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }
}
