use super::openai::{first_image_url, ImageResponse};
use super::{parse_body, read_success_body, Adapter, InvocationError};
use crate::types::*;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Image-only provider authenticated with an `Api-Key` header.
pub struct IdeogramAdapter {
    base_url: String,
    client: Client,
}

impl IdeogramAdapter {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    aspect_ratio: &'a str,
    model: &'a str,
}

#[async_trait]
impl Adapter for IdeogramAdapter {
    async fn invoke(
        &self,
        model: &ModelDescriptor,
        conversation: &[Turn],
        credential: &str,
        _options: &RequestOptions,
    ) -> Result<InvocationResult, InvocationError> {
        let Some(ImageProfile { size, version: Some(version), .. }) = model.image else {
            return Err(InvocationError::NotImplemented { provider: ProviderKind::Ideogram });
        };
        let prompt = last_prompt(conversation).ok_or(InvocationError::EmptyConversation)?;

        let body = GenerateRequest {
            prompt,
            aspect_ratio: size,
            model: version,
        };

        let resp = self
            .client
            .post(format!("{}/generate", self.base_url))
            .header("Api-Key", credential)
            .json(&body)
            .send()
            .await?;

        let text = read_success_body(resp).await?;
        let images: ImageResponse = parse_body(ProviderKind::Ideogram, &text)?;
        first_image_url(ProviderKind::Ideogram, images).map(InvocationResult::image)
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::Ideogram
    }
}
