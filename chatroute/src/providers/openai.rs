use super::compatible::OpenAiCompatibleAdapter;
use super::{parse_body, read_success_body, Adapter, InvocationError};
use crate::types::*;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// OpenAI: chat completions plus the image and audio endpoints.
pub struct OpenAiAdapter {
    chat: OpenAiCompatibleAdapter,
    client: Client,
}

impl OpenAiAdapter {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            chat: OpenAiCompatibleAdapter::new(ProviderKind::OpenAi, base_url, client.clone()),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.chat.base_url(), path)
    }

    /// `POST /images/generations` using the last turn as the prompt.
    pub async fn generate_image(
        &self,
        model: &ModelDescriptor,
        prompt: &str,
        credential: &str,
    ) -> Result<String, InvocationError> {
        let profile = model
            .image
            .ok_or(InvocationError::NotImplemented { provider: ProviderKind::OpenAi })?;

        let body = ImageRequest {
            model: model.id,
            prompt,
            n: 1,
            size: profile.size,
            quality: profile.quality,
        };

        let resp = self
            .client
            .post(self.url("images/generations"))
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await?;

        let text = read_success_body(resp).await?;
        let images: ImageResponse = parse_body(ProviderKind::OpenAi, &text)?;
        first_image_url(ProviderKind::OpenAi, images)
    }

    /// `POST /audio/transcriptions` (multipart). Returns the transcribed text.
    pub async fn transcribe(
        &self,
        audio: Bytes,
        file_name: &str,
        credential: &str,
    ) -> Result<String, InvocationError> {
        let file = Part::bytes(audio.to_vec()).file_name(file_name.to_string());
        let form = Form::new()
            .part("file", file)
            .text("model", TRANSCRIPTION_MODEL);

        let resp = self
            .client
            .post(self.url("audio/transcriptions"))
            .bearer_auth(credential)
            .multipart(form)
            .send()
            .await?;

        let text = read_success_body(resp).await?;
        let transcription: TranscriptionResponse = parse_body(ProviderKind::OpenAi, &text)?;
        transcription
            .text
            .ok_or_else(|| InvocationError::malformed(ProviderKind::OpenAi, "missing text"))
    }
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<&'a str>,
}

/// `{ "data": [ { "url": ... } ] }`, shared by every image provider we speak to.
#[derive(Deserialize)]
pub(crate) struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
}

pub(crate) fn first_image_url(
    provider: ProviderKind,
    resp: ImageResponse,
) -> Result<String, InvocationError> {
    resp.data
        .into_iter()
        .next()
        .and_then(|d| d.url)
        .ok_or_else(|| InvocationError::malformed(provider, "missing data[0].url"))
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

#[async_trait]
impl Adapter for OpenAiAdapter {
    async fn invoke(
        &self,
        model: &ModelDescriptor,
        conversation: &[Turn],
        credential: &str,
        options: &RequestOptions,
    ) -> Result<InvocationResult, InvocationError> {
        if model.modality == Modality::Image {
            let prompt = last_prompt(conversation).ok_or(InvocationError::EmptyConversation)?;
            let url = self.generate_image(model, prompt, credential).await?;
            return Ok(InvocationResult::Image { url });
        }
        self.chat.invoke(model, conversation, credential, options).await
    }

    async fn list_models(&self, credential: &str) -> Result<Vec<String>, InvocationError> {
        self.chat.list_models(credential).await
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }
}
