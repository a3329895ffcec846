use super::{parse_body, read_success_body, Adapter, InvocationError};
use crate::types::*;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};

/// Google Generative AI (Gemini API key) adapter. The key travels in the query string.
pub struct GoogleAdapter {
    base_url: String,
    client: Client,
}

impl GoogleAdapter {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        credential: &str,
    ) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.base_url, path))
            .query(&[("key", credential)])
    }

    /// Transport errors carry the request URL, which here includes the key.
    async fn send(req: reqwest::RequestBuilder) -> Result<reqwest::Response, InvocationError> {
        req.send().await.map_err(|e| InvocationError::Network(e.without_url()))
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ModelsListResponse {
    #[serde(default)]
    models: Vec<ModelListEntry>,
}

#[derive(Deserialize)]
struct ModelListEntry {
    name: String,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Gemini has no `assistant` role; prior model turns are `model`.
fn google_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

fn convert_turns(conversation: &[Turn]) -> Vec<Content<'_>> {
    conversation
        .iter()
        .map(|t| Content {
            role: google_role(t.role),
            parts: vec![Part { text: &t.content }],
        })
        .collect()
}

#[async_trait]
impl Adapter for GoogleAdapter {
    async fn invoke(
        &self,
        model: &ModelDescriptor,
        conversation: &[Turn],
        credential: &str,
        options: &RequestOptions,
    ) -> Result<InvocationResult, InvocationError> {
        let path = format!("models/{}:generateContent", model.id);
        let body = GenerateContentRequest {
            contents: convert_turns(conversation),
            generation_config: GenerationConfig {
                temperature: options.temperature_or_default(),
                max_output_tokens: options.max_tokens_or_default(),
            },
        };

        let resp = Self::send(self.request(Method::POST, &path, credential).json(&body)).await?;

        let text = read_success_body(resp).await?;
        let gen_resp: GenerateContentResponse = parse_body(ProviderKind::Google, &text)?;
        gen_resp
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .map(InvocationResult::text)
            .ok_or_else(|| {
                InvocationError::malformed(ProviderKind::Google, "missing candidates[0].content.parts[0].text")
            })
    }

    async fn list_models(&self, credential: &str) -> Result<Vec<String>, InvocationError> {
        let resp = Self::send(self.request(Method::GET, "models", credential)).await?;

        let text = read_success_body(resp).await?;
        let list: ModelsListResponse = parse_body(ProviderKind::Google, &text)?;
        Ok(list
            .models
            .into_iter()
            .map(|m| m.name.strip_prefix("models/").unwrap_or(&m.name).to_string())
            .collect())
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::Google
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_turns_become_model() {
        let turns = [Turn::user("hi"), Turn::assistant("hello"), Turn::user("again")];
        let v = serde_json::to_value(convert_turns(&turns)).unwrap();
        assert_eq!(v[0]["role"], "user");
        assert_eq!(v[1]["role"], "model");
        assert_eq!(v[1]["parts"][0]["text"], "hello");
        assert!(!v.to_string().contains("assistant"));
    }

    #[test]
    fn generation_config_is_camel_case() {
        let body = GenerateContentRequest {
            contents: vec![],
            generation_config: GenerationConfig { temperature: 0.5, max_output_tokens: 1000 },
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["generationConfig"]["maxOutputTokens"], 1000);
        assert_eq!(v["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn key_is_appended_as_query_param() {
        let a = GoogleAdapter::new("https://generativelanguage.googleapis.com/v1beta/", Client::new());
        let req = a
            .request(Method::POST, "models/gemini-1.5-pro:generateContent", "AIza key")
            .build()
            .unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent?key=AIza+key"
        );
    }
}
