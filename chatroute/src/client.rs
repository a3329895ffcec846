use crate::auth::{validate_credential, CredentialPolicy, CredentialSet};
use crate::models::find_model;
use crate::providers::anthropic::AnthropicAdapter;
use crate::providers::compatible::OpenAiCompatibleAdapter;
use crate::providers::google::GoogleAdapter;
use crate::providers::ideogram::IdeogramAdapter;
use crate::providers::openai::OpenAiAdapter;
use crate::providers::pending::PendingAdapter;
use crate::providers::{Adapter, Endpoints, InvocationError};
use crate::types::*;
use bytes::Bytes;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;

/// A text document handed over by a file collaborator, already extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub content: String,
}

impl Document {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self { file_name: file_name.into(), content: content.into() }
    }
}

/// Single-turn prompt used for document analysis.
pub fn document_prompt(file_name: &str, content: &str) -> String {
    format!("Please analyze this document ({}):\n\n{}", file_name, content)
}

/// Stateless router: resolves a model id to its provider, picks the
/// credential and dispatches to that provider's adapter.
#[derive(Clone)]
pub struct AiRouter {
    adapters: HashMap<ProviderKind, Arc<dyn Adapter>>,
    openai: Arc<OpenAiAdapter>,
    policy: CredentialPolicy,
}

impl AiRouter {
    pub fn builder() -> AiRouterBuilder {
        AiRouterBuilder::new()
    }

    pub fn credential_policy(&self) -> CredentialPolicy {
        self.policy
    }

    /// Route one conversation to the model's provider.
    pub async fn route(
        &self,
        conversation: &[Turn],
        credentials: &CredentialSet,
        model_id: &str,
        options: &RequestOptions,
    ) -> Result<InvocationResult, InvocationError> {
        let model = find_model(model_id)
            .ok_or_else(|| InvocationError::UnknownModel(model_id.to_string()))?;
        let credential = self.credential_for(model.provider, credentials)?;
        if conversation.is_empty() {
            return Err(InvocationError::EmptyConversation);
        }

        let adapter = self.adapter(model.provider);
        tracing::debug!(
            provider = %model.provider,
            model = model.id,
            turns = conversation.len(),
            "dispatching"
        );

        let result = adapter.invoke(model, conversation, credential, options).await;
        if let Err(e) = &result {
            tracing::warn!(provider = %model.provider, model = model.id, kind = ?e.kind(), "invocation failed: {}", e);
        }
        result
    }

    /// Analyze one extracted document with `model_id`.
    pub async fn analyze_document(
        &self,
        document: &Document,
        credentials: &CredentialSet,
        model_id: &str,
        options: &RequestOptions,
    ) -> Result<InvocationResult, InvocationError> {
        let conversation = [Turn::user(document_prompt(&document.file_name, &document.content))];
        self.route(&conversation, credentials, model_id, options).await
    }

    /// One independent analysis per document, issued concurrently.
    /// Results come back in input order.
    pub async fn analyze_documents(
        &self,
        documents: &[Document],
        credentials: &CredentialSet,
        model_id: &str,
        options: &RequestOptions,
    ) -> Vec<Result<InvocationResult, InvocationError>> {
        join_all(
            documents
                .iter()
                .map(|doc| self.analyze_document(doc, credentials, model_id, options)),
        )
        .await
    }

    /// Speech-to-text through OpenAI. Needs the OpenAI credential.
    pub async fn transcribe(
        &self,
        audio: Bytes,
        file_name: &str,
        credentials: &CredentialSet,
    ) -> Result<String, InvocationError> {
        let credential = self.credential_for(ProviderKind::OpenAi, credentials)?;
        tracing::debug!(file_name, bytes = audio.len(), "transcribing");
        self.openai.transcribe(audio, file_name, credential).await
    }

    /// Ask the provider which models this credential can see. Doubles as a key check.
    pub async fn list_remote_models(
        &self,
        provider: ProviderKind,
        credentials: &CredentialSet,
    ) -> Result<Vec<String>, InvocationError> {
        let credential = self.credential_for(provider, credentials)?;
        self.adapter(provider).list_models(credential).await
    }

    fn adapter(&self, provider: ProviderKind) -> &Arc<dyn Adapter> {
        // The builder registers every ProviderKind.
        &self.adapters[&provider]
    }

    fn credential_for<'a>(
        &self,
        provider: ProviderKind,
        credentials: &'a CredentialSet,
    ) -> Result<&'a str, InvocationError> {
        let credential = credentials
            .get(provider)
            .ok_or(InvocationError::MissingCredential { provider })?;

        if let Err(issue) = validate_credential(Some(credential), provider) {
            match self.policy {
                CredentialPolicy::Enforce => {
                    return Err(InvocationError::InvalidCredentialFormat {
                        provider,
                        reason: issue.to_string(),
                    });
                }
                CredentialPolicy::Warn => {
                    tracing::warn!(%provider, "{}; sending anyway", issue);
                }
            }
        }
        Ok(credential)
    }
}

pub struct AiRouterBuilder {
    endpoints: Endpoints,
    http: Option<reqwest::Client>,
    overrides: HashMap<ProviderKind, Arc<dyn Adapter>>,
    policy: CredentialPolicy,
}

impl Default for AiRouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AiRouterBuilder {
    pub fn new() -> Self {
        Self {
            endpoints: Endpoints::default(),
            http: None,
            overrides: HashMap::new(),
            policy: CredentialPolicy::default(),
        }
    }

    /// Base URLs for the built-in adapters.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Share an HTTP client (and its timeout/proxy settings) with every adapter.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Replace the adapter for one provider.
    pub fn with_adapter(mut self, provider: ProviderKind, adapter: Arc<dyn Adapter>) -> Self {
        self.overrides.insert(provider, adapter);
        self
    }

    pub fn with_credential_policy(mut self, policy: CredentialPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> AiRouter {
        let client = self.http.unwrap_or_default();
        let e = &self.endpoints;

        let openai = Arc::new(OpenAiAdapter::new(&e.openai, client.clone()));

        let mut adapters: HashMap<ProviderKind, Arc<dyn Adapter>> = HashMap::new();
        for provider in ProviderKind::ALL {
            let adapter: Arc<dyn Adapter> = match provider {
                ProviderKind::OpenAi => openai.clone(),
                ProviderKind::Anthropic => Arc::new(AnthropicAdapter::new(&e.anthropic, client.clone())),
                ProviderKind::Google => Arc::new(GoogleAdapter::new(&e.google, client.clone())),
                ProviderKind::DeepSeek => Arc::new(OpenAiCompatibleAdapter::new(
                    ProviderKind::DeepSeek,
                    &e.deepseek,
                    client.clone(),
                )),
                ProviderKind::Ideogram => Arc::new(IdeogramAdapter::new(&e.ideogram, client.clone())),
                ProviderKind::Midjourney => Arc::new(PendingAdapter::new(ProviderKind::Midjourney)),
            };
            adapters.insert(provider, adapter);
        }
        adapters.extend(self.overrides);

        AiRouter {
            adapters,
            openai,
            policy: self.policy,
        }
    }
}
