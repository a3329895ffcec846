pub mod anthropic;
pub mod compatible;
pub mod google;
pub mod ideogram;
pub mod openai;
pub mod pending;
pub mod sanitize;

use crate::types::{InvocationResult, ModelDescriptor, ProviderKind, RequestOptions, Turn};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors from routing or provider operations.
///
/// Adapters classify at the point of detection; the router passes the
/// classification through untouched.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error("API key for {} is required", .provider.display_name())]
    MissingCredential { provider: ProviderKind },

    #[error("Invalid {} credential: {reason}", .provider.display_name())]
    InvalidCredentialFormat { provider: ProviderKind, reason: String },

    #[error("Model {0} not found")]
    UnknownModel(String),

    #[error("{} integration is not implemented", .provider.display_name())]
    NotImplemented { provider: ProviderKind },

    #[error("Conversation is empty")]
    EmptyConversation,

    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Rate limited ({status}): {message}")]
    RateLimited { status: u16, message: String },

    #[error("Bad request ({status}): {message}")]
    BadRequest { status: u16, message: String },

    #[error("HTTP error {status}: {message}")]
    RemoteError { status: u16, message: String },

    #[error("Malformed {} response: {detail}", .provider.display_name())]
    MalformedResponse { provider: ProviderKind, detail: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Fieldless mirror of [`InvocationError`] for matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingCredential,
    InvalidCredentialFormat,
    UnknownModel,
    NotImplemented,
    EmptyConversation,
    Unauthorized,
    RateLimited,
    BadRequest,
    RemoteError,
    MalformedResponse,
    Network,
}

impl InvocationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InvocationError::MissingCredential { .. } => ErrorKind::MissingCredential,
            InvocationError::InvalidCredentialFormat { .. } => ErrorKind::InvalidCredentialFormat,
            InvocationError::UnknownModel(_) => ErrorKind::UnknownModel,
            InvocationError::NotImplemented { .. } => ErrorKind::NotImplemented,
            InvocationError::EmptyConversation => ErrorKind::EmptyConversation,
            InvocationError::Unauthorized { .. } => ErrorKind::Unauthorized,
            InvocationError::RateLimited { .. } => ErrorKind::RateLimited,
            InvocationError::BadRequest { .. } => ErrorKind::BadRequest,
            InvocationError::RemoteError { .. } => ErrorKind::RemoteError,
            InvocationError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            InvocationError::Network(_) => ErrorKind::Network,
        }
    }

    /// HTTP status that produced this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            InvocationError::Unauthorized { status, .. }
            | InvocationError::RateLimited { status, .. }
            | InvocationError::BadRequest { status, .. }
            | InvocationError::RemoteError { status, .. } => Some(*status),
            InvocationError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Classify a non-2xx response.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => InvocationError::BadRequest { status, message },
            401 => InvocationError::Unauthorized { status, message },
            429 => InvocationError::RateLimited { status, message },
            _ => InvocationError::RemoteError { status, message },
        }
    }

    pub fn malformed(provider: ProviderKind, detail: impl Into<String>) -> Self {
        InvocationError::MalformedResponse { provider, detail: detail.into() }
    }
}

/// Base URLs for every provider endpoint. Defaults point at the public APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub openai: String,
    pub anthropic: String,
    pub google: String,
    pub deepseek: String,
    pub ideogram: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openai: "https://api.openai.com/v1".into(),
            anthropic: "https://api.anthropic.com/v1".into(),
            google: "https://generativelanguage.googleapis.com/v1beta".into(),
            deepseek: "https://api.deepseek.com/v1".into(),
            ideogram: "https://api.ideogram.ai".into(),
        }
    }
}

impl Endpoints {
    /// Point every provider at the same base URL (handy for a local mock server).
    pub fn all(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            openai: base.clone(),
            anthropic: base.clone(),
            google: base.clone(),
            deepseek: base.clone(),
            ideogram: base,
        }
    }
}

/// One wire protocol.
///
/// Each provider (OpenAI, Anthropic, Google, etc.) implements this trait to
/// shape the request, attach the credential and pull the answer out of the
/// response envelope.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Execute one request/response round trip.
    async fn invoke(
        &self,
        model: &ModelDescriptor,
        conversation: &[Turn],
        credential: &str,
        options: &RequestOptions,
    ) -> Result<InvocationResult, InvocationError>;

    /// List model ids visible to this credential. Used as a cheap key check.
    async fn list_models(&self, credential: &str) -> Result<Vec<String>, InvocationError> {
        let _ = credential;
        Err(InvocationError::NotImplemented { provider: self.provider() })
    }

    fn provider(&self) -> ProviderKind;
}

/// Read a response body, turning non-2xx statuses into classified errors.
pub(crate) async fn read_success_body(resp: reqwest::Response) -> Result<String, InvocationError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| InvocationError::Network(e.without_url()))?;
    if !status.is_success() {
        return Err(sanitize::api_error_body(status.as_u16(), &body));
    }
    Ok(body)
}

/// Parse a 2xx body, mapping anything unparseable to `MalformedResponse`.
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(
    provider: ProviderKind,
    body: &str,
) -> Result<T, InvocationError> {
    serde_json::from_str(body).map_err(|e| InvocationError::malformed(provider, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_classifies() {
        assert_eq!(InvocationError::from_status(400, "x").kind(), ErrorKind::BadRequest);
        assert_eq!(InvocationError::from_status(401, "x").kind(), ErrorKind::Unauthorized);
        assert_eq!(InvocationError::from_status(429, "x").kind(), ErrorKind::RateLimited);
        assert_eq!(InvocationError::from_status(403, "x").kind(), ErrorKind::RemoteError);
        assert_eq!(InvocationError::from_status(503, "x").kind(), ErrorKind::RemoteError);
    }

    #[test]
    fn status_is_kept_as_context() {
        let err = InvocationError::from_status(502, "bad gateway");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "HTTP error 502: bad gateway");
        assert_eq!(InvocationError::UnknownModel("x".into()).status(), None);
    }

    #[test]
    fn messages_use_display_names() {
        let err = InvocationError::MissingCredential { provider: ProviderKind::DeepSeek };
        assert_eq!(err.to_string(), "API key for DeepSeek is required");
        let err = InvocationError::UnknownModel("nope".into());
        assert_eq!(err.to_string(), "Model nope not found");
    }

    #[test]
    fn endpoints_all_trims_trailing_slash() {
        let e = Endpoints::all("http://127.0.0.1:9000/");
        assert_eq!(e.openai, "http://127.0.0.1:9000");
        assert_eq!(e.ideogram, "http://127.0.0.1:9000");
    }

    #[test]
    fn endpoints_deserialize_partial_overrides() {
        let e: Endpoints = serde_json::from_str(r#"{"deepseek":"http://localhost:1"}"#).unwrap();
        assert_eq!(e.deepseek, "http://localhost:1");
        assert_eq!(e.openai, Endpoints::default().openai);
    }
}
