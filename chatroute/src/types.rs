use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Provider identifiers
// ---------------------------------------------------------------------------

/// Every provider the router knows about. Each one owns a distinct wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Google,
    DeepSeek,
    Ideogram,
    Midjourney,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Google,
        ProviderKind::DeepSeek,
        ProviderKind::Ideogram,
        ProviderKind::Midjourney,
    ];

    /// Storage / wire name, e.g. `"openai"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::Ideogram => "ideogram",
            ProviderKind::Midjourney => "midjourney",
        }
    }

    /// Human-friendly name used in messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Google => "Google",
            ProviderKind::DeepSeek => "DeepSeek",
            ProviderKind::Ideogram => "Ideogram",
            ProviderKind::Midjourney => "Midjourney",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct ProviderParseError(pub String);

impl FromStr for ProviderKind {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| ProviderParseError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Model descriptors
// ---------------------------------------------------------------------------

/// What a model produces (or accepts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
    Multimodal,
}

/// Per-model image generation attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageProfile {
    /// Size hint sent to the provider: pixel dimensions for OpenAI, an aspect
    /// ratio token for Ideogram.
    pub size: &'static str,
    /// Quality tier; only set for premium models.
    pub quality: Option<&'static str>,
    /// Provider-side model version, for APIs that name models differently
    /// from the registry (Ideogram's `V_2`).
    pub version: Option<&'static str>,
}

/// A model definition known to the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    /// Model ID as sent to the provider API (e.g. "gpt-4o").
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Which provider owns this model.
    pub provider: ProviderKind,
    pub modality: Modality,
    pub description: &'static str,
    /// Present for image models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageProfile>,
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of dialogue history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// The effective prompt for single-shot operations: the last turn's content.
pub fn last_prompt(conversation: &[Turn]) -> Option<&str> {
    conversation.last().map(|t| t.content.as_str())
}

// ---------------------------------------------------------------------------
// Request options / results
// ---------------------------------------------------------------------------

/// Per-call generation options. Unset fields fall back to the adapter defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

impl RequestOptions {
    pub fn max_tokens_or_default(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn temperature_or_default(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}

/// Normalized output of any adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvocationResult {
    Text { content: String },
    Image { url: String },
}

impl InvocationResult {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { content: content.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::Image { url: url.into() }
    }

    /// True when this variant is the one a model of `modality` should produce.
    pub fn matches_modality(&self, modality: Modality) -> bool {
        match self {
            InvocationResult::Text { .. } => modality != Modality::Image,
            InvocationResult::Image { .. } => modality == Modality::Image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parses_wire_names() {
        for p in ProviderKind::ALL {
            assert_eq!(p.as_str().parse::<ProviderKind>().unwrap(), p);
        }
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!("open-ai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn provider_kind_serializes_as_wire_name() {
        assert_eq!(serde_json::to_string(&ProviderKind::DeepSeek).unwrap(), "\"deepseek\"");
        assert_eq!(serde_json::to_string(&ProviderKind::OpenAi).unwrap(), "\"openai\"");
        let p: ProviderKind = serde_json::from_str("\"midjourney\"").unwrap();
        assert_eq!(p, ProviderKind::Midjourney);
    }

    #[test]
    fn turns_round_trip_with_lowercase_roles() {
        let turn: Turn = serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(turn, Turn::assistant("hi"));
        assert_eq!(last_prompt(&[Turn::user("a"), Turn::user("b")]), Some("b"));
        assert_eq!(last_prompt(&[]), None);
    }

    #[test]
    fn options_fall_back_to_defaults() {
        let opts = RequestOptions::default();
        assert_eq!(opts.max_tokens_or_default(), 1000);
        assert_eq!(opts.temperature_or_default(), 0.7);
        let opts = RequestOptions { max_tokens: Some(42), temperature: Some(0.0) };
        assert_eq!(opts.max_tokens_or_default(), 42);
        assert_eq!(opts.temperature_or_default(), 0.0);
    }

    #[test]
    fn result_variant_matches_modality() {
        assert!(InvocationResult::text("x").matches_modality(Modality::Text));
        assert!(InvocationResult::text("x").matches_modality(Modality::Multimodal));
        assert!(!InvocationResult::text("x").matches_modality(Modality::Image));
        assert!(InvocationResult::image("u").matches_modality(Modality::Image));
    }
}
