#![allow(dead_code)]

use chatroute::{AiRouter, CredentialPolicy, CredentialSet, Endpoints, ProviderKind};
use serde_json::json;
use wiremock::MockServer;

pub const OPENAI_KEY: &str = "sk-test-openai";
pub const ANTHROPIC_KEY: &str = "sk-ant-test-anthropic";
pub const GOOGLE_KEY: &str = "AIzaSyTESTKEY0123456789abcdefghijkl";
pub const DEEPSEEK_KEY: &str = "sk-test-deepseek";
pub const IDEOGRAM_KEY: &str = "ideogram-test";
pub const MIDJOURNEY_KEY: &str = "midjourney-test";

/// Router whose every adapter points at `server`.
pub fn router_for(server: &MockServer) -> AiRouter {
    AiRouter::builder()
        .with_endpoints(Endpoints::all(&server.uri()))
        .build()
}

pub fn router_with_policy(server: &MockServer, policy: CredentialPolicy) -> AiRouter {
    AiRouter::builder()
        .with_endpoints(Endpoints::all(&server.uri()))
        .with_credential_policy(policy)
        .build()
}

/// A well-formed credential for every provider.
pub fn all_credentials() -> CredentialSet {
    CredentialSet::new()
        .with(ProviderKind::OpenAi, OPENAI_KEY)
        .with(ProviderKind::Anthropic, ANTHROPIC_KEY)
        .with(ProviderKind::Google, GOOGLE_KEY)
        .with(ProviderKind::DeepSeek, DEEPSEEK_KEY)
        .with(ProviderKind::Ideogram, IDEOGRAM_KEY)
        .with(ProviderKind::Midjourney, MIDJOURNEY_KEY)
}

pub fn chat_completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test123",
        "object": "chat.completion",
        "created": 1714560000,
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    })
}

pub fn anthropic_message(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn"
    })
}

pub fn gemini_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

pub fn image_response(url: &str) -> serde_json::Value {
    json!({ "created": 1714560000, "data": [{ "url": url }] })
}

pub fn error_body(message: &str) -> serde_json::Value {
    json!({ "error": { "message": message, "type": "invalid_request_error" } })
}
