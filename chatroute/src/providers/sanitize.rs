//! Turn provider error bodies into short, secret-free messages.

use super::InvocationError;

const MAX_API_ERROR_CHARS: usize = 200;

/// Prefixes of credential-looking tokens. Longest first so `sk-ant-` wins over `sk-`.
const SECRET_PREFIXES: [&str; 3] = ["sk-ant-", "sk-", "AIza"];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

/// Replace credential-looking tokens with `[REDACTED]`.
pub fn scrub_secret_patterns(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    'outer: while !rest.is_empty() {
        for prefix in SECRET_PREFIXES {
            let Some(tail) = rest.strip_prefix(prefix) else {
                continue;
            };
            let token_len = tail
                .char_indices()
                .find(|&(_, c)| !is_secret_char(c))
                .map(|(i, _)| i)
                .unwrap_or(tail.len());
            // A bare prefix ("sk-" followed by nothing) is ordinary text.
            if token_len > 0 {
                out.push_str("[REDACTED]");
                rest = &tail[token_len..];
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}

/// Scrub secrets and cap the length of an error message.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input.trim());

    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed;
    }

    let mut end = MAX_API_ERROR_CHARS;
    while end > 0 && !scrubbed.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &scrubbed[..end])
}

/// Pull a human-readable message out of a provider error body.
///
/// All supported providers nest it at `error.message`; some gateways send
/// `{"error": "..."}` or a top-level `message`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let msg = value
        .pointer("/error/message")
        .and_then(|m| m.as_str())
        .or_else(|| value.get("error").and_then(|e| e.as_str()))
        .or_else(|| value.get("message").and_then(|m| m.as_str()))?;
    if msg.trim().is_empty() { None } else { Some(msg.to_string()) }
}

/// Build a classified error from a failed HTTP response body and status.
pub fn api_error_body(status: u16, body: &str) -> InvocationError {
    let message = match extract_error_message(body) {
        Some(msg) => sanitize_api_error(&msg),
        None => format!("request failed with status {}", status),
    };
    InvocationError::from_status(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ErrorKind;

    #[test]
    fn scrubs_openai_and_anthropic_keys() {
        let out = scrub_secret_patterns("Incorrect API key provided: sk-abc123XYZ. Try again");
        assert_eq!(out, "Incorrect API key provided: [REDACTED] Try again");
        let out = scrub_secret_patterns("key sk-ant-api03-zzz_1 is revoked");
        assert_eq!(out, "key [REDACTED] is revoked");
    }

    #[test]
    fn scrubs_google_keys() {
        let out = scrub_secret_patterns("API key AIzaSyD-1234 not valid");
        assert_eq!(out, "API key [REDACTED] not valid");
    }

    #[test]
    fn bare_prefix_is_left_alone() {
        assert_eq!(scrub_secret_patterns("must start with sk- "), "must start with sk- ");
    }

    #[test]
    fn truncates_long_messages() {
        let long = "x".repeat(500);
        let out = sanitize_api_error(&long);
        assert_eq!(out.len(), MAX_API_ERROR_CHARS + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn extracts_nested_provider_messages() {
        let openai = r#"{"error":{"message":"Invalid model","type":"invalid_request_error"}}"#;
        assert_eq!(extract_error_message(openai).as_deref(), Some("Invalid model"));
        let anthropic = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert_eq!(extract_error_message(anthropic).as_deref(), Some("Overloaded"));
        assert_eq!(extract_error_message(r#"{"error":"nope"}"#).as_deref(), Some("nope"));
        assert_eq!(extract_error_message("<html>bad gateway</html>"), None);
    }

    #[test]
    fn api_error_body_falls_back_to_status_message() {
        let err = api_error_body(502, "<html>bad gateway</html>");
        assert_eq!(err.kind(), ErrorKind::RemoteError);
        match err {
            InvocationError::RemoteError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "request failed with status 502");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn api_error_body_classifies_and_scrubs() {
        let err = api_error_body(401, r#"{"error":{"message":"Incorrect API key provided: sk-live123"}}"#);
        match err {
            InvocationError::Unauthorized { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided: [REDACTED]");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
