use super::CredentialSet;
use crate::types::ProviderKind;

// ---------------------------------------------------------------------------
// Environment variable sniffing
// ---------------------------------------------------------------------------

/// Environment variables consulted per provider, in priority order.
pub fn provider_env_candidates(provider: ProviderKind) -> &'static [&'static str] {
    match provider {
        ProviderKind::OpenAi => &["OPENAI_API_KEY"],
        ProviderKind::Anthropic => &["ANTHROPIC_API_KEY"],
        ProviderKind::Google => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
        ProviderKind::DeepSeek => &["DEEPSEEK_API_KEY"],
        ProviderKind::Ideogram => &["IDEOGRAM_API_KEY"],
        ProviderKind::Midjourney => &["MIDJOURNEY_API_KEY"],
    }
}

/// Resolve a credential with an injectable lookup. Resolution order:
/// 1. Explicit override (trimmed, ignored if empty)
/// 2. Provider-specific environment variable(s)
pub fn resolve_credential_with(
    provider: ProviderKind,
    override_key: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    if let Some(raw) = override_key {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_owned());
        }
    }

    provider_env_candidates(provider).iter().find_map(|var| {
        lookup(var)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    })
}

/// Fill providers missing from `set` with credentials found in the environment.
/// Existing entries always win.
pub fn fill_from_env(set: &mut CredentialSet) {
    fill_with(set, |var| std::env::var(var).ok());
}

fn fill_with(set: &mut CredentialSet, lookup: impl Fn(&str) -> Option<String>) {
    for provider in ProviderKind::ALL {
        if set.contains(provider) {
            continue;
        }
        if let Some(key) = resolve_credential_with(provider, None, &lookup) {
            tracing::debug!(%provider, "using credential from environment");
            set.insert(provider, key);
        }
    }
}
