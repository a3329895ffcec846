pub mod config;
pub mod sniff;

use crate::types::ProviderKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

// ---------------------------------------------------------------------------
// Credential set
// ---------------------------------------------------------------------------

/// Caller-owned mapping of provider -> API credential. At most one per provider.
///
/// Serializes as a JSON object keyed by provider name (`{"openai": "sk-..."}`).
/// Deserializing drops blank values, same as [`CredentialSet::insert`].
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<ProviderKind, String>")]
pub struct CredentialSet(BTreeMap<ProviderKind, String>);

impl From<BTreeMap<ProviderKind, String>> for CredentialSet {
    fn from(entries: BTreeMap<ProviderKind, String>) -> Self {
        let mut set = Self::new();
        for (provider, key) in entries {
            set.insert(provider, key);
        }
        set
    }
}

impl CredentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, provider: ProviderKind, credential: impl Into<String>) -> Self {
        self.insert(provider, credential);
        self
    }

    /// Store a credential, replacing any previous one. Blank values remove the entry.
    pub fn insert(&mut self, provider: ProviderKind, credential: impl Into<String>) {
        let credential = credential.into();
        if credential.is_empty() {
            self.0.remove(&provider);
        } else {
            self.0.insert(provider, credential);
        }
    }

    pub fn remove(&mut self, provider: ProviderKind) -> Option<String> {
        self.0.remove(&provider)
    }

    pub fn get(&self, provider: ProviderKind) -> Option<&str> {
        self.0.get(&provider).map(String::as_str)
    }

    pub fn contains(&self, provider: ProviderKind) -> bool {
        self.0.contains_key(&provider)
    }

    pub fn providers(&self) -> impl Iterator<Item = ProviderKind> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Build from a loosely keyed map (e.g. a persisted store). Unknown
    /// provider names are skipped with a warning.
    pub fn from_named<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut set = Self::new();
        for (name, key) in entries {
            match name.parse::<ProviderKind>() {
                Ok(provider) => set.insert(provider, key),
                Err(_) => tracing::warn!(provider = name, "ignoring credential for unknown provider"),
            }
        }
        set
    }

    /// Provider name -> credential, as stored on disk.
    pub fn to_named(&self) -> HashMap<String, String> {
        self.0.iter().map(|(p, k)| (p.as_str().to_string(), k.clone())).collect()
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(p, k)| (p.as_str(), mask_credential(k))))
            .finish()
    }
}

/// Show just enough of a key to tell two apart.
pub fn mask_credential(key: &str) -> String {
    let count = key.chars().count();
    if count <= 8 {
        return "*".repeat(count);
    }
    let head: String = key.chars().take(4).collect();
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}...{}", head, tail)
}

// ---------------------------------------------------------------------------
// Syntactic validation
// ---------------------------------------------------------------------------

/// Minimum plausible length of a Google API key.
pub const GOOGLE_MIN_KEY_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{} API key is required", .provider.display_name())]
    Missing { provider: ProviderKind },

    #[error("{} API key should start with \"{prefix}\"", .provider.display_name())]
    WrongPrefix { provider: ProviderKind, prefix: &'static str },

    #[error("{} API key appears to be too short", .provider.display_name())]
    TooShort { provider: ProviderKind, min_len: usize },
}

impl ValidationError {
    pub fn provider(&self) -> ProviderKind {
        match self {
            ValidationError::Missing { provider }
            | ValidationError::WrongPrefix { provider, .. }
            | ValidationError::TooShort { provider, .. } => *provider,
        }
    }
}

/// Check a credential's shape for `provider`. Never touches the network.
pub fn validate_credential(credential: Option<&str>, provider: ProviderKind) -> Result<(), ValidationError> {
    let key = match credential {
        Some(k) if !k.is_empty() => k,
        _ => return Err(ValidationError::Missing { provider }),
    };

    let required_prefix = match provider {
        ProviderKind::OpenAi | ProviderKind::DeepSeek => Some("sk-"),
        ProviderKind::Anthropic => Some("sk-ant-"),
        _ => None,
    };
    if let Some(prefix) = required_prefix {
        if !key.starts_with(prefix) {
            return Err(ValidationError::WrongPrefix { provider, prefix });
        }
    }

    if provider == ProviderKind::Google && key.chars().count() < GOOGLE_MIN_KEY_LEN {
        return Err(ValidationError::TooShort { provider, min_len: GOOGLE_MIN_KEY_LEN });
    }

    Ok(())
}

/// What the router does with a credential that fails [`validate_credential`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialPolicy {
    /// Refuse the call with `InvalidCredentialFormat`.
    #[default]
    Enforce,
    /// Log a warning and send the request anyway.
    Warn,
}
