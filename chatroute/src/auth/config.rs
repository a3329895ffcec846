use super::{sniff, CredentialPolicy, CredentialSet};
use crate::providers::Endpoints;
use crate::types::{ProviderKind, RequestOptions};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The config file structure. A flat key-value store plus a few knobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// provider name -> API key. Kept loosely typed on disk so a hand-edited
    /// typo does not make the whole file unreadable.
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,

    /// Base URL overrides; missing fields keep the public defaults.
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Generation defaults applied when the caller sets nothing.
    #[serde(default)]
    pub defaults: RequestOptions,

    #[serde(default)]
    pub credential_policy: CredentialPolicy,
}

impl AppConfig {
    /// Stored credentials as a typed set (unknown names dropped).
    pub fn credential_set(&self) -> CredentialSet {
        CredentialSet::from_named(self.credentials.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Stored credentials, topped up from the environment. Stored entries win.
    pub fn resolve_credentials(&self) -> CredentialSet {
        let mut set = self.credential_set();
        sniff::fill_from_env(&mut set);
        set
    }
}

/// Manages reading/writing the config file with safe atomic writes + file lock.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Create a config manager with a custom path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a config manager with the default path (~/.chatroute/config.json).
    pub fn default_path() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(home.join(".chatroute").join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        // Sibling lock file, so the atomic rename never replaces a locked inode.
        self.path.with_extension("json.lock")
    }

    fn ensure_parent(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let _ = fs::set_permissions(parent, fs::Permissions::from_mode(0o700));
            }
        }
        Ok(())
    }

    fn with_exclusive_lock<T>(&self, f: impl FnOnce() -> anyhow::Result<T>) -> anyhow::Result<T> {
        self.ensure_parent()?;

        let lock_file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(self.lock_path())?;

        lock_file.lock_exclusive()?;
        let out = f();
        let _ = lock_file.unlock();
        out
    }

    /// Load the config from disk. A missing file yields the defaults.
    pub fn load(&self) -> anyhow::Result<AppConfig> {
        self.with_exclusive_lock(|| self.load_unlocked())
    }

    /// Save the config to disk atomically (write to temp file, then rename).
    pub fn save(&self, config: &AppConfig) -> anyhow::Result<()> {
        self.with_exclusive_lock(|| self.save_unlocked(config))
    }

    fn load_unlocked(&self) -> anyhow::Result<AppConfig> {
        if !self.path.exists() {
            return Ok(AppConfig::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save_unlocked(&self, config: &AppConfig) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600));
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut AppConfig)) -> anyhow::Result<()> {
        self.with_exclusive_lock(|| {
            let mut cfg = self.load_unlocked()?;
            f(&mut cfg);
            self.save_unlocked(&cfg)
        })
    }

    /// Store (or replace) the credential for a provider.
    pub fn set_credential(&self, provider: ProviderKind, key: &str) -> anyhow::Result<()> {
        let key = key.trim().to_string();
        anyhow::ensure!(!key.is_empty(), "{} API key is required", provider.display_name());
        self.update(|cfg| {
            cfg.credentials.insert(provider.as_str().to_string(), key);
        })
    }

    pub fn remove_credential(&self, provider: ProviderKind) -> anyhow::Result<bool> {
        let mut removed = false;
        self.update(|cfg| {
            removed = cfg.credentials.remove(provider.as_str()).is_some();
        })?;
        Ok(removed)
    }

    pub fn get_credential(&self, provider: ProviderKind) -> anyhow::Result<Option<String>> {
        Ok(self.load()?.credentials.get(provider.as_str()).cloned())
    }

    /// Providers with a stored credential, in name order.
    pub fn list_providers_with_credentials(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.load()?.credentials.into_keys().collect())
    }
}
