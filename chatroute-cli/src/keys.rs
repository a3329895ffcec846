use chatroute::auth::sniff::provider_env_candidates;
use chatroute::{mask_credential, validate_credential, ConfigManager, ProviderKind};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum KeysAction {
    /// Store an API key (replaces any existing one)
    Set { provider: String, key: String },

    /// Forget a stored API key
    Remove { provider: String },

    /// Show which providers have a key, masked
    List,
}

pub fn run(manager: &ConfigManager, action: KeysAction) -> anyhow::Result<()> {
    match action {
        KeysAction::Set { provider, key } => {
            let provider: ProviderKind = provider.parse()?;
            if let Err(e) = validate_credential(Some(key.trim()), provider) {
                tracing::warn!("{}", e);
            }
            manager.set_credential(provider, &key)?;
            println!("Saved {} key to {}", provider.display_name(), manager.path().display());
        }
        KeysAction::Remove { provider } => {
            let provider: ProviderKind = provider.parse()?;
            if manager.remove_credential(provider)? {
                println!("Removed {} key", provider.display_name());
            } else {
                println!("No {} key stored", provider.display_name());
            }
        }
        KeysAction::List => {
            let stored = manager.load()?.credential_set();
            for provider in ProviderKind::ALL {
                let source = match stored.get(provider) {
                    Some(key) => mask_credential(key),
                    None => match provider_env_candidates(provider)
                        .iter()
                        .find(|var| std::env::var(var).is_ok_and(|v| !v.trim().is_empty()))
                    {
                        Some(var) => format!("(from ${var})"),
                        None => "-".to_string(),
                    },
                };
                println!("{:<11} {}", provider.display_name(), source);
            }
        }
    }
    Ok(())
}

pub fn validate(provider: &str, key: &str) -> anyhow::Result<()> {
    let provider: ProviderKind = provider.parse()?;
    validate_credential(Some(key), provider)?;
    println!("{} key looks valid", provider.display_name());
    Ok(())
}
