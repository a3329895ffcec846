use crate::Session;
use chatroute::{validate_credential, ErrorKind, ProviderKind};
use futures::future::join_all;

/// Probe every provider we hold a credential for.
pub async fn run_doctor(session: &Session) -> anyhow::Result<()> {
    if session.credentials.is_empty() {
        println!("No API keys configured. Run `chatroute keys set <provider> <key>` first.");
        return Ok(());
    }

    let providers: Vec<ProviderKind> = session.credentials.providers().collect();
    let reports = join_all(providers.iter().map(|&p| check_provider(session, p))).await;

    for (provider, report) in providers.iter().zip(reports) {
        println!("\n📋 {}", provider.display_name());
        for line in report {
            println!("  {line}");
        }
    }

    println!("\nDoctor check complete.");
    Ok(())
}

async fn check_provider(session: &Session, provider: ProviderKind) -> Vec<String> {
    let mut report = Vec::new();

    match validate_credential(session.credentials.get(provider), provider) {
        Ok(()) => report.push("Format:     ✅ ok".to_string()),
        Err(e) => report.push(format!("Format:     ❌ {e}")),
    }

    match session.router.list_remote_models(provider, &session.credentials).await {
        Ok(ids) => report.push(format!("Models:     ✅ {} visible", ids.len())),
        Err(e) if e.kind() == ErrorKind::NotImplemented => {
            report.push("Models:     ℹ️  no listing endpoint".to_string())
        }
        Err(e) if e.kind() == ErrorKind::InvalidCredentialFormat => {
            report.push("Models:     ⚠️  skipped".to_string())
        }
        Err(e) => report.push(format!("Models:     ❌ {e}")),
    }

    report
}
