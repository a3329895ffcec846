mod chat;
mod doctor;
mod keys;

use chatroute::{AiRouter, AppConfig, ConfigManager, CredentialSet, InvocationResult, RequestOptions};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chatroute", version, about = "Send prompts to hosted AI models with your own API keys")]
struct Cli {
    /// Config file (default: ~/.chatroute/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the models the router knows about
    Models {
        /// Only show one provider's models
        #[arg(short, long)]
        provider: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the shape of an API key without calling the provider
    Validate { provider: String, key: String },

    /// Manage stored API keys
    Keys {
        #[command(subcommand)]
        action: keys::KeysAction,
    },

    /// Chat with a model. Without a prompt, starts an interactive session.
    Chat {
        #[arg(short, long, default_value = "gpt-4o")]
        model: String,

        #[command(flatten)]
        tuning: Tuning,

        prompt: Vec<String>,
    },

    /// Generate an image
    Image {
        #[arg(short, long, default_value = "dall-e-3")]
        model: String,

        #[arg(required = true)]
        prompt: Vec<String>,
    },

    /// Ask a model to analyze one or more text files
    Analyze {
        #[arg(short, long, default_value = "gpt-4o")]
        model: String,

        #[command(flatten)]
        tuning: Tuning,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Transcribe an audio file (OpenAI whisper-1)
    Transcribe { file: PathBuf },

    /// Check every configured credential against its provider
    Doctor,
}

#[derive(clap::Args)]
struct Tuning {
    #[arg(long)]
    max_tokens: Option<u32>,

    #[arg(long)]
    temperature: Option<f64>,
}

/// Everything a command needs to talk to providers.
pub(crate) struct Session {
    pub config: AppConfig,
    pub router: AiRouter,
    pub credentials: CredentialSet,
}

impl Session {
    fn open(manager: &ConfigManager) -> anyhow::Result<Self> {
        let config = manager.load()?;
        let credentials = config.resolve_credentials();

        let router = AiRouter::builder()
            .with_endpoints(config.endpoints.clone())
            .with_credential_policy(config.credential_policy)
            .build();

        Ok(Self { config, router, credentials })
    }

    /// Command-line values win over the configured defaults.
    fn options(&self, tuning: Option<&Tuning>) -> RequestOptions {
        let defaults = self.config.defaults;
        RequestOptions {
            max_tokens: tuning.and_then(|t| t.max_tokens).or(defaults.max_tokens),
            temperature: tuning.and_then(|t| t.temperature).or(defaults.temperature),
        }
    }
}

pub(crate) fn render(result: &InvocationResult) -> &str {
    match result {
        InvocationResult::Text { content } => content,
        InvocationResult::Image { url } => url,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatroute=info,chatroute_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let manager = match cli.config {
        Some(path) => ConfigManager::new(path),
        None => ConfigManager::default_path(),
    };

    match cli.command {
        Commands::Models { provider, json } => {
            chat::list_models(provider.as_deref(), json)?;
        }
        Commands::Validate { provider, key } => {
            keys::validate(&provider, &key)?;
        }
        Commands::Keys { action } => {
            keys::run(&manager, action)?;
        }
        Commands::Chat { model, tuning, prompt } => {
            let session = Session::open(&manager)?;
            let options = session.options(Some(&tuning));
            if prompt.is_empty() {
                chat::interactive(&session, &model, &options).await?;
            } else {
                chat::one_shot(&session, &model, &prompt.join(" "), &options).await?;
            }
        }
        Commands::Image { model, prompt } => {
            let session = Session::open(&manager)?;
            let options = session.options(None);
            chat::one_shot(&session, &model, &prompt.join(" "), &options).await?;
        }
        Commands::Analyze { model, tuning, files } => {
            let session = Session::open(&manager)?;
            let options = session.options(Some(&tuning));
            chat::analyze(&session, &model, &files, &options).await?;
        }
        Commands::Transcribe { file } => {
            let session = Session::open(&manager)?;
            chat::transcribe(&session, &file).await?;
        }
        Commands::Doctor => {
            let session = Session::open(&manager)?;
            doctor::run_doctor(&session).await?;
        }
    }

    Ok(())
}
