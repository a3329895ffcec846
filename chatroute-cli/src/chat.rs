use crate::{render, Session};
use anyhow::Context;
use bytes::Bytes;
use chatroute::{all_models, models_for_provider, Document, Modality, ModelDescriptor, ProviderKind, RequestOptions, Turn};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

fn modality_label(modality: Modality) -> &'static str {
    match modality {
        Modality::Text => "text",
        Modality::Image => "image",
        Modality::Multimodal => "multimodal",
    }
}

pub fn list_models(provider: Option<&str>, json: bool) -> anyhow::Result<()> {
    let models: Vec<&ModelDescriptor> = match provider {
        Some(name) => models_for_provider(name.parse::<ProviderKind>()?).collect(),
        None => all_models().iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }

    for m in models {
        println!(
            "{:<28} {:<11} {:<11} {}",
            m.id,
            m.provider.display_name(),
            modality_label(m.modality),
            m.description
        );
    }
    Ok(())
}

pub async fn one_shot(session: &Session, model: &str, prompt: &str, options: &RequestOptions) -> anyhow::Result<()> {
    let result = session
        .router
        .route(&[Turn::user(prompt)], &session.credentials, model, options)
        .await?;
    println!("{}", render(&result));
    Ok(())
}

/// Line-by-line chat that keeps the conversation history.
pub async fn interactive(session: &Session, model: &str, options: &RequestOptions) -> anyhow::Result<()> {
    println!("Chatting with {model}. Empty line or Ctrl-D to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut history: Vec<Turn> = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        history.push(Turn::user(line));
        match session.router.route(&history, &session.credentials, model, options).await {
            Ok(result) => {
                let reply = render(&result).to_string();
                println!("{reply}\n");
                history.push(Turn::assistant(reply));
            }
            Err(e) => {
                // Drop the unanswered turn.
                history.pop();
                eprintln!("Error: {e}\n");
            }
        }
    }
    Ok(())
}

pub async fn analyze(session: &Session, model: &str, files: &[PathBuf], options: &RequestOptions) -> anyhow::Result<()> {
    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        documents.push(Document::new(display_name(path), content));
    }

    let results = session
        .router
        .analyze_documents(&documents, &session.credentials, model, options)
        .await;

    for (doc, result) in documents.iter().zip(results) {
        println!("== {} ==", doc.file_name);
        match result {
            Ok(r) => println!("{}\n", render(&r)),
            Err(e) => println!("Error: {e}\n"),
        }
    }
    Ok(())
}

pub async fn transcribe(session: &Session, file: &Path) -> anyhow::Result<()> {
    let audio = tokio::fs::read(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let text = session
        .router
        .transcribe(Bytes::from(audio), &display_name(file), &session.credentials)
        .await?;
    println!("{text}");
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
