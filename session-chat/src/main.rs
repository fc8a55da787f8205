//! session-chat: run conversation rounds against the configured provider, remembering the session.
//! Credentials, endpoint and proxy come from env (see `EnvLlmConfig`).

use std::sync::Arc;

use anyhow::{Context, Result};
use chat_history::InMemoryHistoryStore;
use clap::Parser;
use conversation::init_tracing;
use llm_client::{EnvLlmConfig, OpenAILlmClient};
use session_chat::{build_pipeline, run_rounds, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| std::env::var("LOG_FILE").ok())
        .unwrap_or_else(|| "logs/session-chat.log".to_string());
    init_tracing(Some(&log_file))?;

    let config = EnvLlmConfig::from_env().context("Failed to load LLM config from env")?;
    let llm = Arc::new(OpenAILlmClient::from_config(&config)?);
    let store = Arc::new(InMemoryHistoryStore::new());
    let pipeline = build_pipeline(llm, store)?;

    tracing::info!(session_id = %cli.session_id, rounds = cli.rounds().len(), "Starting session");

    run_rounds(&pipeline, &cli, |question, reply| {
        println!("> {}", question);
        println!("{}\n", reply.content());
    })
    .await?;
    Ok(())
}
