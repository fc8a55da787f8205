//! CLI parser and pipeline assembly.

use std::sync::Arc;

use anyhow::Result;
use chat_history::HistoryStore;
use clap::Parser;
use conversation::ConversationPipeline;
use llm_client::LlmClient;
use prompt::{ChatMessage, ParamSpec, PromptTemplate, TemplateParams};

/// System instruction; `{language}` is the only placeholder.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a very helpful assistant. Answer all questions as best you can in {language}.";

/// Name of the history slot and of the input messages key.
pub const HISTORY_SLOT: &str = "my_msg";

/// Rounds sent when no message is given on the command line.
pub const DEMO_ROUNDS: [&str; 2] = ["Hello! I am Alex", "What is my name?"];

#[derive(Parser, Debug)]
#[command(name = "session-chat")]
#[command(about = "Chat with a remembered session: each MESSAGE is one round", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Session whose history is used and extended.
    #[arg(short, long, default_value = "zs123")]
    pub session_id: String,

    /// Language the assistant is told to answer in.
    #[arg(short, long, default_value = "English")]
    pub language: String,

    /// Log file path (overrides LOG_FILE).
    #[arg(long)]
    pub log_file: Option<String>,

    /// User messages, one per round. Defaults to a two-round demo.
    pub messages: Vec<String>,
}

impl Cli {
    /// Rounds to run: the given messages, or the demo rounds when none were given.
    pub fn rounds(&self) -> Vec<String> {
        if self.messages.is_empty() {
            DEMO_ROUNDS.iter().map(|s| s.to_string()).collect()
        } else {
            self.messages.clone()
        }
    }

    pub fn template_params(&self) -> TemplateParams {
        TemplateParams::new().with("language", self.language.as_str())
    }
}

/// Builds the pipeline used by the binary around the given collaborator and store.
pub fn build_pipeline(
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn HistoryStore>,
) -> Result<ConversationPipeline> {
    let template = PromptTemplate::new(
        SYSTEM_INSTRUCTION,
        HISTORY_SLOT,
        [ParamSpec::text("language")],
    )?;
    Ok(ConversationPipeline::new(template, HISTORY_SLOT, llm, store)?)
}

/// Runs every round on the CLI's session, calling `on_reply` after each one, and returns the
/// replies in order. Stops at the first failed round.
pub async fn run_rounds<F>(
    pipeline: &ConversationPipeline,
    cli: &Cli,
    mut on_reply: F,
) -> Result<Vec<ChatMessage>>
where
    F: FnMut(&str, &ChatMessage),
{
    let params = cli.template_params();
    let mut replies = Vec::new();
    for text in cli.rounds() {
        let reply = pipeline
            .invoke(&cli.session_id, vec![ChatMessage::user(text.as_str())], &params)
            .await?;
        on_reply(&text, &reply);
        replies.push(reply);
    }
    Ok(replies)
}
