//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait (the chat-completion collaborator: messages in, one
//! assistant message out) and an OpenAI-compatible implementation. Transport-agnostic;
//! used by the `conversation` pipeline.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};
use prompt::{ChatMessage, MessageRole};

mod config;
mod openai_llm;

pub use config::{EnvLlmConfig, LlmConfig, DEFAULT_SPARK_API_URL, DEFAULT_SPARK_LLM_DOMAIN};
pub use openai_llm::OpenAILlmClient;

/// Chat-completion interface: given an ordered message sequence, return the next assistant message.
///
/// Errors (authentication, network, malformed response) are returned as-is; implementations
/// do not retry.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<ChatMessage>;
}

/// Converts a single [`ChatMessage`] into OpenAI API message format.
fn chat_message_to_openai(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let content = msg.content().to_string();
    let openai_msg: ChatCompletionRequestMessage = match msg.role() {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(openai_msg)
}
