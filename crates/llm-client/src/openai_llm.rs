//! OpenAI 兼容的 LlmClient：包装 openai-client，消息按调用方给出的顺序原样发送。

use anyhow::Result;
use async_trait::async_trait;
use prompt::ChatMessage;
use tracing::{info, instrument};

use super::{chat_message_to_openai, LlmClient, LlmConfig};

/// LlmClient implementation backed by openai-client.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
}

impl OpenAILlmClient {
    /// Client for `base_url` using the default Spark domain as model.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
            model: crate::DEFAULT_SPARK_LLM_DOMAIN.to_string(),
        }
    }

    /// Builds a client from config: bearer credential, base URL, model and proxy.
    pub fn from_config(config: &dyn LlmConfig) -> Result<Self> {
        info!(
            app_id = %config.app_id(),
            base_url = %config.base_url(),
            model = %config.model(),
            "Building chat-completion client"
        );
        let client = openai_client::OpenAIClient::with_proxy(
            config.bearer_token(),
            config.base_url().to_string(),
            &config.proxy(),
        )?;
        Ok(Self {
            client,
            model: config.model().to_string(),
        })
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages), fields(model = %self.model, message_count = messages.len()))]
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<ChatMessage> {
        let openai_messages = messages
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>>>()?;
        let content = self
            .client
            .chat_completion(&self.model, openai_messages)
            .await?;
        Ok(ChatMessage::assistant(content))
    }
}
