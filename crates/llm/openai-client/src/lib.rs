//! # OpenAI-compatible API client
//!
//! Thin wrapper around [async-openai] for non-streamed chat completion against any
//! OpenAI-compatible endpoint (custom base URL, optional HTTP/HTTPS proxy).
//! Provides token masking for safe logging and a simple request/response API.

use async_openai::{config::OpenAIConfig, types::CreateChatCompletionRequestArgs, Client};
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::sync::Arc;
use std::time::Duration;
use tracing;

pub use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len <= 11 {
        "***".to_string()
    } else {
        let head: String = chars[..7].iter().collect();
        let tail: String = chars[len - 4..].iter().collect();
        format!("{}***{}", head, tail)
    }
}

/// Proxy endpoints applied to the HTTP client. Values may be `host:port` or a full URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
}

impl ProxySettings {
    pub fn is_empty(&self) -> bool {
        self.http.is_none() && self.https.is_none()
    }

    /// Prefixes `http://` when the value carries no scheme (e.g. `127.0.0.1:7890`).
    pub fn normalize(value: &str) -> String {
        let value = value.trim();
        if value.contains("://") {
            value.to_string()
        } else {
            format!("http://{}", value)
        }
    }

    fn build_http_client(&self) -> anyhow::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(ref http) = self.http {
            builder = builder.proxy(reqwest::Proxy::http(Self::normalize(http))?);
        }
        if let Some(ref https) = self.https {
            builder = builder.proxy(reqwest::Proxy::https(Self::normalize(https))?);
        }
        Ok(builder.build()?)
    }
}

/// 聊天客户端：包装 async-openai client，保存 API key 仅用于脱敏日志。
///
/// Provider errors are returned on the first failure: the async-openai backoff is replaced by
/// one that never schedules a retry (see [`no_retry_backoff`]).
#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<OpenAIConfig>>,
    /// Stored only for masked logging.
    api_key: String,
}

/// Backoff policy whose first `next_backoff` already reports exhaustion, so rate-limit and
/// server errors reach the caller instead of being retried.
pub fn no_retry_backoff() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

impl OpenAIClient {
    /// Builds a client for an OpenAI-compatible endpoint at `base_url`.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::with_config(Self::config(&api_key, base_url))
            .with_backoff(no_retry_backoff());
        Self {
            client: Arc::new(client),
            api_key,
        }
    }

    /// Same as [`with_base_url`](Self::with_base_url), with HTTP traffic sent through `proxy`.
    pub fn with_proxy(
        api_key: String,
        base_url: String,
        proxy: &ProxySettings,
    ) -> anyhow::Result<Self> {
        if proxy.is_empty() {
            return Ok(Self::with_base_url(api_key, base_url));
        }
        tracing::info!(
            http_proxy = ?proxy.http,
            https_proxy = ?proxy.https,
            "Using proxy for chat completion requests"
        );
        let client = Client::with_config(Self::config(&api_key, base_url))
            .with_http_client(proxy.build_http_client()?)
            .with_backoff(no_retry_backoff());
        Ok(Self {
            client: Arc::new(client),
            api_key,
        })
    }

    fn config(api_key: &str, base_url: String) -> OpenAIConfig {
        OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url)
    }

    /// Sends a chat completion request and returns the first choice's content.
    ///
    /// Logs masked API key, request JSON, and token usage. An empty `choices` array or a
    /// choice without content is reported as a malformed response.
    pub async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> anyhow::Result<String> {
        let message_count = messages.len();
        let masked = mask_token(&self.api_key);

        tracing::info!(
            model = %model,
            message_count = message_count,
            api_key = %masked,
            "chat_completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .build()?;

        if let Ok(json) = serde_json::to_string_pretty(&request) {
            tracing::debug!(request_json = %json, "chat_completion request JSON");
        }

        let response = self.client.chat().create(request).await?;

        if let Some(ref u) = response.usage {
            tracing::info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "chat_completion usage"
            );
        }

        let Some(choice) = response.choices.first() else {
            anyhow::bail!("Malformed response: no choices returned");
        };
        match choice.message.content {
            Some(ref content) => Ok(content.clone()),
            None => anyhow::bail!("Malformed response: first choice has no content"),
        }
    }
}
