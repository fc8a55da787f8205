//! LLM configuration: trait and env-based implementation (Spark credentials, endpoint, proxy).

use anyhow::{Context, Result};
use openai_client::ProxySettings;
use std::env;

/// OpenAI-compatible HTTP endpoint of the Spark provider.
pub const DEFAULT_SPARK_API_URL: &str = "https://spark-api-open.xf-yun.com/v1";

/// Model alias ("domain") used when SPARK_LLM_DOMAIN is not set.
pub const DEFAULT_SPARK_LLM_DOMAIN: &str = "lite";

/// LLM configuration interface.
pub trait LlmConfig: Send + Sync {
    fn app_id(&self) -> &str;
    fn api_key(&self) -> &str;
    fn api_secret(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn proxy(&self) -> ProxySettings;

    /// Credential sent as the bearer token: `{api_key}:{api_secret}`.
    fn bearer_token(&self) -> String {
        format!("{}:{}", self.api_key(), self.api_secret())
    }
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub spark_app_id: String,
    pub spark_api_key: String,
    pub spark_api_secret: String,
    pub spark_api_url: String,
    pub spark_llm_domain: String,
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
}

impl LlmConfig for EnvLlmConfig {
    fn app_id(&self) -> &str {
        &self.spark_app_id
    }
    fn api_key(&self) -> &str {
        &self.spark_api_key
    }
    fn api_secret(&self) -> &str {
        &self.spark_api_secret
    }
    fn base_url(&self) -> &str {
        &self.spark_api_url
    }
    fn model(&self) -> &str {
        &self.spark_llm_domain
    }
    fn proxy(&self) -> ProxySettings {
        ProxySettings {
            http: self.http_proxy.clone(),
            https: self.https_proxy.clone(),
        }
    }
}

impl EnvLlmConfig {
    /// Load from environment variables. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        let spark_app_id = required("SPARK_APP_ID")?;
        let spark_api_key = required("SPARK_API_KEY")?;
        let spark_api_secret = required("SPARK_API_SECRET")?;
        let spark_api_url =
            optional("SPARK_API_URL").unwrap_or_else(|| DEFAULT_SPARK_API_URL.to_string());
        let spark_llm_domain =
            optional("SPARK_LLM_DOMAIN").unwrap_or_else(|| DEFAULT_SPARK_LLM_DOMAIN.to_string());
        let http_proxy = optional("HTTP_PROXY").or_else(|| optional("http_proxy"));
        let https_proxy = optional("HTTPS_PROXY").or_else(|| optional("https_proxy"));
        Ok(Self {
            spark_app_id,
            spark_api_key,
            spark_api_secret,
            spark_api_url,
            spark_llm_domain,
            http_proxy,
            https_proxy,
        })
    }
}

fn required(name: &str) -> Result<String> {
    optional(name).with_context(|| format!("{} not set", name))
}

/// Reads a variable, treating blank values as unset.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}
