//! Config tests for [`llm_client::EnvLlmConfig`].
//!
//! These mutate process environment variables, so every test is `#[serial]`.

use llm_client::{EnvLlmConfig, LlmConfig, DEFAULT_SPARK_API_URL, DEFAULT_SPARK_LLM_DOMAIN};
use serial_test::serial;
use std::env;

const VARS: &[&str] = &[
    "SPARK_APP_ID",
    "SPARK_API_KEY",
    "SPARK_API_SECRET",
    "SPARK_API_URL",
    "SPARK_LLM_DOMAIN",
    "HTTP_PROXY",
    "http_proxy",
    "HTTPS_PROXY",
    "https_proxy",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

fn set_credentials() {
    env::set_var("SPARK_APP_ID", "app");
    env::set_var("SPARK_API_KEY", "key");
    env::set_var("SPARK_API_SECRET", "secret");
}

#[test]
#[serial]
fn test_load_config_with_defaults() {
    clear_env();
    set_credentials();

    let config = EnvLlmConfig::from_env().unwrap();

    assert_eq!(config.app_id(), "app");
    assert_eq!(config.base_url(), DEFAULT_SPARK_API_URL);
    assert_eq!(config.model(), DEFAULT_SPARK_LLM_DOMAIN);
    assert_eq!(config.bearer_token(), "key:secret");
    assert!(config.proxy().is_empty());
    clear_env();
}

#[test]
#[serial]
fn test_load_config_with_custom_values() {
    clear_env();
    set_credentials();
    env::set_var("SPARK_API_URL", "http://localhost:9000/v1");
    env::set_var("SPARK_LLM_DOMAIN", "generalv3.5");
    env::set_var("http_proxy", "127.0.0.1:7890");
    env::set_var("HTTPS_PROXY", "http://127.0.0.1:7891");

    let config = EnvLlmConfig::from_env().unwrap();

    assert_eq!(config.base_url(), "http://localhost:9000/v1");
    assert_eq!(config.model(), "generalv3.5");
    let proxy = config.proxy();
    assert_eq!(proxy.http.as_deref(), Some("127.0.0.1:7890"));
    assert_eq!(proxy.https.as_deref(), Some("http://127.0.0.1:7891"));
    clear_env();
}

/// **Test: Missing credential is an error naming the variable; blank counts as missing.**
#[test]
#[serial]
fn test_missing_credentials_is_error() {
    clear_env();
    env::set_var("SPARK_APP_ID", "app");
    env::set_var("SPARK_API_KEY", "   ");

    let err = EnvLlmConfig::from_env().unwrap_err();

    assert!(err.to_string().contains("SPARK_API_KEY"));
    clear_env();
}
