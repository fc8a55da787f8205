//! Tests for [`llm_client::OpenAILlmClient`] over a mock OpenAI-compatible endpoint.

use llm_client::{EnvLlmConfig, LlmClient, OpenAILlmClient};
use mockito::Matcher;
use prompt::{ChatMessage, MessageRole};
use serde_json::json;

const REPLY_BODY: &str = r#"{"id":"chatcmpl-1","object":"chat.completion","created":1700000000,"model":"lite","choices":[{"index":0,"message":{"role":"assistant","content":"Your name is Alex."},"finish_reason":"stop"}]}"#;

fn config_for(url: String) -> EnvLlmConfig {
    EnvLlmConfig {
        spark_app_id: "app".to_string(),
        spark_api_key: "key".to_string(),
        spark_api_secret: "secret".to_string(),
        spark_api_url: url,
        spark_llm_domain: "lite".to_string(),
        http_proxy: None,
        https_proxy: None,
    }
}

/// **Test: Roles and order are sent as-is, model comes from config, reply is an assistant message.**
#[tokio::test]
async fn chat_completion_sends_messages_in_order() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer key:secret")
        .match_body(Matcher::PartialJson(json!({
            "model": "lite",
            "messages": [
                {"role": "system", "content": "Answer in English."},
                {"role": "user", "content": "hello, I am Alex"},
                {"role": "assistant", "content": "Hi Alex!"},
                {"role": "user", "content": "what is my name?"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPLY_BODY)
        .create_async()
        .await;

    let client = OpenAILlmClient::from_config(&config_for(server.url())).unwrap();
    let reply = client
        .chat_completion(&[
            ChatMessage::system("Answer in English."),
            ChatMessage::user("hello, I am Alex"),
            ChatMessage::assistant("Hi Alex!"),
            ChatMessage::user("what is my name?"),
        ])
        .await
        .unwrap();

    assert_eq!(reply.role(), MessageRole::Assistant);
    assert_eq!(reply.content(), "Your name is Alex.");
    mock.assert_async().await;
}

/// **Test: With http_proxy set, requests for an unreachable host are routed through the proxy.**
#[tokio::test]
async fn chat_completion_goes_through_http_proxy() {
    let mut proxy = mockito::Server::new_async().await;
    let mock = proxy
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer key:secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPLY_BODY)
        .create_async()
        .await;

    let mut config = config_for("http://spark.invalid/v1".to_string());
    config.http_proxy = Some(proxy.host_with_port());
    let client = OpenAILlmClient::from_config(&config).unwrap();

    let reply = client
        .chat_completion(&[ChatMessage::user("hi")])
        .await
        .unwrap();

    assert_eq!(reply.content(), "Your name is Alex.");
    mock.assert_async().await;
}

/// **Test: Messages are forwarded unchanged; no extra system message is added.**
#[tokio::test]
async fn chat_completion_adds_no_system_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "messages": [
                {"role": "user", "content": "hi"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPLY_BODY)
        .create_async()
        .await;

    let client = OpenAILlmClient::with_base_url("key:secret".to_string(), server.url());
    client
        .chat_completion(&[ChatMessage::user("hi")])
        .await
        .unwrap();

    mock.assert_async().await;
}
