use boog_core::{ChatModel, Error, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_ms: u64,
}

impl OpenAiCompatClient {
    pub fn new(client: reqwest::Client, cfg: &LlmConfig) -> Self {
        Self {
            client,
            base_url: cfg.base_url.clone(),
            api_key: cfg
                .api_key
                .as_ref()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            model: cfg.model.clone(),
            timeout_ms: cfg.timeout_ms,
        }
    }

    fn endpoint_chat_completions(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl ChatModel for OpenAiCompatClient {
    async fn chat(&self, system: &str, user: &str, temperature: f64) -> Result<String> {
        let Some(api_key) = &self.api_key else {
            return Err(Error::NotConfigured("missing LLM API key".to_string()));
        };

        let req = ChatCompletionsRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: Some(temperature),
            stream: Some(false),
        };

        let resp = self
            .client
            .post(self.endpoint_chat_completions())
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {api_key}"))
            .json(&req)
            .send()
            .await
            .map_err(|e| Error::Llm(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Llm(format!("chat.completions HTTP {status}")));
        }

        let parsed: ChatCompletionsResponse =
            resp.json().await.map_err(|e| Error::Llm(e.to_string()))?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionsRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    // Some providers send `null` content for refusals or tool calls.
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmProvider;

    fn cfg(base_url: &str, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider: LlmProvider::OpenAi,
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
            model: "test-model".to_string(),
            timeout_ms: 5_000,
        }
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let c = OpenAiCompatClient::new(reqwest::Client::new(), &cfg("http://x/", Some("k")));
        assert_eq!(c.endpoint_chat_completions(), "http://x/v1/chat/completions");
    }

    #[tokio::test]
    async fn blank_key_counts_as_missing() {
        // Unroutable base URL: reaching the network would be a transport error, not NotConfigured.
        let c = OpenAiCompatClient::new(reqwest::Client::new(), &cfg("http://0.0.0.0:1", Some("  ")));
        let err = c.chat("s", "u", 0.6).await.unwrap_err();
        assert!(matches!(err, Error::NotConfigured(_)));
    }

    #[test]
    fn parses_null_content() {
        let js = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: ChatCompletionsResponse = serde_json::from_str(js).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn sends_two_messages_with_temperature() {
        use axum::{routing::post, Json, Router};

        let app = Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<serde_json::Value>| async move {
                let roles: Vec<String> = body["messages"]
                    .as_array()
                    .map(|a| {
                        a.iter()
                            .filter_map(|m| m["role"].as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default();
                let answer = format!(
                    "{} {} {}",
                    body["model"].as_str().unwrap_or(""),
                    roles.join(","),
                    body["temperature"]
                );
                Json(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": answer}}]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let c = OpenAiCompatClient::new(
            reqwest::Client::new(),
            &cfg(&format!("http://{addr}"), Some("k")),
        );
        let out = c.chat("sys", "hi", 0.2).await.unwrap();
        assert_eq!(out, "test-model system,user 0.2");
    }
}
