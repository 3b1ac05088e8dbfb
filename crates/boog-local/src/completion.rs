//! Turns every model outcome into displayable text.

use boog_core::{ChatModel, Error};
use std::sync::Arc;

pub const LLM_UNAVAILABLE: &str =
    "The AI API key is not set on the server – AI mode is temporarily unavailable.";
pub const LLM_FAILED: &str = "Sorry, I couldn't reach my AI brain just now. Please try again later.";
pub const NO_RESPONSE: &str = "(No response from AI)";

/// Temperature for answers grounded in search results.
pub const GROUNDED_TEMPERATURE: f64 = 0.2;
/// Temperature for open-ended chat.
pub const CHAT_TEMPERATURE: f64 = 0.6;

#[derive(Clone)]
pub struct Completer {
    model: Arc<dyn ChatModel>,
}

impl Completer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn complete(&self, system: &str, user: &str, temperature: f64) -> String {
        match self.model.chat(system, user, temperature).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    NO_RESPONSE.to_string()
                } else {
                    text.to_string()
                }
            }
            Err(Error::NotConfigured(why)) => {
                tracing::debug!(%why, "llm not configured");
                LLM_UNAVAILABLE.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "llm completion failed");
                LLM_FAILED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LlmConfig, LlmProvider};
    use crate::openai_compat::OpenAiCompatClient;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use boog_core::Result;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(fn() -> Result<String>);

    #[async_trait::async_trait]
    impl ChatModel for Fixed {
        async fn chat(&self, _system: &str, _user: &str, _temperature: f64) -> Result<String> {
            (self.0)()
        }
    }

    fn completer(f: fn() -> Result<String>) -> Completer {
        Completer::new(Arc::new(Fixed(f)))
    }

    #[tokio::test]
    async fn answer_is_trimmed() {
        let c = completer(|| Ok("  meow  \n".to_string()));
        assert_eq!(c.complete("s", "u", CHAT_TEMPERATURE).await, "meow");
    }

    #[tokio::test]
    async fn blank_answer_becomes_placeholder() {
        let c = completer(|| Ok(" \n ".to_string()));
        assert_eq!(c.complete("s", "u", CHAT_TEMPERATURE).await, NO_RESPONSE);
    }

    #[tokio::test]
    async fn provider_error_becomes_fixed_string() {
        let c = completer(|| Err(Error::Llm("HTTP 500".to_string())));
        assert_eq!(c.complete("s", "u", CHAT_TEMPERATURE).await, LLM_FAILED);
    }

    async fn counting_server(status: StatusCode) -> (SocketAddr, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new().route(
            "/v1/chat/completions",
            post({
                let calls = calls.clone();
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    (
                        status,
                        Json(serde_json::json!({
                            "choices": [{"message": {"role": "assistant", "content": "purr"}}]
                        })),
                    )
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, calls)
    }

    fn http_completer(addr: SocketAddr, api_key: Option<&str>) -> Completer {
        let cfg = LlmConfig {
            provider: LlmProvider::OpenAi,
            base_url: format!("http://{addr}"),
            api_key: api_key.map(str::to_string),
            model: "m".to_string(),
            timeout_ms: 5_000,
        };
        Completer::new(Arc::new(OpenAiCompatClient::new(reqwest::Client::new(), &cfg)))
    }

    #[tokio::test]
    async fn missing_key_returns_unavailable_without_network_call() {
        let (addr, calls) = counting_server(StatusCode::OK).await;
        let c = http_completer(addr, None);
        assert_eq!(c.complete("s", "u", GROUNDED_TEMPERATURE).await, LLM_UNAVAILABLE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn http_error_is_caught() {
        let (addr, calls) = counting_server(StatusCode::BAD_GATEWAY).await;
        let c = http_completer(addr, Some("k"));
        assert_eq!(c.complete("s", "u", CHAT_TEMPERATURE).await, LLM_FAILED);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn configured_key_reaches_provider() {
        let (addr, calls) = counting_server(StatusCode::OK).await;
        let c = http_completer(addr, Some("k"));
        assert_eq!(c.complete("s", "u", CHAT_TEMPERATURE).await, "purr");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
