//! Routes a chat request to canned quotes, plain model chat, or search-grounded chat.

use boog_core::{ChatModel, ChatRequest, ChatResponse};
use std::sync::Arc;

use crate::chain::SearchChain;
use crate::completion::{Completer, CHAT_TEMPERATURE, GROUNDED_TEMPERATURE};
use crate::config::{Config, DefaultMode};
use crate::openai_compat::OpenAiCompatClient;
use crate::{prompt, quotes};

pub const EMPTY_MESSAGE: &str = "Please provide a message.";
pub const MESSAGE_TOO_LONG: &str = "That message is too long. Keep it under 4000 characters.";
pub const NO_RESULTS: &str =
    "I searched the web but found nothing useful for that. Try rephrasing?";
pub const CHAT_SYSTEM_PROMPT: &str =
    "You are Boog, a sassy but helpful cat. Keep answers short, witty and accurate.";

/// Longest trimmed message, in chars, that is routed anywhere.
pub const MAX_MESSAGE_CHARS: usize = 4_000;

/// Number of search results requested for a grounded answer.
pub const WEB_MAX_RESULTS: usize = 8;

const WEB_MODES: &[&str] = &["web", "web-search", "search"];
const CHAT_MODES: &[&str] = &["ai", "chat"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Quote(String),
    Web,
    Chat,
}

pub struct Orchestrator {
    chain: SearchChain,
    completer: Completer,
    default_mode: DefaultMode,
}

impl Orchestrator {
    pub fn new(chain: SearchChain, completer: Completer, default_mode: DefaultMode) -> Self {
        Self {
            chain,
            completer,
            default_mode,
        }
    }

    pub fn from_config(client: &reqwest::Client, cfg: &Config) -> Self {
        let chain = SearchChain::from_config(client, &cfg.search);
        let model: Arc<dyn ChatModel> = Arc::new(OpenAiCompatClient::new(client.clone(), &cfg.llm));
        Self::new(chain, Completer::new(model), cfg.default_mode)
    }

    /// Mode matching ignores case and surrounding whitespace.
    pub fn route(&self, mode: Option<&str>) -> Route {
        let mode = mode.map(|m| m.trim().to_ascii_lowercase()).unwrap_or_default();
        if quotes::is_quote_mode(&mode) {
            return Route::Quote(mode);
        }
        if WEB_MODES.contains(&mode.as_str()) {
            return Route::Web;
        }
        if CHAT_MODES.contains(&mode.as_str()) {
            return Route::Chat;
        }
        match self.default_mode {
            DefaultMode::Quote => Route::Quote(quotes::FALLBACK_MODE.to_string()),
            DefaultMode::Chat => Route::Chat,
        }
    }

    pub async fn answer(&self, message: &str, mode: Option<&str>) -> String {
        let message = message.trim();
        if message.is_empty() {
            return EMPTY_MESSAGE.to_string();
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return MESSAGE_TOO_LONG.to_string();
        }
        match self.route(mode) {
            Route::Quote(m) => quotes::pick(&m).to_string(),
            Route::Chat => {
                self.completer
                    .complete(CHAT_SYSTEM_PROMPT, message, CHAT_TEMPERATURE)
                    .await
            }
            Route::Web => self.answer_from_web(message).await,
        }
    }

    async fn answer_from_web(&self, message: &str) -> String {
        let results = self.chain.search(message, WEB_MAX_RESULTS).await;
        if results.is_empty() {
            return NO_RESULTS.to_string();
        }
        let user_prompt = prompt::build(message, &results);
        let mut answer = self
            .completer
            .complete(prompt::GROUNDED_SYSTEM_PROMPT, &user_prompt, GROUNDED_TEMPERATURE)
            .await;
        answer.push_str(&prompt::sources_footer(&results));
        answer
    }

    pub async fn handle(&self, req: &ChatRequest) -> ChatResponse {
        ChatResponse {
            response: self.answer(&req.message, req.mode.as_deref()).await,
        }
    }
}
