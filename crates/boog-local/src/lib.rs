use boog_core::{Error, Result};
use std::time::Duration;

pub mod chain;
pub mod chatlog;
pub mod completion;
pub mod config;
pub mod openai_compat;
pub mod orchestrator;
pub mod prompt;
pub mod quotes;
pub mod search;

pub use chain::SearchChain;
pub use chatlog::{ChatLog, ChatLogEntry};
pub use completion::Completer;
pub use config::{Config, DefaultMode, LlmConfig, LlmProvider, SearchConfig};
pub use orchestrator::{Orchestrator, Route};

/// The one HTTP client shared by search providers and the model client.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("boog/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        // Per-request timeouts are tighter; this is the backstop for stalled connections.
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| Error::InvalidConfig(e.to_string()))
}
