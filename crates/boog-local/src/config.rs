//! Process configuration, resolved once from the environment and passed to constructors.

use boog_core::{parse_endpoint_url, EndpointKind, Error, ProviderEndpoint, Result, SearchDepth};
use std::path::{Path, PathBuf};

pub const DEFAULT_PROXY_ENDPOINT: &str = "https://ddg-webapp-search.vercel.app/api/search";
pub const DEFAULT_INSTANT_ANSWER_ENDPOINT: &str = "https://api.duckduckgo.com/";
pub const DEFAULT_TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_LLM_TIMEOUT_MS: u64 = 20_000;

fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_any(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| env(k))
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match env(key) {
        None => Ok(None),
        Some(v) => v
            .parse::<u64>()
            .map(Some)
            .map_err(|e| Error::InvalidConfig(format!("{key}={v}: {e}"))),
    }
}

fn checked_url(raw: String) -> Result<String> {
    parse_endpoint_url(&raw)?;
    Ok(raw)
}

/// Load `KEY=VALUE` lines into the process environment.
///
/// Blank lines and `#` comments are ignored. Variables already set in the process win.
pub fn load_env_file(path: &Path) -> Result<usize> {
    let txt = std::fs::read_to_string(path)
        .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
    let mut applied = 0;
    for raw in txt.lines() {
        let s = raw.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let Some((k, v)) = s.split_once('=') else {
            continue;
        };
        let k = k.trim();
        let v = v.trim().trim_matches('"');
        if k.is_empty() {
            continue;
        }
        if std::env::var_os(k).is_none() {
            std::env::set_var(k, v);
            applied += 1;
        }
    }
    Ok(applied)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Groq,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Groq => "groq",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "https://api.openai.com",
            LlmProvider::Groq => "https://api.groq.com/openai",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4o-mini",
            LlmProvider::Groq => "llama-3.1-8b-instant",
        }
    }

    pub fn api_key_var(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "OPENAI_API_KEY",
            LlmProvider::Groq => "GROQ_API_KEY",
        }
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "groq" => Ok(LlmProvider::Groq),
            other => Err(Error::InvalidConfig(format!("unknown llm provider: {other}"))),
        }
    }
}

/// Branch taken when a request's mode is absent or unrecognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DefaultMode {
    /// Canned quote from the fallback quote mode.
    #[default]
    Quote,
    /// Ungrounded model chat on the raw message.
    Chat,
}

impl DefaultMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultMode::Quote => "quote",
            DefaultMode::Chat => "chat",
        }
    }
}

impl std::str::FromStr for DefaultMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quote" | "quotes" => Ok(DefaultMode::Quote),
            "chat" | "ai" => Ok(DefaultMode::Chat),
            other => Err(Error::InvalidConfig(format!("unknown default mode: {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Priority order: first entry is tried first.
    pub endpoints: Vec<ProviderEndpoint>,
    pub tavily_api_key: Option<String>,
    pub depth: SearchDepth,
    pub timeout_ms: u64,
}

impl SearchConfig {
    pub fn from_env() -> Result<Self> {
        let mut endpoints = Vec::new();
        if let Some(u) = env_any(&["BOOG_SEARCH_API_ENDPOINT", "SEARCH_API_ENDPOINT"]) {
            endpoints.push(ProviderEndpoint::new(checked_url(u)?, EndpointKind::Generic));
        }
        let proxy = env("BOOG_SEARCH_PROXY_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_PROXY_ENDPOINT.to_string());
        endpoints.push(ProviderEndpoint::new(
            checked_url(proxy)?,
            EndpointKind::CommunityProxy,
        ));
        let instant = env("BOOG_INSTANT_ANSWER_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_INSTANT_ANSWER_ENDPOINT.to_string());
        endpoints.push(ProviderEndpoint::new(
            checked_url(instant)?,
            EndpointKind::InstantAnswer,
        ));
        let tavily =
            env("BOOG_TAVILY_ENDPOINT").unwrap_or_else(|| DEFAULT_TAVILY_ENDPOINT.to_string());
        endpoints.push(ProviderEndpoint::new(checked_url(tavily)?, EndpointKind::Tavily));

        let depth = match env("BOOG_SEARCH_DEPTH") {
            Some(v) => v.parse()?,
            None => SearchDepth::default(),
        };
        let timeout_ms = env_u64("BOOG_SEARCH_TIMEOUT_MS")?
            .unwrap_or(DEFAULT_SEARCH_TIMEOUT_MS)
            .clamp(1_000, 9_000);

        Ok(Self {
            endpoints,
            tavily_api_key: env_any(&["BOOG_TAVILY_API_KEY", "TAVILY_API_KEY"]),
            depth,
            timeout_ms,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_ms: u64,
}

impl LlmConfig {
    pub fn from_env() -> Result<Self> {
        let provider = match env("BOOG_LLM_PROVIDER") {
            Some(v) => v.parse()?,
            None => LlmProvider::OpenAi,
        };
        let base_url = match env("BOOG_LLM_BASE_URL") {
            Some(u) => checked_url(u)?,
            None => provider.default_base_url().to_string(),
        };
        Ok(Self {
            provider,
            base_url,
            api_key: env_any(&["BOOG_LLM_API_KEY", provider.api_key_var()]),
            model: env("BOOG_LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            timeout_ms: env_u64("BOOG_LLM_TIMEOUT_MS")?.unwrap_or(DEFAULT_LLM_TIMEOUT_MS),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub llm: LlmConfig,
    pub default_mode: DefaultMode,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_mode = match env("BOOG_DEFAULT_MODE") {
            Some(v) => v.parse()?,
            None => DefaultMode::default(),
        };
        let log_file = match env("BOOG_LOG_FILE") {
            Some(p) if matches!(p.to_ascii_lowercase().as_str(), "0" | "off" | "none") => None,
            Some(p) => Some(PathBuf::from(p)),
            None => Some(std::env::temp_dir().join("boog_log.json")),
        };
        Ok(Self {
            search: SearchConfig::from_env()?,
            llm: LlmConfig::from_env()?,
            default_mode,
            log_file,
        })
    }
}
