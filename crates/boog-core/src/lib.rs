use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("search failed: {0}")]
    Search(String),
    #[error("llm failed: {0}")]
    Llm(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("chat log error: {0}")]
    Log(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Upper bound for the result-count hint sent to any search backend.
pub const MAX_RESULTS_CAP: usize = 8;
/// Queries are cut to this many characters before submission.
pub const MAX_QUERY_CHARS: usize = 400;

/// Truncate to at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Parse an absolute http(s) URL.
pub fn parse_endpoint_url(raw: &str) -> Result<url::Url> {
    let u = url::Url::parse(raw.trim())
        .map_err(|e| Error::InvalidConfig(format!("{raw}: {e}")))?;
    match u.scheme() {
        "http" | "https" => Ok(u),
        other => Err(Error::InvalidConfig(format!(
            "{raw}: unsupported scheme {other}"
        ))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub max_results: usize,
    pub depth: SearchDepth,
    pub timeout_ms: u64,
}

impl SearchQuery {
    /// Builds a query with the text bounded and the count hint clamped to `1..=MAX_RESULTS_CAP`.
    pub fn new(query: &str, max_results: usize, depth: SearchDepth, timeout_ms: u64) -> Self {
        Self {
            query: truncate_chars(query.trim(), MAX_QUERY_CHARS).to_string(),
            max_results: max_results.clamp(1, MAX_RESULTS_CAP),
            depth,
            timeout_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

impl std::str::FromStr for SearchDepth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(SearchDepth::Basic),
            "advanced" | "deep" => Ok(SearchDepth::Advanced),
            other => Err(Error::InvalidConfig(format!("unknown search depth: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Selects how an endpoint's JSON body is parsed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Operator-supplied endpoint speaking `{results: [{title, snippet, url}]}`.
    Generic,
    /// Community search proxy; same schema as `Generic`.
    CommunityProxy,
    /// DuckDuckGo instant-answer API (`RelatedTopics`).
    InstantAnswer,
    /// Tavily search API (`{results: [{title, content, url}]}`, keyed).
    Tavily,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Generic => "generic",
            EndpointKind::CommunityProxy => "community_proxy",
            EndpointKind::InstantAnswer => "instant_answer",
            EndpointKind::Tavily => "tavily",
        }
    }
}

/// A configured search endpoint. Priority is the position in the configured list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub url: String,
    pub kind: EndpointKind,
}

impl ProviderEndpoint {
    pub fn new(url: impl Into<String>, kind: EndpointKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search(&self, q: &SearchQuery) -> Result<Vec<SearchResult>>;
}

/// A two-message (system + user) completion backend.
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, system: &str, user: &str, temperature: f64) -> Result<String>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_chars_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn search_query_clamps_count_and_bounds_text() {
        let long = "q".repeat(1_000);
        let q = SearchQuery::new(&long, 50, SearchDepth::Basic, 8_000);
        assert_eq!(q.query.chars().count(), MAX_QUERY_CHARS);
        assert_eq!(q.max_results, MAX_RESULTS_CAP);

        let q = SearchQuery::new("  hi  ", 0, SearchDepth::Advanced, 8_000);
        assert_eq!(q.query, "hi");
        assert_eq!(q.max_results, 1);
    }

    #[test]
    fn chat_request_tolerates_missing_fields() {
        let r: ChatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(r.message, "");
        assert!(r.mode.is_none());

        let r: ChatRequest = serde_json::from_str(r#"{"message":"hi","mode":"web"}"#).unwrap();
        assert_eq!(r.mode.as_deref(), Some("web"));
    }

    #[test]
    fn search_depth_parses_aliases() {
        assert_eq!("Advanced".parse::<SearchDepth>().unwrap(), SearchDepth::Advanced);
        assert_eq!("deep".parse::<SearchDepth>().unwrap(), SearchDepth::Advanced);
        assert!("bogus".parse::<SearchDepth>().is_err());
    }

    #[test]
    fn endpoint_urls_must_be_http() {
        assert!(parse_endpoint_url("https://api.duckduckgo.com/").is_ok());
        assert!(matches!(
            parse_endpoint_url("ftp://example.com"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(parse_endpoint_url("not a url").is_err());
    }
}
