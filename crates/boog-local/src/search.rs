use boog_core::{
    truncate_chars, EndpointKind, Error, ProviderEndpoint, Result, SearchProvider, SearchQuery,
    SearchResult,
};
use serde::Deserialize;
use std::time::Duration;

/// Snippets from any backend are cut to this many characters.
pub const SNIPPET_MAX_CHARS: usize = 500;
/// Titles derived from instant-answer text are cut to this many characters.
pub const INSTANT_ANSWER_TITLE_MAX_CHARS: usize = 80;

fn timeout_from_query(q: &SearchQuery) -> Duration {
    // Search calls stay in single-digit seconds regardless of what the caller asks for.
    Duration::from_millis(q.timeout_ms.clamp(1_000, 9_000))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// `{results: [{title, snippet, url}]}`: the operator endpoint and the community proxy.
#[derive(Debug, Clone)]
pub struct ResultsApiProvider {
    client: reqwest::Client,
    endpoint: String,
    kind: EndpointKind,
}

impl ResultsApiProvider {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, kind: EndpointKind) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            kind,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResultsApiResponse {
    #[serde(default)]
    results: Vec<ResultsApiItem>,
}

#[derive(Debug, Deserialize)]
struct ResultsApiItem {
    title: Option<String>,
    snippet: Option<String>,
    url: Option<String>,
}

fn results_from_results_api(parsed: ResultsApiResponse) -> Vec<SearchResult> {
    let mut out = Vec::new();
    for r in parsed.results {
        let Some(url) = non_empty(r.url) else { continue };
        out.push(SearchResult {
            title: r.title.unwrap_or_default().trim().to_string(),
            url,
            snippet: truncate_chars(r.snippet.as_deref().unwrap_or(""), SNIPPET_MAX_CHARS)
                .to_string(),
        });
    }
    out
}

#[async_trait::async_trait]
impl SearchProvider for ResultsApiProvider {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    async fn search(&self, q: &SearchQuery) -> Result<Vec<SearchResult>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", q.query.as_str()),
                ("max_results", q.max_results.to_string().as_str()),
            ])
            .timeout(timeout_from_query(q))
            .send()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Search(format!("{} search HTTP {status}", self.name())));
        }

        let parsed: ResultsApiResponse = resp
            .json()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;
        Ok(results_from_results_api(parsed))
    }
}

/// DuckDuckGo instant-answer API.
#[derive(Debug, Clone)]
pub struct InstantAnswerProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl InstantAnswerProvider {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct InstantAnswerResponse {
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text")]
    text: Option<String>,
    #[serde(rename = "FirstURL")]
    first_url: Option<String>,
    // Category entries group further topics one level down.
    #[serde(rename = "Topics")]
    topics: Option<Vec<RelatedTopic>>,
}

fn instant_answer_title(text: &str) -> String {
    let head = text
        .split(" – ")
        .next()
        .unwrap_or(text)
        .split(" — ")
        .next()
        .unwrap_or(text);
    truncate_chars(head, INSTANT_ANSWER_TITLE_MAX_CHARS).to_string()
}

fn instant_answer_item(topic: &RelatedTopic) -> Option<SearchResult> {
    let text = topic.text.as_deref()?;
    let url = topic.first_url.as_deref()?;
    if url.trim().is_empty() {
        return None;
    }
    Some(SearchResult {
        title: instant_answer_title(text),
        url: url.trim().to_string(),
        snippet: truncate_chars(text, SNIPPET_MAX_CHARS).to_string(),
    })
}

fn results_from_instant_answer(parsed: InstantAnswerResponse) -> Vec<SearchResult> {
    let mut out = Vec::new();
    for topic in &parsed.related_topics {
        if let Some(item) = instant_answer_item(topic) {
            out.push(item);
        } else if let Some(subs) = &topic.topics {
            out.extend(subs.iter().filter_map(instant_answer_item));
        }
    }
    out
}

#[async_trait::async_trait]
impl SearchProvider for InstantAnswerProvider {
    fn name(&self) -> &'static str {
        EndpointKind::InstantAnswer.as_str()
    }

    async fn search(&self, q: &SearchQuery) -> Result<Vec<SearchResult>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", q.query.as_str()),
                ("format", "json"),
                ("no_html", "1"),
            ])
            .timeout(timeout_from_query(q))
            .send()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Search(format!("instant answer HTTP {status}")));
        }

        // The instant-answer API does not always label its body as JSON.
        let body = resp.text().await.map_err(|e| Error::Search(e.to_string()))?;
        let parsed: InstantAnswerResponse =
            serde_json::from_str(&body).map_err(|e| Error::Search(e.to_string()))?;
        Ok(results_from_instant_answer(parsed))
    }
}

#[derive(Debug, Clone)]
pub struct TavilySearchProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl TavilySearchProvider {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self> {
        let api_key = non_empty(api_key).ok_or_else(|| {
            Error::NotConfigured("missing BOOG_TAVILY_API_KEY (or TAVILY_API_KEY)".to_string())
        })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: Option<String>,
    title: Option<String>,
    content: Option<String>,
}

fn results_from_tavily(parsed: TavilySearchResponse) -> Vec<SearchResult> {
    let mut out = Vec::new();
    for r in parsed.results {
        let Some(url) = non_empty(r.url) else { continue };
        out.push(SearchResult {
            title: r.title.unwrap_or_default().trim().to_string(),
            url,
            snippet: truncate_chars(r.content.as_deref().unwrap_or(""), SNIPPET_MAX_CHARS)
                .to_string(),
        });
    }
    out
}

#[async_trait::async_trait]
impl SearchProvider for TavilySearchProvider {
    fn name(&self) -> &'static str {
        EndpointKind::Tavily.as_str()
    }

    async fn search(&self, q: &SearchQuery) -> Result<Vec<SearchResult>> {
        let body = serde_json::json!({
            "query": q.query,
            "max_results": q.max_results,
            "search_depth": q.depth.as_str(),
            "include_answer": false,
            "include_raw_content": false,
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .json(&body)
            .timeout(timeout_from_query(q))
            .send()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Search(format!("tavily search HTTP {status}")));
        }

        let parsed: TavilySearchResponse = resp
            .json()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;
        Ok(results_from_tavily(parsed))
    }
}

/// Build the provider for one configured endpoint.
///
/// Fails with `NotConfigured` when the endpoint needs a credential that is absent.
pub fn provider_for_endpoint(
    client: &reqwest::Client,
    endpoint: &ProviderEndpoint,
    tavily_api_key: Option<&str>,
) -> Result<Box<dyn SearchProvider>> {
    Ok(match endpoint.kind {
        EndpointKind::Generic | EndpointKind::CommunityProxy => Box::new(
            ResultsApiProvider::new(client.clone(), endpoint.url.clone(), endpoint.kind),
        ),
        EndpointKind::InstantAnswer => Box::new(InstantAnswerProvider::new(
            client.clone(),
            endpoint.url.clone(),
        )),
        EndpointKind::Tavily => Box::new(TavilySearchProvider::new(
            client.clone(),
            endpoint.url.clone(),
            tavily_api_key.map(str::to_string),
        )?),
    })
}
