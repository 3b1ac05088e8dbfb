//! Ordered search fallback: first endpoint with results wins.

use boog_core::{SearchDepth, SearchProvider, SearchQuery, SearchResult};

use crate::config::SearchConfig;
use crate::search::provider_for_endpoint;

pub struct SearchChain {
    providers: Vec<Box<dyn SearchProvider>>,
    depth: SearchDepth,
    timeout_ms: u64,
}

impl SearchChain {
    pub fn new(providers: Vec<Box<dyn SearchProvider>>, depth: SearchDepth, timeout_ms: u64) -> Self {
        Self {
            providers,
            depth,
            timeout_ms,
        }
    }

    /// Builds one provider per configured endpoint, in configured order.
    ///
    /// Endpoints whose credential is missing are left out of the chain.
    pub fn from_config(client: &reqwest::Client, cfg: &SearchConfig) -> Self {
        let mut providers = Vec::with_capacity(cfg.endpoints.len());
        for ep in &cfg.endpoints {
            match provider_for_endpoint(client, ep, cfg.tavily_api_key.as_deref()) {
                Ok(p) => providers.push(p),
                Err(e) => tracing::debug!(endpoint = %ep.url, error = %e, "search endpoint skipped"),
            }
        }
        Self::new(providers, cfg.depth, cfg.timeout_ms)
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Never fails: an empty vector means no context is available.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let q = SearchQuery::new(query, max_results, self.depth, self.timeout_ms);
        if q.query.is_empty() {
            return Vec::new();
        }
        for provider in &self.providers {
            match provider.search(&q).await {
                Ok(mut results) if !results.is_empty() => {
                    results.truncate(max_results);
                    tracing::debug!(
                        provider = provider.name(),
                        results = results.len(),
                        "search succeeded"
                    );
                    return results;
                }
                Ok(_) => {
                    tracing::warn!(provider = provider.name(), "search returned no results");
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "search error");
                }
            }
        }
        Vec::new()
    }
}
