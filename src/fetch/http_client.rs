use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::rate_limiter::DomainRateLimiter;
use super::retry::RetryPolicy;
use super::{SearchResult, SourceFetcher};
use crate::config::FetcherConfig;
use crate::error::{ResearchError, ResearchResult};
use crate::utils::validation_utils::ValidationUtils;

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// HTTP-backed source fetcher: DuckDuckGo HTML search plus plain page
/// fetches. Retry and rate limiting both live here, at the boundary; the
/// extraction core never sees either.
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
    retry: RetryPolicy,
    rate_limiter: DomainRateLimiter,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> ResearchResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Accept",
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert("Accept-Language", HeaderValue::from_static("it-IT,it;q=0.8,en;q=0.5"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ResearchError::config(format!("HTTP client build failed: {}", e)))?;

        info!(
            requests_per_minute = config.requests_per_minute,
            "HTTP fetcher initialized"
        );

        Ok(Self {
            client,
            config: config.clone(),
            retry: RetryPolicy::new(
                config.retry.max_attempts,
                Duration::from_millis(config.retry.base_delay_ms),
                config.retry.jitter,
            ),
            rate_limiter: DomainRateLimiter::new(config.requests_per_minute),
        })
    }

    /// GET a URL as text, with per-domain rate limiting and retries.
    async fn get_text(&self, url: &Url) -> ResearchResult<String> {
        let domain = url.host_str().unwrap_or("unknown").to_string();
        self.rate_limiter.acquire(&domain).await;

        self.retry
            .run(|attempt| {
                let client = self.client.clone();
                let url = url.clone();
                async move {
                    debug!(%url, attempt, "HTTP GET");
                    let response = client.get(url.as_str()).send().await?;

                    let status = response.status();
                    if !status.is_success() {
                        return Err(ResearchError::HttpRequest {
                            url: url.to_string(),
                            status: status.as_u16(),
                        });
                    }

                    Ok(response.text().await?)
                }
            })
            .await
    }

    /// Page bodies are only worth a fetch for registry, encyclopedia and
    /// profile domains, or URLs that look like the company's own site.
    fn is_relevant_url(&self, url: &str) -> bool {
        let lower = url.to_lowercase();
        if self.config.relevant_domains.iter().any(|d| lower.contains(d)) {
            return true;
        }
        ["company", "azienda", "about", "chi-siamo"]
            .iter()
            .any(|hint| lower.contains(hint))
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn search(&self, query: &str) -> ResearchResult<Vec<SearchResult>> {
        let search_url = Url::parse_with_params(SEARCH_ENDPOINT, &[("q", query)])
            .map_err(|e| ResearchError::search(query, e.to_string()))?;

        let body = self
            .get_text(&search_url)
            .await
            .map_err(|e| ResearchError::search(query, e.to_string()))?;

        let mut hits = parse_search_results(&body, self.config.max_results_per_query);
        debug!(query, hits = hits.len(), "search completed");

        if self.config.fetch_page_bodies {
            for hit in &mut hits {
                if !self.is_relevant_url(&hit.url) {
                    continue;
                }
                match self.fetch_page(&hit.url).await {
                    Ok(text) => {
                        let truncated: String =
                            text.chars().take(self.config.content_max_chars).collect();
                        hit.content = Some(truncated);
                    }
                    Err(e) => {
                        // A lost page body is not a lost hit.
                        warn!(url = %hit.url, error = %e, "page fetch failed");
                    }
                }
            }
        }

        Ok(hits)
    }

    async fn fetch_page(&self, url: &str) -> ResearchResult<String> {
        let parsed = Url::parse(url).map_err(|e| ResearchError::Network {
            message: format!("invalid URL {}: {}", url, e),
        })?;

        let html = self.get_text(&parsed).await?;
        Ok(page_to_text(&html))
    }
}

/// Parse a DuckDuckGo HTML results page into search hits.
fn parse_search_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);

    let result_selector = Selector::parse("div.result").unwrap();
    let title_selector = Selector::parse("a.result__a").unwrap();
    let snippet_selector = Selector::parse("a.result__snippet").unwrap();

    let mut hits = Vec::new();

    for result in document.select(&result_selector).take(max_results) {
        let Some(title_link) = result.select(&title_selector).next() else {
            continue;
        };
        let Some(href) = title_link.value().attr("href") else {
            continue;
        };
        // DuckDuckGo sometimes emits relative redirect links; only absolute
        // http(s) URLs are usable downstream.
        if !ValidationUtils::is_valid_url(href) {
            continue;
        }

        let title = title_link.text().collect::<String>().trim().to_string();
        let snippet = result
            .select(&snippet_selector)
            .next()
            .map(|s| s.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        hits.push(SearchResult {
            title,
            url: href.to_string(),
            snippet,
            content: None,
        });
    }

    hits
}

/// Reduce an HTML page to whitespace-normalized visible text.
fn page_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let body_selector = Selector::parse("body").unwrap();

    let raw: String = match document.select(&body_selector).next() {
        Some(body) => body.text().collect::<Vec<_>>().join(" "),
        None => document.root_element().text().collect::<Vec<_>>().join(" "),
    };

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SERP: &str = r#"
        <html><body>
          <div class="result">
            <a class="result__a" href="https://www.registroimprese.it/ferrero">Ferrero S.p.A.</a>
            <a class="result__snippet">P.IVA: 00159560366 - sede legale: Alba</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://it.wikipedia.org/wiki/Ferrero">Ferrero - Wikipedia</a>
            <a class="result__snippet">fatturato: 13 miliardi</a>
          </div>
          <div class="result"><span>malformed, no title link</span></div>
        </body></html>
    "#;

    #[test]
    fn test_parse_search_results() {
        let hits = parse_search_results(SAMPLE_SERP, 10);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Ferrero S.p.A.");
        assert_eq!(hits[0].url, "https://www.registroimprese.it/ferrero");
        assert!(hits[0].snippet.contains("00159560366"));
        assert!(hits[1].url.contains("wikipedia.org"));
    }

    #[test]
    fn test_parse_respects_result_limit() {
        let hits = parse_search_results(SAMPLE_SERP, 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_page_to_text_strips_markup() {
        let html = "<html><body><h1>Ferrero</h1>\n<p>120   dipendenti</p></body></html>";
        assert_eq!(page_to_text(html), "Ferrero 120 dipendenti");
    }

    #[test]
    fn test_relevant_url_filter() {
        let fetcher = HttpFetcher::new(&FetcherConfig::default()).unwrap();

        assert!(fetcher.is_relevant_url("https://www.registroimprese.it/x"));
        assert!(fetcher.is_relevant_url("https://it.linkedin.com/company/ferrero"));
        assert!(fetcher.is_relevant_url("https://www.ferrero.it/chi-siamo"));
        assert!(!fetcher.is_relevant_url("https://random-blog.example/post"));
    }
}
