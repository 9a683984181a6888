use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::aggregate::{self, AspectOutcome, AspectResult, ConsolidatedRecord};
use crate::aspect::{Aspect, AspectRegistry};
use crate::cache::SearchCache;
use crate::config::AppConfig;
use crate::error::{ResearchError, ResearchResult};
use crate::extract::FactExtractor;
use crate::fetch::{SearchResult, SourceFetcher};

pub mod cancel;

pub use cancel::CancellationToken;

/// Orchestrates the research pipeline for one company: aspect tasks run
/// concurrently under a bounded semaphore, each owning its own result
/// list, and the aggregator folds them sequentially afterwards.
pub struct ResearchEngine {
    registry: Arc<AspectRegistry>,
    fetcher: Arc<dyn SourceFetcher>,
    cache: Arc<SearchCache>,
    semaphore: Arc<Semaphore>,
}

impl ResearchEngine {
    /// Build the engine. Rule tables compile here; a malformed extraction
    /// pattern fails construction before any per-company work begins.
    pub fn new(config: &AppConfig, fetcher: Arc<dyn SourceFetcher>) -> ResearchResult<Self> {
        config.validate()?;

        let registry = Arc::new(AspectRegistry::new()?);
        let cache = Arc::new(SearchCache::new(&config.cache));
        let semaphore = Arc::new(Semaphore::new(config.research.max_concurrent_aspects));

        info!(
            max_concurrent_aspects = config.research.max_concurrent_aspects,
            "research engine initialized"
        );

        Ok(Self { registry, fetcher, cache, semaphore })
    }

    /// Run the full analysis for a company over the requested aspects.
    ///
    /// Partial aspect failures lower the score and show up in
    /// `failed_aspects`; only the case where every aspect fails is an
    /// error for the whole request.
    pub async fn analyze(
        &self,
        company_name: &str,
        aspects: &[Aspect],
        token: &CancellationToken,
    ) -> ResearchResult<ConsolidatedRecord> {
        let company = company_name.trim();
        if company.is_empty() {
            return Err(ResearchError::config("company name must not be empty"));
        }

        info!(company, aspects = aspects.len(), "starting analysis");

        let tasks = aspects.iter().map(|&aspect| {
            let token = token.clone();
            let semaphore = self.semaphore.clone();
            async move {
                // Permit scope bounds how many pipelines run at once.
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return AspectOutcome::Failed {
                            aspect,
                            reason: "engine shut down".to_string(),
                        }
                    }
                };
                self.run_aspect(company, aspect, token).await
            }
        });

        let outcomes = join_all(tasks).await;

        let all_failed = !outcomes.is_empty()
            && outcomes
                .iter()
                .all(|o| matches!(o, AspectOutcome::Failed { .. }));
        if all_failed {
            return Err(ResearchError::AllAspectsFailed { company: company.to_string() });
        }

        // Fold in the requested order, so completion order is irrelevant.
        Ok(aggregate::consolidate(company, &outcomes))
    }

    /// Analysis with a caller-initiated deadline: the token is cancelled
    /// when the timeout elapses and in-flight aspects return what they
    /// have gathered so far.
    pub async fn analyze_with_timeout(
        &self,
        company_name: &str,
        aspects: &[Aspect],
        timeout: Duration,
    ) -> ResearchResult<ConsolidatedRecord> {
        let token = CancellationToken::new();
        let timer = token.clone();

        let guard = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            timer.cancel();
        });

        let record = self.analyze(company_name, aspects, &token).await;
        guard.abort();
        record
    }

    /// One aspect pipeline: generate queries, fetch (through cache and the
    /// fetcher's own rate limiting), then extract once over all gathered
    /// text.
    async fn run_aspect(
        &self,
        company: &str,
        aspect: Aspect,
        token: CancellationToken,
    ) -> AspectOutcome {
        let queries = self.registry.queries_for(aspect, company);
        let mut result = AspectResult::empty(aspect, queries.len());

        for query in &queries {
            if token.is_cancelled() {
                debug!(%aspect, "cancelled, keeping partial results");
                break;
            }

            let hits = match self.search_cached(query).await {
                Ok(hits) => hits,
                Err(e) if e.is_recoverable() => {
                    // The failing query contributes zero results; the
                    // aspect continues.
                    warn!(%aspect, query, error = %e, "query failed, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(%aspect, error = %e, "aspect failed");
                    return AspectOutcome::Failed { aspect, reason: e.to_string() };
                }
            };

            if !hits.is_empty() {
                result.queries_with_results += 1;
                result.sources.extend(hits.iter().cloned());
            }
        }

        let texts: Vec<String> = result.sources.iter().map(SearchResult::combined_text).collect();
        let combined = texts.join(" ");

        let rules = self.registry.rules_for(aspect);
        result.data = FactExtractor::extract(rules, &combined);
        result.corroboration = FactExtractor::corroboration_counts(rules, &texts);

        debug!(
            %aspect,
            fields = result.data.len(),
            productive_queries = result.queries_with_results,
            "aspect completed"
        );

        AspectOutcome::Completed(result)
    }

    async fn search_cached(&self, query: &str) -> ResearchResult<Vec<SearchResult>> {
        if let Some(cached) = self.cache.get(query).await {
            return Ok((*cached).clone());
        }

        let hits = self.fetcher.search(query).await?;
        self.cache.insert(query, hits.clone()).await;
        Ok(hits)
    }
}
