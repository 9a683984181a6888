use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::aspect::Aspect;
use crate::extract::FieldValue;
use crate::fetch::SearchResult;
use crate::scoring::{self, QualityLabel};

/// Extracted data and query counters for one aspect of one company.
/// Built once per aspect, folded into the consolidated record, discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectResult {
    pub aspect: Aspect,
    pub data: BTreeMap<String, FieldValue>,
    /// Distinct sources matching each extracted field. Reported alongside
    /// the data; never an input to the confidence score.
    pub corroboration: BTreeMap<String, usize>,
    pub queries_total: usize,
    pub queries_with_results: usize,
    #[serde(skip)]
    pub sources: Vec<SearchResult>,
}

impl AspectResult {
    pub fn empty(aspect: Aspect, queries_total: usize) -> Self {
        Self {
            aspect,
            data: BTreeMap::new(),
            corroboration: BTreeMap::new(),
            queries_total,
            queries_with_results: 0,
            sources: Vec::new(),
        }
    }

    /// Confidence in this aspect's extraction, in [0, 1].
    pub fn confidence(&self) -> f64 {
        scoring::confidence_score(self.data.len(), self.queries_with_results)
    }
}

/// Outcome of one aspect pipeline. An empty result is a completed outcome,
/// not a failure; only an unrecoverable pipeline error counts as failed.
#[derive(Debug)]
pub enum AspectOutcome {
    Completed(AspectResult),
    Failed { aspect: Aspect, reason: String },
}

/// A failed aspect as reported to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedAspect {
    pub aspect: Aspect,
    pub reason: String,
}

/// The merged, scored result across all aspects for one company.
/// Plain nested mappings, numbers, strings and lists; serializes directly
/// to JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    pub analysis_id: Uuid,
    pub company_name: String,
    pub analysis_date: DateTime<Utc>,
    pub sections: BTreeMap<String, BTreeMap<String, FieldValue>>,
    pub corroboration: BTreeMap<String, BTreeMap<String, usize>>,
    pub aspect_scores: BTreeMap<String, f64>,
    pub overall_score: f64,
    pub quality: QualityLabel,
    pub sources: Vec<String>,
    pub failed_aspects: Vec<FailedAspect>,
}

/// Merge per-aspect outcomes into a single consolidated record.
///
/// Outcomes are folded in the order given, so completion order of the
/// concurrent pipelines does not matter. Failed aspects are excluded from
/// both the numerator and denominator of the overall score; sources are
/// deduplicated by exact URL, first-seen order preserved.
pub fn consolidate(company_name: &str, outcomes: &[AspectOutcome]) -> ConsolidatedRecord {
    let mut sections = BTreeMap::new();
    let mut corroboration = BTreeMap::new();
    let mut aspect_scores = BTreeMap::new();
    let mut failed_aspects = Vec::new();

    let mut sources = Vec::new();
    let mut seen_urls = std::collections::HashSet::new();

    let mut score_sum = 0.0;
    let mut scored_count = 0usize;

    for outcome in outcomes {
        match outcome {
            AspectOutcome::Completed(result) => {
                let score = result.confidence();
                debug!(aspect = %result.aspect, score, "aspect folded");

                sections.insert(result.aspect.name().to_string(), result.data.clone());
                if !result.corroboration.is_empty() {
                    corroboration
                        .insert(result.aspect.name().to_string(), result.corroboration.clone());
                }
                aspect_scores.insert(result.aspect.name().to_string(), score);

                score_sum += score;
                scored_count += 1;

                for source in &result.sources {
                    if seen_urls.insert(source.url.clone()) {
                        sources.push(source.url.clone());
                    }
                }
            }
            AspectOutcome::Failed { aspect, reason } => {
                failed_aspects.push(FailedAspect {
                    aspect: *aspect,
                    reason: reason.clone(),
                });
            }
        }
    }

    let overall_score = if scored_count > 0 {
        scoring::round2(score_sum / scored_count as f64)
    } else {
        0.0
    };

    let record = ConsolidatedRecord {
        analysis_id: Uuid::new_v4(),
        company_name: company_name.to_string(),
        analysis_date: Utc::now(),
        sections,
        corroboration,
        aspect_scores,
        overall_score,
        quality: QualityLabel::from_score(overall_score),
        sources,
        failed_aspects,
    };

    info!(
        company = company_name,
        overall_score,
        quality = %record.quality,
        failed = record.failed_aspects.len(),
        "analysis consolidated"
    );

    record
}
