//! impresascope - Italian company research and fact extraction
//!
//! This library provides the core functionality for impresascope, including:
//! - Aspect-based query generation and regex fact extraction
//! - Pluggable source fetching (search engine, test doubles)
//! - Confidence scoring and result consolidation
//! - Export capabilities
//! - Concurrent aspect orchestration with cooperative cancellation

pub mod aggregate;
pub mod aspect;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod scoring;
pub mod utils;

// Re-export main types for convenience
pub use crate::aggregate::{AspectOutcome, AspectResult, ConsolidatedRecord};
pub use crate::aspect::{Aspect, AspectRegistry};
pub use crate::config::AppConfig;
pub use crate::engine::{CancellationToken, ResearchEngine};
pub use crate::error::{ResearchError, ResearchResult};
pub use crate::fetch::{SearchResult, SourceFetcher};
