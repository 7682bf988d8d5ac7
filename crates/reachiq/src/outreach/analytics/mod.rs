//! Lead-facing analytics built on the sequencing engine: cached growth
//! curves, decision trees, batch predictions and portfolio insights.

pub mod cache;
pub mod insights;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use cache::{CacheError, CacheKey, CachedAnalysis, ResultCache};
pub use insights::{BandInsight, OptimizationInsights};
pub use router::analytics_router;
pub use service::{AnalyticsServiceError, OutreachAnalyticsService, MAX_BATCH_LEADS};
