use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use super::cache::{CacheError, CacheKey, CachedAnalysis, ResultCache};
use super::insights::{self, OptimizationInsights};
use crate::outreach::sequencing::{
    DecisionTree, GrowthCurveResult, SequenceAnalysis, SequencingEngine,
};
use crate::outreach::signals::{LeadId, OutreachSignals, SignalSource, SignalSourceError};

/// Ids beyond this count in a batch request are ignored.
pub const MAX_BATCH_LEADS: usize = 50;

/// Service composing the signal source, result cache and sequencing engine.
pub struct OutreachAnalyticsService<S, C> {
    source: Arc<S>,
    cache: Arc<C>,
    engine: Arc<SequencingEngine>,
    ttl: Duration,
}

impl<S, C> OutreachAnalyticsService<S, C>
where
    S: SignalSource + 'static,
    C: ResultCache + 'static,
{
    pub fn new(source: Arc<S>, cache: Arc<C>, engine: SequencingEngine, ttl: Duration) -> Self {
        Self {
            source,
            cache,
            engine: Arc::new(engine),
            ttl,
        }
    }

    pub fn engine(&self) -> &SequencingEngine {
        &self.engine
    }

    /// Sanitized signals for one lead, as served to dashboards.
    pub fn outreach_signals(
        &self,
        lead_id: &LeadId,
    ) -> Result<OutreachSignals, AnalyticsServiceError> {
        let lead = self
            .source
            .lead(lead_id)
            .map_err(|err| {
                warn!(lead_id = %lead_id, error = %err, "signal lookup failed");
                err
            })?
            .ok_or_else(|| AnalyticsServiceError::LeadNotFound(lead_id.clone()))?;
        Ok(lead.outreach_signals())
    }

    /// Both views for a lead, served from the cache while fresh.
    pub fn analysis(
        &self,
        lead_id: &LeadId,
        now: DateTime<Utc>,
    ) -> Result<SequenceAnalysis, AnalyticsServiceError> {
        let key = CacheKey::new(lead_id.clone(), self.engine.policy().fingerprint());

        let cached = self.cache.get(&key).map_err(|err| {
            warn!(lead_id = %lead_id, error = %err, "cache read failed");
            err
        })?;
        if let Some(entry) = cached.filter(|entry| entry.is_fresh(now, self.ttl)) {
            return Ok(entry.analysis);
        }

        info!(lead_id = %lead_id, "analysis cache miss");
        let signals = self.outreach_signals(lead_id)?;
        let analysis = self.engine.analyze(&signals);

        self.cache
            .put(
                key,
                CachedAnalysis {
                    stored_at: now,
                    analysis: analysis.clone(),
                },
            )
            .map_err(|err| {
                warn!(lead_id = %lead_id, error = %err, "cache write failed");
                err
            })?;

        Ok(analysis)
    }

    pub fn growth_curve(
        &self,
        lead_id: &LeadId,
        now: DateTime<Utc>,
    ) -> Result<GrowthCurveResult, AnalyticsServiceError> {
        Ok(self.analysis(lead_id, now)?.growth_curve)
    }

    pub fn decision_tree(
        &self,
        lead_id: &LeadId,
        now: DateTime<Utc>,
    ) -> Result<DecisionTree, AnalyticsServiceError> {
        Ok(self.analysis(lead_id, now)?.decision_tree)
    }

    /// Analyze caller-supplied signals. Never cached.
    pub fn custom(&self, signals: &OutreachSignals) -> GrowthCurveResult {
        self.engine.growth_curve(signals)
    }

    /// Growth curves for up to [`MAX_BATCH_LEADS`] leads. Unknown leads are
    /// skipped; unavailability of the source or cache fails the batch.
    pub fn batch(
        &self,
        lead_ids: &[LeadId],
        now: DateTime<Utc>,
    ) -> Result<Vec<GrowthCurveResult>, AnalyticsServiceError> {
        let mut results = Vec::new();
        for lead_id in lead_ids.iter().take(MAX_BATCH_LEADS) {
            match self.growth_curve(lead_id, now) {
                Ok(result) => results.push(result),
                Err(AnalyticsServiceError::LeadNotFound(_)) => {
                    info!(lead_id = %lead_id, "skipping unknown lead in batch");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(results)
    }

    /// Aggregate stopping behaviour across every lead in the directory.
    pub fn optimization_insights(
        &self,
        now: DateTime<Utc>,
    ) -> Result<OptimizationInsights, AnalyticsServiceError> {
        let leads = self.source.leads().map_err(|err| {
            warn!(error = %err, "lead listing failed");
            err
        })?;

        let mut analyzed = Vec::with_capacity(leads.len());
        for lead in &leads {
            let result = self.growth_curve(&lead.id, now)?;
            analyzed.push((lead.intent_band(), result));
        }

        Ok(insights::summarize(&analyzed))
    }
}

/// Error raised by the analytics service.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsServiceError {
    #[error("no data available for lead {0}")]
    LeadNotFound(LeadId),
    #[error(transparent)]
    Signals(#[from] SignalSourceError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl AnalyticsServiceError {
    /// Upstream failures the caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AnalyticsServiceError::Signals(_) | AnalyticsServiceError::Cache(_)
        )
    }
}
