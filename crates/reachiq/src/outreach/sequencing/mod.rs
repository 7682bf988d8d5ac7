//! Outreach sequencing decision engine.
//!
//! A single [`ChannelModel`] is derived per request and feeds both the linear
//! growth curve and the branching decision tree, so the two views always agree
//! on which channel is primary and how effective it is. Everything here is a
//! pure function of the signals and the policy.

mod channels;
mod domain;
mod gains;
mod metrics;
mod policy;
mod probability;
mod stopping;
mod tree;

#[cfg(test)]
mod tests;

pub use channels::{ChannelModel, ChannelProfile};
pub use domain::{GrowthCurveResult, GrowthMetrics, SequenceEfficiency, SequenceStep, StepType};
pub use metrics::analyze_efficiency;
pub use policy::{
    DecayModel, EnginePolicy, PolicyError, StoppingThreshold, BASE_DECAY_RATE,
    BASE_STOPPING_THRESHOLD, DEFAULT_TOTAL_STEPS, MAX_TOTAL_STEPS,
};
pub use tree::{DecisionEdge, DecisionNode, DecisionTree, NodeStatus};

use crate::outreach::signals::OutreachSignals;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Both views of one lead's analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceAnalysis {
    pub growth_curve: GrowthCurveResult,
    pub decision_tree: DecisionTree,
}

/// Stateless engine applying a validated [`EnginePolicy`] to lead signals.
#[derive(Debug, Clone)]
pub struct SequencingEngine {
    policy: EnginePolicy,
}

impl SequencingEngine {
    pub fn new(policy: EnginePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    pub fn analyze(&self, signals: &OutreachSignals) -> SequenceAnalysis {
        let signals = signals.clone().sanitized();
        let model = ChannelModel::from_channels(&signals.channels);

        SequenceAnalysis {
            growth_curve: self.growth_curve_for(&model, &signals),
            decision_tree: tree::build_tree(&model, &signals),
        }
    }

    pub fn growth_curve(&self, signals: &OutreachSignals) -> GrowthCurveResult {
        self.analyze(signals).growth_curve
    }

    pub fn decision_tree(&self, signals: &OutreachSignals) -> DecisionTree {
        self.analyze(signals).decision_tree
    }

    fn growth_curve_for(&self, model: &ChannelModel, signals: &OutreachSignals) -> GrowthCurveResult {
        let decay = self
            .policy
            .decay()
            .resolve(signals.intent_score, signals.linkedin_engagement);
        let steps = probability::build_steps(model, self.policy.total_steps(), &decay);
        let marginal_gains = gains::marginal_gains(&steps);
        let stopping_threshold = self
            .policy
            .stopping_threshold()
            .resolve(signals.intent_score, signals.linkedin_engagement);

        let decision = stopping::select_stopping_point(&steps, &marginal_gains, stopping_threshold);
        let cumulative = metrics::cumulative_probability(&steps);
        let efficiency = analyze_efficiency(&cumulative, &[]);
        let metrics = metrics::aggregate(cumulative, &marginal_gains, decision.optimal_step);
        let expected = metrics.optimal_probability;
        let roi_score = metrics::roi_score(expected, decision.optimal_step, steps.len());

        debug!(
            lead_id = %signals.buyer_id,
            primary = %model.primary().name,
            optimal_step = decision.optimal_step,
            stopping_threshold,
            expected,
            "sequence analyzed"
        );

        GrowthCurveResult {
            lead_id: signals.buyer_id.clone(),
            steps,
            optimal_stopping_point: decision.optimal_step,
            stopping_reason: decision.reason,
            expected_total_response_probability: expected,
            roi_score,
            marginal_gains,
            stopping_threshold,
            metrics,
            efficiency,
        }
    }
}

impl Default for SequencingEngine {
    fn default() -> Self {
        Self::new(EnginePolicy::default())
    }
}
