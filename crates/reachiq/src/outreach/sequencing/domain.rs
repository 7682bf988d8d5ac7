use serde::{Deserialize, Serialize};

use crate::outreach::signals::LeadId;

/// Whether a step is the first touch on its channel or a repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Initial,
    Followup,
}

impl StepType {
    pub const fn label(self) -> &'static str {
        match self {
            StepType::Initial => "Initial",
            StepType::Followup => "Follow-up",
        }
    }
}

/// One touch in the predicted sequence. All probabilities lie in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub step: usize,
    pub channel: String,
    pub display_name: String,
    pub step_type: StepType,
    pub is_primary_channel: bool,
    pub base_probability: f64,
    pub decay_factor: f64,
    pub decay_adjusted: f64,
    pub channel_effectiveness: f64,
    pub probability: f64,
}

/// Summary scores rolled up from the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetrics {
    pub cumulative_probability: Vec<f64>,
    pub optimal_probability: f64,
    pub diminishing_returns_rate: f64,
    pub wasted_effort_ratio: f64,
    pub efficiency_score: f64,
    pub total_steps: usize,
    pub steps_saved: usize,
}

/// Cost-adjusted view of the cumulative curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceEfficiency {
    pub cumulative_cost: Vec<f64>,
    pub efficiency_ratio: Vec<f64>,
    pub most_efficient_step: usize,
    pub max_efficiency: f64,
}

/// Linear analysis served by `GET /analytics/growth-curve/{lead_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthCurveResult {
    pub lead_id: LeadId,
    pub steps: Vec<SequenceStep>,
    pub optimal_stopping_point: usize,
    pub stopping_reason: String,
    pub expected_total_response_probability: f64,
    pub roi_score: f64,
    pub marginal_gains: Vec<f64>,
    pub stopping_threshold: f64,
    pub metrics: GrowthMetrics,
    pub efficiency: SequenceEfficiency,
}
