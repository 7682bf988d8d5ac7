use serde::{Deserialize, Serialize};

pub const DEFAULT_TOTAL_STEPS: usize = 4;
pub const MAX_TOTAL_STEPS: usize = 12;
pub const BASE_DECAY_RATE: f64 = 0.3;
pub const BASE_STOPPING_THRESHOLD: f64 = 0.05;

const MIN_SCALED_THRESHOLD: f64 = 0.01;
const MAX_SCALED_THRESHOLD: f64 = 0.15;
const INTENT_THRESHOLD_WEIGHT: f64 = 0.02;
const ENGAGEMENT_THRESHOLD_WEIGHT: f64 = 0.015;

const MIN_SCALED_DECAY_RATE: f64 = 0.05;
const MAX_SCALED_DECAY_RATE: f64 = 0.8;
const ENGAGEMENT_DECAY_WEIGHT: f64 = 0.2;
const INTENT_DECAY_WEIGHT: f64 = 0.1;

/// Contact-fatigue curve applied to each successive step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecayModel {
    /// `(1 - rate)^(step - 1)`.
    Geometric { rate: f64 },
    /// Explicit per-step multipliers, indexed from step 1.
    Table { factors: Vec<f64> },
    /// `exp(-rate * (step - 1))` where the rate starts from `base` and drops
    /// for engaged, high-intent leads so their later touches hold up longer.
    EngagementScaled { base: f64 },
}

impl DecayModel {
    /// Multiplier for a 1-indexed step. An unresolved engagement-scaled
    /// model decays at its unadjusted base rate.
    pub fn factor(&self, step: usize) -> f64 {
        let index = step.saturating_sub(1);
        match self {
            DecayModel::Geometric { rate } => (1.0 - rate).powi(index as i32),
            DecayModel::EngagementScaled { base } => {
                (-clamp_decay_rate(*base) * index as f64).exp()
            }
            DecayModel::Table { factors } => factors
                .get(index)
                .or_else(|| factors.last())
                .copied()
                .unwrap_or(0.0),
        }
    }

    /// Fix the curve for one lead. `intent_score` is on the 0-100 scale,
    /// `engagement` on 0-1. Geometric and table models are returned as is.
    pub fn resolve(&self, intent_score: f64, engagement: f64) -> DecayModel {
        match self {
            DecayModel::EngagementScaled { base } => {
                let intent = (intent_score / 100.0).clamp(0.0, 1.0);
                let engagement = engagement.clamp(0.0, 1.0);
                let rate = clamp_decay_rate(
                    base - ENGAGEMENT_DECAY_WEIGHT * engagement - INTENT_DECAY_WEIGHT * intent,
                );
                DecayModel::EngagementScaled { base: rate }
            }
            other => other.clone(),
        }
    }

    fn validate(&self, total_steps: usize) -> Result<(), PolicyError> {
        match self {
            DecayModel::EngagementScaled { base } => {
                if !(base.is_finite() && *base > 0.0 && *base <= 1.0) {
                    return Err(PolicyError::DecayBase(*base));
                }
            }
            DecayModel::Geometric { rate } => {
                if !(rate.is_finite() && *rate > 0.0 && *rate < 1.0) {
                    return Err(PolicyError::DecayRate(*rate));
                }
            }
            DecayModel::Table { factors } => {
                if factors.len() < total_steps {
                    return Err(PolicyError::DecayTableTooShort {
                        required: total_steps,
                        actual: factors.len(),
                    });
                }
                let mut previous = f64::INFINITY;
                for (index, value) in factors.iter().copied().enumerate() {
                    let in_range = value.is_finite() && value > 0.0 && value <= 1.0;
                    if !in_range || value >= previous {
                        return Err(PolicyError::DecayFactor {
                            step: index + 1,
                            value,
                        });
                    }
                    previous = value;
                }
            }
        }
        Ok(())
    }
}

fn clamp_decay_rate(rate: f64) -> f64 {
    rate.clamp(MIN_SCALED_DECAY_RATE, MAX_SCALED_DECAY_RATE)
}

/// How the marginal-gain cutoff is chosen for a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoppingThreshold {
    Fixed { value: f64 },
    /// Starts from `base` and lowers the bar for high-intent, highly engaged
    /// leads so their sequences run longer.
    IntentScaled { base: f64 },
}

impl StoppingThreshold {
    /// `intent_score` is on the 0-100 scale, `engagement` on 0-1.
    pub fn resolve(&self, intent_score: f64, engagement: f64) -> f64 {
        match self {
            StoppingThreshold::Fixed { value } => *value,
            StoppingThreshold::IntentScaled { base } => {
                let intent = (intent_score / 100.0).clamp(0.0, 1.0);
                let engagement = engagement.clamp(0.0, 1.0);
                (base
                    - INTENT_THRESHOLD_WEIGHT * intent
                    - ENGAGEMENT_THRESHOLD_WEIGHT * engagement)
                    .clamp(MIN_SCALED_THRESHOLD, MAX_SCALED_THRESHOLD)
            }
        }
    }

    fn validate(&self) -> Result<(), PolicyError> {
        let value = match self {
            StoppingThreshold::Fixed { value } => *value,
            StoppingThreshold::IntentScaled { base } => *base,
        };
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(PolicyError::StoppingThreshold(value))
        }
    }
}

/// Validated sequencing parameters. Construct through [`EnginePolicy::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnginePolicy {
    total_steps: usize,
    decay: DecayModel,
    stopping_threshold: StoppingThreshold,
}

impl EnginePolicy {
    pub fn new(
        total_steps: usize,
        decay: DecayModel,
        stopping_threshold: StoppingThreshold,
    ) -> Result<Self, PolicyError> {
        if !(2..=MAX_TOTAL_STEPS).contains(&total_steps) {
            return Err(PolicyError::TotalSteps {
                actual: total_steps,
                max: MAX_TOTAL_STEPS,
            });
        }
        decay.validate(total_steps)?;
        stopping_threshold.validate()?;

        Ok(Self {
            total_steps,
            decay,
            stopping_threshold,
        })
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn decay(&self) -> &DecayModel {
        &self.decay
    }

    pub fn stopping_threshold(&self) -> &StoppingThreshold {
        &self.stopping_threshold
    }

    /// Canonical string used to key cached results.
    pub fn fingerprint(&self) -> String {
        let decay = match &self.decay {
            DecayModel::Geometric { rate } => format!("geometric:{rate}"),
            DecayModel::Table { factors } => {
                let factors: Vec<String> = factors.iter().map(f64::to_string).collect();
                format!("table:{}", factors.join(","))
            }
            DecayModel::EngagementScaled { base } => format!("engagement:{base}"),
        };
        let threshold = match &self.stopping_threshold {
            StoppingThreshold::Fixed { value } => format!("fixed:{value}"),
            StoppingThreshold::IntentScaled { base } => format!("intent:{base}"),
        };
        format!("n={};decay={decay};threshold={threshold}", self.total_steps)
    }
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            total_steps: DEFAULT_TOTAL_STEPS,
            decay: DecayModel::EngagementScaled {
                base: BASE_DECAY_RATE,
            },
            stopping_threshold: StoppingThreshold::IntentScaled {
                base: BASE_STOPPING_THRESHOLD,
            },
        }
    }
}

/// Policy parameters rejected at configuration time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("total steps must be between 2 and {max}, got {actual}")]
    TotalSteps { actual: usize, max: usize },
    #[error("decay rate must lie strictly between 0 and 1, got {0}")]
    DecayRate(f64),
    #[error("engagement-scaled decay base must lie in (0, 1], got {0}")]
    DecayBase(f64),
    #[error("decay table needs at least {required} factors, got {actual}")]
    DecayTableTooShort { required: usize, actual: usize },
    #[error("decay factor {value} at step {step} must lie in (0, 1] and be lower than the previous step")]
    DecayFactor { step: usize, value: f64 },
    #[error("stopping threshold must lie within [0, 1], got {0}")]
    StoppingThreshold(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometric_decay_is_strictly_decreasing() {
        let decay = DecayModel::Geometric { rate: 0.2 };
        let factors: Vec<f64> = (1..=6).map(|step| decay.factor(step)).collect();
        assert!((factors[0] - 1.0).abs() < 1e-12);
        assert!((factors[1] - 0.8).abs() < 1e-12);
        assert!(factors.windows(2).all(|pair| pair[1] < pair[0]));
    }

    #[test]
    fn engaged_leads_decay_more_slowly() {
        let decay = EnginePolicy::default().decay().clone();
        let cold = decay.resolve(0.0, 0.0);
        let hot = decay.resolve(100.0, 1.0);

        let cold_factors: Vec<f64> = (1..=4).map(|step| cold.factor(step)).collect();
        let hot_factors: Vec<f64> = (1..=4).map(|step| hot.factor(step)).collect();

        assert_eq!(cold, DecayModel::EngagementScaled { base: 0.3 });
        assert_eq!(hot, DecayModel::EngagementScaled { base: 0.05 });
        assert!((cold_factors[1] - (-0.3f64).exp()).abs() < 1e-12);
        assert!((hot_factors[3] - (-0.15f64).exp()).abs() < 1e-12);
        for step in 1..4 {
            assert!(hot_factors[step] > cold_factors[step]);
            assert!(hot_factors[step] < hot_factors[step - 1]);
            assert!(cold_factors[step] < cold_factors[step - 1]);
        }
    }

    #[test]
    fn scaled_decay_rate_is_clamped() {
        let rate = |model: DecayModel| match model {
            DecayModel::EngagementScaled { base } => base,
            other => panic!("expected engagement-scaled decay, got {other:?}"),
        };
        let decay = DecayModel::EngagementScaled { base: 1.0 };
        assert!((rate(decay.resolve(0.0, 0.0)) - 0.8).abs() < 1e-12);
        assert!((rate(decay.resolve(250.0, 1.0)) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn scaled_decay_base_must_be_positive() {
        let err = EnginePolicy::new(
            4,
            DecayModel::EngagementScaled { base: 0.0 },
            StoppingThreshold::Fixed { value: 0.05 },
        )
        .expect_err("zero base rejected");
        assert_eq!(err, PolicyError::DecayBase(0.0));
    }

    #[test]
    fn table_decay_must_decrease() {
        let err = EnginePolicy::new(
            3,
            DecayModel::Table {
                factors: vec![1.0, 0.9, 0.9],
            },
            StoppingThreshold::Fixed { value: 0.05 },
        )
        .expect_err("flat table rejected");
        assert_eq!(
            err,
            PolicyError::DecayFactor {
                step: 3,
                value: 0.9
            }
        );
    }

    #[test]
    fn table_decay_must_cover_every_step() {
        let err = EnginePolicy::new(
            4,
            DecayModel::Table {
                factors: vec![1.0, 0.5],
            },
            StoppingThreshold::Fixed { value: 0.05 },
        )
        .expect_err("short table rejected");
        assert_eq!(
            err,
            PolicyError::DecayTableTooShort {
                required: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_single_step_sequences() {
        let err = EnginePolicy::new(
            1,
            DecayModel::Geometric { rate: 0.2 },
            StoppingThreshold::Fixed { value: 0.05 },
        )
        .expect_err("one step is not a sequence");
        assert!(matches!(err, PolicyError::TotalSteps { actual: 1, .. }));
    }

    #[test]
    fn higher_intent_lowers_the_scaled_threshold() {
        let threshold = StoppingThreshold::IntentScaled { base: 0.05 };
        let cold = threshold.resolve(20.0, 0.1);
        let hot = threshold.resolve(95.0, 0.1);
        assert!(hot < cold);
        assert!((cold - (0.05 - 0.004 - 0.0015)).abs() < 1e-12);
    }

    #[test]
    fn scaled_threshold_is_clamped() {
        let threshold = StoppingThreshold::IntentScaled { base: 0.0 };
        assert!((threshold.resolve(100.0, 1.0) - 0.01).abs() < 1e-12);
        let threshold = StoppingThreshold::IntentScaled { base: 1.0 };
        assert!((threshold.resolve(0.0, 0.0) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn fingerprint_distinguishes_policies() {
        let default = EnginePolicy::default();
        let fixed = EnginePolicy::new(
            4,
            DecayModel::Geometric { rate: 0.2 },
            StoppingThreshold::Fixed { value: 0.05 },
        )
        .expect("valid policy");
        assert_ne!(default.fingerprint(), fixed.fingerprint());
        assert_eq!(default.fingerprint(), EnginePolicy::default().fingerprint());
    }
}
