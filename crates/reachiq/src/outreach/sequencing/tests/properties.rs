use super::common::*;
use crate::outreach::sequencing::{
    DecayModel, EnginePolicy, GrowthCurveResult, SequencingEngine, StoppingThreshold,
};

const CHANNEL_VALUES: [f64; 6] = [0.0, 5.0, 15.0, 50.0, 90.0, 100.0];
const DECAY_RATES: [f64; 4] = [0.05, 0.2, 0.5, 0.9];
const SCALED_DECAY_BASES: [f64; 2] = [0.3, 1.0];
const INTENT_SCORES: [f64; 3] = [0.0, 45.0, 100.0];
const STEP_COUNTS: [usize; 4] = [2, 4, 7, 12];

fn decay_models() -> Vec<DecayModel> {
    DECAY_RATES
        .iter()
        .map(|rate| DecayModel::Geometric { rate: *rate })
        .chain(
            SCALED_DECAY_BASES
                .iter()
                .map(|base| DecayModel::EngagementScaled { base: *base }),
        )
        .collect()
}

fn sweep(mut check: impl FnMut(&GrowthCurveResult)) {
    for total_steps in STEP_COUNTS {
        for decay in decay_models() {
            let policy = EnginePolicy::new(
                total_steps,
                decay,
                StoppingThreshold::IntentScaled { base: 0.05 },
            )
            .expect("valid policy");
            let engine = SequencingEngine::new(policy);

            for primary in CHANNEL_VALUES {
                for secondary in CHANNEL_VALUES {
                    for intent in INTENT_SCORES {
                        let mut lead = signals(&[("Email", primary), ("LinkedIn", secondary)]);
                        lead.intent_score = intent;
                        check(&engine.growth_curve(&lead));
                    }
                }
            }
        }
    }
}

#[test]
fn cumulative_probability_is_monotone_and_bounded() {
    sweep(|result| {
        let cumulative = &result.metrics.cumulative_probability;
        assert_eq!(cumulative.len(), result.steps.len());
        assert!(cumulative.iter().all(|value| (0.0..=1.0).contains(value)));
        assert!(cumulative.windows(2).all(|pair| pair[1] >= pair[0]));
    });
}

#[test]
fn stopping_point_stays_within_the_sequence() {
    sweep(|result| {
        let total = result.steps.len();
        assert!((1..=total).contains(&result.optimal_stopping_point));
        assert_eq!(result.metrics.total_steps, total);
        assert_eq!(
            result.metrics.steps_saved,
            total - result.optimal_stopping_point
        );
        assert!((0.0..=1.0).contains(&result.roi_score));
        assert!((0.0..=1.0).contains(&result.expected_total_response_probability));
    });
}

#[test]
fn marginal_gains_are_exact_step_differences() {
    sweep(|result| {
        assert_eq!(result.marginal_gains.len(), result.steps.len() - 1);
        for (index, gain) in result.marginal_gains.iter().enumerate() {
            let expected = result.steps[index + 1].probability - result.steps[index].probability;
            assert_eq!(*gain, expected);
        }
    });
}

#[test]
fn first_gain_below_threshold_decides_the_stop() {
    sweep(|result| {
        let threshold = result.stopping_threshold;
        let first_low = result
            .marginal_gains
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, gain)| **gain < threshold)
            .map(|(index, _)| index + 1);

        match first_low {
            Some(step) => assert_eq!(result.optimal_stopping_point, step),
            None => assert_eq!(result.optimal_stopping_point, result.steps.len()),
        }
    });
}

#[test]
fn probabilities_respect_decay() {
    sweep(|result| {
        for step in &result.steps {
            assert!((0.0..=1.0).contains(&step.probability));
            assert!(step.probability <= step.base_probability + TOLERANCE);
        }
        assert!(result
            .steps
            .windows(2)
            .all(|pair| pair[1].decay_factor < pair[0].decay_factor));
    });
}
