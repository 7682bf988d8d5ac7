use crate::outreach::sequencing::{DecayModel, EnginePolicy, SequencingEngine, StoppingThreshold};
use crate::outreach::signals::{ChannelEffectiveness, LeadId, OutreachSignals};

pub(super) const TOLERANCE: f64 = 1e-9;

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn assert_all_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "length mismatch: {actual:?}");
    for (actual, expected) in actual.iter().zip(expected) {
        assert_close(*actual, *expected);
    }
}

/// Four steps with a hand-picked decay table and a fixed 5% cutoff.
pub(super) fn fixture_policy() -> EnginePolicy {
    EnginePolicy::new(
        4,
        DecayModel::Table {
            factors: vec![1.0, 0.85, 0.6, 0.4],
        },
        StoppingThreshold::Fixed { value: 0.05 },
    )
    .expect("fixture policy is valid")
}

pub(super) fn fixture_engine() -> SequencingEngine {
    SequencingEngine::new(fixture_policy())
}

pub(super) fn signals(channels: &[(&str, f64)]) -> OutreachSignals {
    OutreachSignals {
        buyer_id: LeadId::from("lead-001"),
        intent_score: 50.0,
        linkedin_engagement: 0.3,
        groups: None,
        previous_channel: String::new(),
        channels: channels
            .iter()
            .map(|(name, value)| ChannelEffectiveness::new(*name, *value))
            .collect(),
    }
}

/// Email 90 / LinkedIn 60, the lead used throughout the engine tests.
pub(super) fn email_first_signals() -> OutreachSignals {
    signals(&[("Email", 90.0), ("LinkedIn", 60.0)])
}
