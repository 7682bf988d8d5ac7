use super::domain::SequenceStep;

/// Raw step-over-step deltas, `probability[i + 1] - probability[i]`.
///
/// Negative values are kept: a later touch being weaker than the previous
/// one is exactly what the stopping rule looks for.
pub(crate) fn marginal_gains(steps: &[SequenceStep]) -> Vec<f64> {
    steps
        .windows(2)
        .map(|pair| pair[1].probability - pair[0].probability)
        .collect()
}
