use super::domain::SequenceStep;

/// Recommended stop point and the explanation surfaced to users.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoppingDecision {
    pub optimal_step: usize,
    pub reason: String,
}

/// Stop at the first step `s >= 2` where continuing to `s + 1` gains less
/// than `threshold`. `gains[s - 1]` is that continuation gain; the gain into
/// step 2 is never a cutoff, so at least two touches always go out. Without
/// a qualifying gain the whole sequence runs.
pub(crate) fn select_stopping_point(
    steps: &[SequenceStep],
    gains: &[f64],
    threshold: f64,
) -> StoppingDecision {
    let total_steps = steps.len().max(1);

    let trigger = gains
        .iter()
        .copied()
        .enumerate()
        .skip(1)
        .find(|(_, gain)| *gain < threshold);

    match trigger {
        Some((index, gain)) => {
            let optimal_step = (index + 1).min(total_steps);
            let next = steps
                .get(optimal_step)
                .map(|step| step.display_name.as_str())
                .unwrap_or("the next touch");
            StoppingDecision {
                optimal_step,
                reason: format!(
                    "Stop after step {optimal_step}: continuing to step {} ({next}) changes response probability by {}, below the {} threshold.",
                    optimal_step + 1,
                    percent(gain),
                    percent(threshold),
                ),
            }
        }
        None => StoppingDecision {
            optimal_step: total_steps,
            reason: format!(
                "Continue through all {total_steps} steps: marginal gains stay at or above the {} threshold.",
                percent(threshold)
            ),
        },
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
