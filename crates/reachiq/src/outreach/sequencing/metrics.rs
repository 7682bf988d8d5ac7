use super::domain::{GrowthMetrics, SequenceEfficiency, SequenceStep};

/// Probability of at least one response by each step, treating every touch
/// as an independent trial: `1 - Π(1 - p_j)`.
pub(crate) fn cumulative_probability(steps: &[SequenceStep]) -> Vec<f64> {
    let mut no_response = 1.0;
    steps
        .iter()
        .map(|step| {
            no_response *= 1.0 - step.probability.clamp(0.0, 1.0);
            (1.0 - no_response).clamp(0.0, 1.0)
        })
        .collect()
}

/// Captured probability relative to the share of the sequence spent, capped at 1.
pub(crate) fn roi_score(expected: f64, optimal_step: usize, total_steps: usize) -> f64 {
    if optimal_step == 0 || total_steps == 0 {
        return 0.0;
    }
    let effort_share = optimal_step as f64 / total_steps as f64;
    (expected / effort_share).clamp(0.0, 1.0)
}

pub(crate) fn aggregate(
    cumulative: Vec<f64>,
    gains: &[f64],
    optimal_step: usize,
) -> GrowthMetrics {
    let total_steps = cumulative.len();
    let optimal_probability = optimal_step
        .checked_sub(1)
        .and_then(|index| cumulative.get(index))
        .copied()
        .unwrap_or(0.0);
    let steps_saved = total_steps.saturating_sub(optimal_step);

    GrowthMetrics {
        optimal_probability,
        diminishing_returns_rate: diminishing_returns_rate(gains, optimal_step),
        wasted_effort_ratio: if total_steps == 0 {
            0.0
        } else {
            steps_saved as f64 / total_steps as f64
        },
        efficiency_score: if optimal_step == 0 {
            0.0
        } else {
            optimal_probability / optimal_step as f64
        },
        total_steps,
        steps_saved,
        cumulative_probability: cumulative,
    }
}

/// Mean size of the declines among the gains from the stopping point onward.
fn diminishing_returns_rate(gains: &[f64], optimal_step: usize) -> f64 {
    let start = optimal_step.saturating_sub(1).min(gains.len());
    let declines: Vec<f64> = gains[start..]
        .iter()
        .filter(|gain| **gain < 0.0)
        .map(|gain| -gain)
        .collect();

    if declines.is_empty() {
        0.0
    } else {
        declines.iter().sum::<f64>() / declines.len() as f64
    }
}

/// Efficiency of the cumulative curve per unit of effort. Missing or
/// non-positive costs count as one unit.
pub fn analyze_efficiency(cumulative: &[f64], costs: &[f64]) -> SequenceEfficiency {
    let mut cumulative_cost = Vec::with_capacity(cumulative.len());
    let mut efficiency_ratio = Vec::with_capacity(cumulative.len());
    let mut running_cost = 0.0;

    for (index, probability) in cumulative.iter().enumerate() {
        let cost = costs
            .get(index)
            .copied()
            .filter(|cost| cost.is_finite() && *cost > 0.0)
            .unwrap_or(1.0);
        running_cost += cost;
        cumulative_cost.push(running_cost);
        efficiency_ratio.push(probability / running_cost);
    }

    let (most_efficient_step, max_efficiency) = efficiency_ratio
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (index, ratio)| {
            if ratio > best.1 {
                (index + 1, ratio)
            } else {
                best
            }
        });

    SequenceEfficiency {
        cumulative_cost,
        efficiency_ratio,
        most_efficient_step,
        max_efficiency: if max_efficiency.is_finite() {
            max_efficiency
        } else {
            0.0
        },
    }
}
