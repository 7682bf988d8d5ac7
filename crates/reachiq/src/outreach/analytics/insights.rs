use std::collections::BTreeMap;

use serde::Serialize;

use crate::outreach::sequencing::GrowthCurveResult;
use crate::outreach::signals::IntentBand;

/// Portfolio-level view of where sequences tend to stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationInsights {
    pub average_optimal_step: f64,
    pub most_common_stopping_point: usize,
    pub average_roi_score: f64,
    pub total_predictions: usize,
    pub insights: Vec<BandInsight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandInsight {
    pub category: &'static str,
    pub band: IntentBand,
    pub leads: usize,
    pub average_stopping_point: f64,
    /// Mean expected response probability at the stopping point.
    pub conversion_rate: f64,
}

/// Summarize analyzed leads. Bands without any lead are left out.
pub fn summarize(results: &[(IntentBand, GrowthCurveResult)]) -> OptimizationInsights {
    let stops: Vec<usize> = results
        .iter()
        .map(|(_, result)| result.optimal_stopping_point)
        .collect();

    let insights = IntentBand::ALL
        .iter()
        .filter_map(|band| {
            let members: Vec<&GrowthCurveResult> = results
                .iter()
                .filter(|(candidate, _)| candidate == band)
                .map(|(_, result)| result)
                .collect();
            if members.is_empty() {
                return None;
            }
            Some(BandInsight {
                category: band.label(),
                band: *band,
                leads: members.len(),
                average_stopping_point: mean(
                    members.iter().map(|r| r.optimal_stopping_point as f64),
                ),
                conversion_rate: mean(
                    members
                        .iter()
                        .map(|r| r.expected_total_response_probability),
                ),
            })
        })
        .collect();

    OptimizationInsights {
        average_optimal_step: mean(stops.iter().map(|step| *step as f64)),
        most_common_stopping_point: mode(&stops),
        average_roi_score: mean(results.iter().map(|(_, result)| result.roi_score)),
        total_predictions: results.len(),
        insights,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Most frequent value; ties go to the smaller step. Zero when empty.
fn mode(values: &[usize]) -> usize {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(*value).or_default() += 1;
    }
    counts
        .into_iter()
        .fold((0, 0), |best, (value, count)| {
            if count > best.1 {
                (value, count)
            } else {
                best
            }
        })
        .0
}
