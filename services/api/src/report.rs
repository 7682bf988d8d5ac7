use crate::infra::{InMemoryLeadDirectory, InMemoryResultCache};
use chrono::Utc;
use clap::Args;
use reachiq::config::AppConfig;
use reachiq::error::AppError;
use reachiq::outreach::analytics::OutreachAnalyticsService;
use reachiq::outreach::sequencing::{DecisionTree, GrowthCurveResult, SequencingEngine};
use reachiq::outreach::signals::LeadId;
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Lead (buyer) identifier to analyze
    #[arg(long)]
    pub(crate) lead_id: String,
    /// CSV file with lead signals (defaults to APP_LEADS_CSV, then demo leads)
    #[arg(long)]
    pub(crate) leads_csv: Option<PathBuf>,
    /// Also print the decision tree
    #[arg(long)]
    pub(crate) tree: bool,
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let csv = args.leads_csv.or(config.engine.leads_csv.clone());
    let directory = InMemoryLeadDirectory::load(csv.as_deref())?;

    let service = OutreachAnalyticsService::new(
        Arc::new(directory),
        Arc::new(InMemoryResultCache::default()),
        SequencingEngine::new(config.engine.policy.clone()),
        config.engine.cache_ttl(),
    );
    let analysis = service.analysis(&LeadId(args.lead_id), Utc::now())?;

    let tree = args.tree.then_some(&analysis.decision_tree);
    print!("{}", render_report(&analysis.growth_curve, tree));
    Ok(())
}

pub(crate) fn render_report(result: &GrowthCurveResult, tree: Option<&DecisionTree>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Outreach sequence for {}", result.lead_id);
    let _ = writeln!(
        out,
        "{:<6} {:<22} {:>10} {:>10} {:>12}",
        "Step", "Touch", "Response", "Cumulative", "Marginal"
    );

    for (index, step) in result.steps.iter().enumerate() {
        let cumulative = result
            .metrics
            .cumulative_probability
            .get(index)
            .copied()
            .unwrap_or(0.0);
        let marginal = index
            .checked_sub(1)
            .and_then(|previous| result.marginal_gains.get(previous))
            .map(|gain| format!("{:+.1}%", gain * 100.0))
            .unwrap_or_else(|| "-".to_string());
        let marker = if step.step == result.optimal_stopping_point {
            "  <- stop"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:<6} {:<22} {:>9.1}% {:>9.1}% {:>12}{}",
            step.step,
            step.display_name,
            step.probability * 100.0,
            cumulative * 100.0,
            marginal,
            marker
        );
    }

    let _ = writeln!(out, "\n{}", result.stopping_reason);
    let _ = writeln!(
        out,
        "Expected response: {:.1}% | ROI score: {:.2} | Steps saved: {} of {} | Threshold: {:.1}%",
        result.expected_total_response_probability * 100.0,
        result.roi_score,
        result.metrics.steps_saved,
        result.metrics.total_steps,
        result.stopping_threshold * 100.0
    );

    if let Some(tree) = tree {
        let _ = writeln!(out, "\nDecision tree");
        for node in &tree.nodes {
            let _ = writeln!(
                out,
                "  [{}] {} ({}, {:.0}%): {}",
                node.step_number, node.label, node.channel, node.probability, node.optimization_insight
            );
        }
        for edge in &tree.edges {
            let _ = writeln!(out, "  {} -> {} ({})", edge.source, edge.target, edge.label);
        }
    }

    out
}
