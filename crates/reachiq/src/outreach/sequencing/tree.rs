use serde::{Deserialize, Serialize};

use super::channels::ChannelModel;
use crate::outreach::signals::OutreachSignals;

const PRIMARY_WEIGHT: f64 = 0.12;
const FOLLOWUP_WEIGHT: f64 = 0.08;
const CONVERSION_WEIGHT: f64 = 0.06;
const NO_RESPONSE_WEIGHT: f64 = 0.05;

const HIGH_ENGAGEMENT: f64 = 0.6;
const HIGH_INTENT: f64 = 70.0;
const WEAK_PRIMARY: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Completed,
    Current,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionNode {
    pub id: String,
    pub label: String,
    pub channel: String,
    /// Percentage on a 0-100 scale.
    pub probability: f64,
    pub status: NodeStatus,
    pub step_number: usize,
    pub expected_response: String,
    /// Coarse display heuristic, not the sequence marginal gain.
    pub marginal_gain: i64,
    pub optimization_insight: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
}

/// Branching view of the outreach plan: one root, two leaves, no cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<DecisionNode>,
    pub edges: Vec<DecisionEdge>,
}

impl DecisionTree {
    pub fn node(&self, id: &str) -> Option<&DecisionNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Nodes without incoming edges.
    pub fn roots(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| !self.edges.iter().any(|edge| edge.target == node.id))
            .map(|node| node.id.as_str())
            .collect()
    }

    /// Nodes without outgoing edges.
    pub fn leaves(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| !self.edges.iter().any(|edge| edge.source == node.id))
            .map(|node| node.id.as_str())
            .collect()
    }
}

pub(crate) fn build_tree(model: &ChannelModel, signals: &OutreachSignals) -> DecisionTree {
    let primary = model.primary();
    let secondary = model.secondary();
    let conversion = (primary.value + secondary.value) / 2.0;
    let no_response = (100.0 - primary.value).clamp(0.0, 100.0);

    let nodes = vec![
        DecisionNode {
            id: "buyer".to_string(),
            label: "Lead".to_string(),
            channel: "Signals".to_string(),
            probability: 100.0,
            status: NodeStatus::Completed,
            step_number: 0,
            expected_response: "Signals collected and lead qualified".to_string(),
            marginal_gain: 0,
            optimization_insight: format!(
                "Intent score {:.0}/100 with {:.0}% network engagement",
                signals.intent_score,
                signals.linkedin_engagement * 100.0
            ),
        },
        DecisionNode {
            id: "primary".to_string(),
            label: format!("{} Outreach", primary.name),
            channel: primary.name.clone(),
            probability: primary.value,
            status: NodeStatus::Current,
            step_number: 1,
            expected_response: format!(
                "{:.0}% chance of a reply to the first {} touch",
                primary.value, primary.name
            ),
            marginal_gain: weighted(primary.value, PRIMARY_WEIGHT),
            optimization_insight: primary_insight(&primary.name, signals),
        },
        DecisionNode {
            id: "followup".to_string(),
            label: format!("{} Follow-up", secondary.name),
            channel: secondary.name.clone(),
            probability: secondary.value,
            status: NodeStatus::Pending,
            step_number: 2,
            expected_response: format!(
                "{:.0}% chance of a reply once the lead responds on {}",
                secondary.value, primary.name
            ),
            marginal_gain: weighted(secondary.value, FOLLOWUP_WEIGHT),
            optimization_insight: followup_insight(&primary.name, &secondary.name, signals),
        },
        DecisionNode {
            id: "conversion".to_string(),
            label: "Conversion".to_string(),
            channel: secondary.name.clone(),
            probability: conversion,
            status: NodeStatus::Pending,
            step_number: 3,
            expected_response: format!("{conversion:.0}% chance of booking a meeting"),
            marginal_gain: weighted(conversion, CONVERSION_WEIGHT),
            optimization_insight: conversion_insight(signals),
        },
        DecisionNode {
            id: "no-response".to_string(),
            label: "No Response".to_string(),
            channel: primary.name.clone(),
            probability: no_response,
            status: NodeStatus::Pending,
            step_number: 2,
            expected_response: format!("{no_response:.0}% chance the lead stays silent"),
            marginal_gain: weighted(no_response, NO_RESPONSE_WEIGHT),
            optimization_insight: if primary.value < WEAK_PRIMARY {
                format!(
                    "{} is a weak opener for this lead; test a different first channel",
                    primary.name
                )
            } else {
                "Pause instead of adding touches; later steps lose effectiveness quickly"
                    .to_string()
            },
        },
        DecisionNode {
            id: "stop".to_string(),
            label: "Stop".to_string(),
            channel: "None".to_string(),
            probability: no_response,
            status: NodeStatus::Pending,
            step_number: 3,
            expected_response: "Sequence ends without a reply".to_string(),
            marginal_gain: 0,
            optimization_insight: "Re-engage only when new intent signals arrive".to_string(),
        },
    ];

    let edges = vec![
        edge("buyer", "primary", "Start outreach"),
        edge("primary", "followup", "Responded"),
        edge("followup", "conversion", "Engaged"),
        edge("primary", "no-response", "No reply"),
        edge("no-response", "stop", "Stop"),
    ];

    DecisionTree { nodes, edges }
}

fn weighted(probability: f64, weight: f64) -> i64 {
    (probability * weight).round() as i64
}

fn edge(source: &str, target: &str, label: &str) -> DecisionEdge {
    DecisionEdge {
        id: format!("{source}-{target}"),
        source: source.to_string(),
        target: target.to_string(),
        label: label.to_string(),
    }
}

fn primary_insight(primary: &str, signals: &OutreachSignals) -> String {
    if let Some(groups) = &signals.groups {
        format!("Reference shared membership in {groups} in the opening {primary} message")
    } else if signals.linkedin_engagement >= HIGH_ENGAGEMENT {
        format!(
            "Network engagement is high ({:.0}%); open on {primary} while attention is warm",
            signals.linkedin_engagement * 100.0
        )
    } else {
        format!("Lead with a short {primary} message tied to a current business trigger")
    }
}

fn followup_insight(primary: &str, secondary: &str, signals: &OutreachSignals) -> String {
    let previous = signals.previous_channel.to_ascii_lowercase();
    if !previous.is_empty() && previous.contains(&secondary.to_ascii_lowercase()) {
        format!("Prior responses on {secondary} make it the natural follow-up channel")
    } else {
        format!("Switch to {secondary} for the follow-up to avoid fatigue on {primary}")
    }
}

fn conversion_insight(signals: &OutreachSignals) -> String {
    if signals.intent_score >= HIGH_INTENT {
        format!(
            "High intent ({:.0}); propose a meeting time directly in the follow-up",
            signals.intent_score
        )
    } else {
        "Share a relevant case study before asking for a meeting".to_string()
    }
}
