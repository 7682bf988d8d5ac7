use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for leads (buyers) pursued through outreach.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub String);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LeadId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Observed or predicted effectiveness of one outreach channel, on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEffectiveness {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub color: String,
}

impl ChannelEffectiveness {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            color: String::new(),
        }
    }
}

/// Raw signal payload served by `GET /buyers/{lead_id}/outreach` and consumed
/// by the sequencing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachSignals {
    pub buyer_id: LeadId,
    pub intent_score: f64,
    pub linkedin_engagement: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
    #[serde(default)]
    pub previous_channel: String,
    #[serde(default)]
    pub channels: Vec<ChannelEffectiveness>,
}

impl OutreachSignals {
    /// Coerce loosely collected values into their documented ranges.
    ///
    /// Intent is clamped to 0-100, engagement to 0-1 and channel values to
    /// 0-100; non-finite numbers become zero. Channels without a name are
    /// dropped and blank group text is treated as absent.
    pub fn sanitized(mut self) -> Self {
        self.intent_score = clamp_finite(self.intent_score, 100.0);
        self.linkedin_engagement = clamp_finite(self.linkedin_engagement, 1.0);
        self.groups = self
            .groups
            .map(|groups| groups.trim().to_string())
            .filter(|groups| !groups.is_empty());
        self.previous_channel = self.previous_channel.trim().to_string();
        self.channels = self
            .channels
            .into_iter()
            .filter_map(|channel| {
                let name = channel.name.trim().to_string();
                if name.is_empty() {
                    return None;
                }
                Some(ChannelEffectiveness {
                    name,
                    value: clamp_finite(channel.value, 100.0),
                    color: channel.color.trim().to_string(),
                })
            })
            .collect();
        self
    }
}

fn clamp_finite(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

/// Behavioral engagement collected by the upstream signal system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementSignals {
    pub linkedin_engagement: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
    #[serde(default)]
    pub previous_channel: String,
}

/// A prospective company or contact. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub industry: String,
    pub location: String,
    pub intent_score: f64,
    pub engagement: EngagementSignals,
    pub channels: Vec<ChannelEffectiveness>,
}

impl Lead {
    pub fn outreach_signals(&self) -> OutreachSignals {
        OutreachSignals {
            buyer_id: self.id.clone(),
            intent_score: self.intent_score,
            linkedin_engagement: self.engagement.linkedin_engagement,
            groups: self.engagement.groups.clone(),
            previous_channel: self.engagement.previous_channel.clone(),
            channels: self.channels.clone(),
        }
        .sanitized()
    }

    pub fn intent_band(&self) -> IntentBand {
        IntentBand::from_score(self.intent_score)
    }
}

/// Coarse intent grouping used for portfolio-level insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentBand {
    High,
    Medium,
    Low,
}

impl IntentBand {
    pub const ALL: [IntentBand; 3] = [IntentBand::High, IntentBand::Medium, IntentBand::Low];

    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            IntentBand::High
        } else if score >= 40.0 {
            IntentBand::Medium
        } else {
            IntentBand::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            IntentBand::High => "High Intent",
            IntentBand::Medium => "Medium Intent",
            IntentBand::Low => "Low Intent",
        }
    }
}
