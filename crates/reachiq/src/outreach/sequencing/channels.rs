use std::collections::HashSet;

use serde::Serialize;

use super::domain::StepType;
use crate::outreach::signals::ChannelEffectiveness;

pub(crate) const DEFAULT_CHANNEL: &str = "Email";
pub(crate) const DEFAULT_COLOR: &str = "#94A3B8";

const SYNTHESIZED_SHARE: f64 = 0.7;
const SYNTHESIZED_FLOOR: f64 = 10.0;
const FALLBACK_CHANNELS: [&str; 3] = ["LinkedIn", "Email", "Phone"];

/// A channel with its effectiveness normalized to [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelProfile {
    pub name: String,
    pub value: f64,
    pub color: String,
    pub effectiveness: f64,
    pub synthesized: bool,
}

impl ChannelProfile {
    fn from_entry(entry: &ChannelEffectiveness) -> Self {
        let value = if entry.value.is_finite() {
            entry.value.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let color = if entry.color.is_empty() {
            DEFAULT_COLOR.to_string()
        } else {
            entry.color.clone()
        };
        Self {
            name: entry.name.clone(),
            value,
            color,
            effectiveness: value / 100.0,
            synthesized: false,
        }
    }

    fn synthesized(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            color: DEFAULT_COLOR.to_string(),
            effectiveness: value / 100.0,
            synthesized: true,
        }
    }
}

/// Ordered channel set shared by the growth curve and the decision tree.
///
/// Always holds at least two channels, primary first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelModel {
    channels: Vec<ChannelProfile>,
}

impl ChannelModel {
    pub fn from_channels(entries: &[ChannelEffectiveness]) -> Self {
        let mut channels: Vec<ChannelProfile> = entries
            .iter()
            .filter(|entry| !entry.name.trim().is_empty())
            .map(ChannelProfile::from_entry)
            .collect();
        // Stable: equal values keep their supplied order.
        channels.sort_by(|a, b| b.value.total_cmp(&a.value));
        // Names are case-insensitive; the strongest entry wins.
        let mut seen = HashSet::new();
        channels.retain(|channel| seen.insert(channel.name.trim().to_ascii_lowercase()));

        if channels.is_empty() {
            channels.push(ChannelProfile::from_entry(&ChannelEffectiveness::new(
                DEFAULT_CHANNEL,
                0.0,
            )));
        }

        if channels.len() < 2 {
            let primary = &channels[0];
            let name = FALLBACK_CHANNELS
                .iter()
                .copied()
                .find(|candidate| !candidate.eq_ignore_ascii_case(&primary.name))
                .unwrap_or("Phone");
            let value = (primary.value * SYNTHESIZED_SHARE).max(SYNTHESIZED_FLOOR);
            channels.push(ChannelProfile::synthesized(name, value));
        }

        Self { channels }
    }

    pub fn channels(&self) -> &[ChannelProfile] {
        &self.channels
    }

    pub fn primary(&self) -> &ChannelProfile {
        &self.channels[0]
    }

    pub fn secondary(&self) -> &ChannelProfile {
        &self.channels[1]
    }

    /// Channel and touch type for a 1-indexed step. The schedule cycles
    /// through the channels in order, so two channels alternate.
    pub fn channel_for_step(&self, step: usize) -> (&ChannelProfile, StepType) {
        let index = step.saturating_sub(1);
        let channel = &self.channels[index % self.channels.len()];
        let step_type = if index < self.channels.len() {
            StepType::Initial
        } else {
            StepType::Followup
        };
        (channel, step_type)
    }
}
