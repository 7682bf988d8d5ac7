use super::domain::{ChannelEffectiveness, EngagementSignals, Lead, LeadId, OutreachSignals};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum LeadImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: usize, message: String },
}

impl std::fmt::Display for LeadImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadImportError::Io(err) => write!(f, "failed to read lead export: {}", err),
            LeadImportError::Csv(err) => write!(f, "invalid lead CSV data: {}", err),
            LeadImportError::Row { line, message } => {
                write!(f, "invalid lead row on line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for LeadImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeadImportError::Io(err) => Some(err),
            LeadImportError::Csv(err) => Some(err),
            LeadImportError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for LeadImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LeadImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads lead signal snapshots exported by the upstream collection system.
///
/// Expected headers: `buyer_id,name,industry,location,intent_score,
/// linkedin_engagement,groups,previous_channel,channels`. The `channels`
/// column holds `Name=Value[#color]` entries separated by `|`.
pub struct LeadImporter;

impl LeadImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Lead>, LeadImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Lead>, LeadImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut leads = Vec::new();
        let mut seen = HashSet::new();

        for (index, record) in csv_reader.deserialize::<LeadRow>().enumerate() {
            // Header occupies line 1.
            let line = index + 2;
            let row = record?;

            if row.buyer_id.is_empty() {
                return Err(LeadImportError::Row {
                    line,
                    message: "buyer_id is required".to_string(),
                });
            }
            if !seen.insert(row.buyer_id.clone()) {
                return Err(LeadImportError::Row {
                    line,
                    message: format!("duplicate buyer_id '{}'", row.buyer_id),
                });
            }

            let channels = match row.channels.as_deref() {
                Some(raw) => {
                    parse_channels(raw).map_err(|message| LeadImportError::Row { line, message })?
                }
                None => Vec::new(),
            };

            leads.push(row.into_lead(channels));
        }

        Ok(leads)
    }
}

#[derive(Debug, Deserialize)]
struct LeadRow {
    buyer_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    industry: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    intent_score: Option<f64>,
    #[serde(default)]
    linkedin_engagement: Option<f64>,
    #[serde(default)]
    groups: Option<String>,
    #[serde(default)]
    previous_channel: Option<String>,
    #[serde(default)]
    channels: Option<String>,
}

impl LeadRow {
    fn into_lead(self, channels: Vec<ChannelEffectiveness>) -> Lead {
        let signals = OutreachSignals {
            buyer_id: LeadId(self.buyer_id),
            intent_score: self.intent_score.unwrap_or(0.0),
            linkedin_engagement: self.linkedin_engagement.unwrap_or(0.0),
            groups: self.groups,
            previous_channel: self.previous_channel.unwrap_or_default(),
            channels,
        }
        .sanitized();

        let name = if self.name.is_empty() {
            signals.buyer_id.0.clone()
        } else {
            self.name
        };

        Lead {
            id: signals.buyer_id,
            name,
            industry: self.industry,
            location: self.location,
            intent_score: signals.intent_score,
            engagement: EngagementSignals {
                linkedin_engagement: signals.linkedin_engagement,
                groups: signals.groups,
                previous_channel: signals.previous_channel,
            },
            channels: signals.channels,
        }
    }
}

fn parse_channels(raw: &str) -> Result<Vec<ChannelEffectiveness>, String> {
    raw.split('|')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, rest) = entry
                .split_once('=')
                .ok_or_else(|| format!("channel entry '{entry}' must look like Name=Value"))?;
            let (value, color) = match rest.split_once('#') {
                Some((value, color)) => (value, format!("#{}", color.trim())),
                None => (rest, String::new()),
            };
            let value = value
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("channel '{}' has non-numeric value '{}'", name.trim(), value.trim()))?;

            Ok(ChannelEffectiveness {
                name: name.trim().to_string(),
                value,
                color,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_channel_entries_with_optional_colors() {
        let channels = parse_channels("Email=90#0A66C2 | LinkedIn=60").expect("channels parse");
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].name, "Email");
        assert_eq!(channels[0].color, "#0A66C2");
        assert_eq!(channels[1].value, 60.0);
        assert!(channels[1].color.is_empty());
    }

    #[test]
    fn rejects_channel_entries_without_values() {
        let err = parse_channels("Email").expect_err("missing value");
        assert!(err.contains("Name=Value"));
    }
}
