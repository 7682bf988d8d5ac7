use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use reachiq::outreach::analytics::{CacheError, CacheKey, CachedAnalysis, ResultCache};
use reachiq::outreach::signals::{
    ChannelEffectiveness, EngagementSignals, Lead, LeadId, LeadImportError, LeadImporter,
    SignalSource, SignalSourceError,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Lead directory held in process memory, seeded from CSV or demo data.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadDirectory {
    leads: Arc<Mutex<HashMap<LeadId, Lead>>>,
}

impl InMemoryLeadDirectory {
    pub(crate) fn from_leads(leads: Vec<Lead>) -> Self {
        let leads = leads.into_iter().map(|lead| (lead.id.clone(), lead)).collect();
        Self {
            leads: Arc::new(Mutex::new(leads)),
        }
    }

    /// Seed from `csv` when given, otherwise from [`demo_leads`].
    pub(crate) fn load(csv: Option<&Path>) -> Result<Self, LeadImportError> {
        let leads = match csv {
            Some(path) => LeadImporter::from_path(path)?,
            None => demo_leads(),
        };
        Ok(Self::from_leads(leads))
    }

    pub(crate) fn len(&self) -> usize {
        self.leads.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl SignalSource for InMemoryLeadDirectory {
    fn lead(&self, id: &LeadId) -> Result<Option<Lead>, SignalSourceError> {
        let guard = self
            .leads
            .lock()
            .map_err(|_| SignalSourceError::Unavailable("lead directory lock poisoned".into()))?;
        Ok(guard.get(id).cloned())
    }

    fn leads(&self) -> Result<Vec<Lead>, SignalSourceError> {
        let guard = self
            .leads
            .lock()
            .map_err(|_| SignalSourceError::Unavailable("lead directory lock poisoned".into()))?;
        let mut leads: Vec<Lead> = guard.values().cloned().collect();
        leads.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(leads)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryResultCache {
    entries: Arc<Mutex<HashMap<CacheKey, CachedAnalysis>>>,
}

impl ResultCache for InMemoryResultCache {
    fn get(&self, key: &CacheKey) -> Result<Option<CachedAnalysis>, CacheError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| CacheError::Unavailable("result cache lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn put(&self, key: CacheKey, entry: CachedAnalysis) -> Result<(), CacheError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| CacheError::Unavailable("result cache lock poisoned".into()))?;
        guard.insert(key, entry);
        Ok(())
    }
}

impl InMemoryResultCache {
    /// Drop entries stored before `cutoff`.
    pub(crate) fn evict_older_than(&self, cutoff: chrono::DateTime<Utc>) -> usize {
        match self.entries.lock() {
            Ok(mut guard) => {
                let before = guard.len();
                guard.retain(|_, entry| entry.stored_at >= cutoff);
                before - guard.len()
            }
            Err(_) => 0,
        }
    }
}

/// Sample leads used when no CSV seed is configured.
pub(crate) fn demo_leads() -> Vec<Lead> {
    vec![
        demo_lead(
            "BUY_1001",
            "Northwind Analytics",
            "Software",
            "Austin, TX",
            84.0,
            (0.72, Some("SaaS Revenue Leaders"), "LinkedIn InMail reply"),
            &[("LinkedIn", 78.0, "#0A66C2"), ("Email", 52.0, "#EA4335")],
        ),
        demo_lead(
            "BUY_1002",
            "Harbor Freight Systems",
            "Logistics",
            "Savannah, GA",
            58.0,
            (0.35, None, "Email"),
            &[("Email", 64.0, "#EA4335"), ("Phone", 41.0, "#10B981")],
        ),
        demo_lead(
            "BUY_1003",
            "Cobalt Health",
            "Healthcare",
            "Denver, CO",
            31.0,
            (0.12, None, ""),
            &[("Email", 38.0, "#EA4335")],
        ),
        demo_lead(
            "BUY_1004",
            "Brightline Manufacturing",
            "Industrial",
            "Columbus, OH",
            72.0,
            (0.48, Some("Plant Ops Network"), "Phone"),
            &[
                ("Phone", 69.0, "#10B981"),
                ("LinkedIn", 55.0, "#0A66C2"),
                ("Email", 47.0, "#EA4335"),
            ],
        ),
    ]
}

fn demo_lead(
    id: &str,
    name: &str,
    industry: &str,
    location: &str,
    intent_score: f64,
    engagement: (f64, Option<&str>, &str),
    channels: &[(&str, f64, &str)],
) -> Lead {
    let (linkedin_engagement, groups, previous_channel) = engagement;
    Lead {
        id: LeadId::from(id),
        name: name.to_string(),
        industry: industry.to_string(),
        location: location.to_string(),
        intent_score,
        engagement: EngagementSignals {
            linkedin_engagement,
            groups: groups.map(str::to_string),
            previous_channel: previous_channel.to_string(),
        },
        channels: channels
            .iter()
            .map(|(name, value, color)| ChannelEffectiveness {
                name: name.to_string(),
                value: *value,
                color: color.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use reachiq::outreach::sequencing::SequencingEngine;

    #[test]
    fn demo_directory_is_seeded_without_csv() {
        let directory = InMemoryLeadDirectory::load(None).expect("demo seed loads");
        assert_eq!(directory.len(), 4);
        let lead = directory
            .lead(&LeadId::from("BUY_1003"))
            .expect("lookup succeeds")
            .expect("lead present");
        assert_eq!(lead.channels.len(), 1);
    }

    #[test]
    fn missing_csv_file_is_an_import_error() {
        let err = InMemoryLeadDirectory::load(Some(Path::new("/nonexistent/leads.csv")))
            .err()
            .expect("missing file rejected");
        assert!(matches!(err, LeadImportError::Io(_)));
    }

    #[test]
    fn cache_evicts_stale_entries() {
        let cache = InMemoryResultCache::default();
        let directory = InMemoryLeadDirectory::from_leads(demo_leads());
        let lead = directory
            .lead(&LeadId::from("BUY_1001"))
            .expect("lookup succeeds")
            .expect("lead present");
        let now = Utc::now();
        let key = CacheKey::new(lead.id.clone(), "policy");
        cache
            .put(
                key.clone(),
                CachedAnalysis {
                    stored_at: now - Duration::minutes(10),
                    analysis: SequencingEngine::default().analyze(&lead.outreach_signals()),
                },
            )
            .expect("put succeeds");

        assert_eq!(cache.evict_older_than(now - Duration::minutes(5)), 1);
        assert!(cache.get(&key).expect("get succeeds").is_none());
    }
}
