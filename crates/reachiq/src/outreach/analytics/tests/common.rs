use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::outreach::analytics::{
    analytics_router, CacheError, CacheKey, CachedAnalysis, OutreachAnalyticsService, ResultCache,
};
use crate::outreach::sequencing::{DecayModel, EnginePolicy, SequencingEngine, StoppingThreshold};
use crate::outreach::signals::{
    ChannelEffectiveness, EngagementSignals, Lead, LeadId, SignalSource, SignalSourceError,
};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn ttl() -> Duration {
    Duration::seconds(300)
}

pub(super) fn lead(id: &str, intent: f64, channels: &[(&str, f64)]) -> Lead {
    Lead {
        id: LeadId::from(id),
        name: format!("{id} Inc"),
        industry: "Software".to_string(),
        location: "Austin, TX".to_string(),
        intent_score: intent,
        engagement: EngagementSignals {
            linkedin_engagement: 0.4,
            groups: None,
            previous_channel: "Email".to_string(),
        },
        channels: channels
            .iter()
            .map(|(name, value)| ChannelEffectiveness::new(*name, *value))
            .collect(),
    }
}

pub(super) fn directory() -> MemorySignals {
    MemorySignals::with_leads(vec![
        lead("BUY_1", 82.0, &[("Email", 90.0), ("LinkedIn", 60.0)]),
        lead("BUY_2", 55.0, &[("LinkedIn", 70.0), ("Email", 45.0)]),
        lead("BUY_3", 20.0, &[("Phone", 30.0)]),
    ])
}

pub(super) fn engine() -> SequencingEngine {
    let policy = EnginePolicy::new(
        4,
        DecayModel::Table {
            factors: vec![1.0, 0.85, 0.6, 0.4],
        },
        StoppingThreshold::Fixed { value: 0.05 },
    )
    .expect("valid policy");
    SequencingEngine::new(policy)
}

pub(super) fn build_service() -> (
    OutreachAnalyticsService<MemorySignals, MemoryCache>,
    Arc<MemorySignals>,
    Arc<MemoryCache>,
) {
    let source = Arc::new(directory());
    let cache = Arc::new(MemoryCache::default());
    let service = OutreachAnalyticsService::new(source.clone(), cache.clone(), engine(), ttl());
    (service, source, cache)
}

#[derive(Default)]
pub(super) struct MemorySignals {
    pub(super) leads: HashMap<LeadId, Lead>,
    lookups: AtomicUsize,
}

impl MemorySignals {
    pub(super) fn with_leads(leads: Vec<Lead>) -> Self {
        Self {
            leads: leads.into_iter().map(|lead| (lead.id.clone(), lead)).collect(),
            lookups: AtomicUsize::new(0),
        }
    }

    pub(super) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl SignalSource for MemorySignals {
    fn lead(&self, id: &LeadId) -> Result<Option<Lead>, SignalSourceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.leads.get(id).cloned())
    }

    fn leads(&self) -> Result<Vec<Lead>, SignalSourceError> {
        let mut leads: Vec<Lead> = self.leads.values().cloned().collect();
        leads.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(leads)
    }
}

#[derive(Default)]
pub(super) struct MemoryCache {
    entries: Arc<Mutex<HashMap<CacheKey, CachedAnalysis>>>,
}

impl MemoryCache {
    pub(super) fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<CachedAnalysis>, CacheError> {
        Ok(self
            .entries
            .lock()
            .expect("cache mutex poisoned")
            .get(key)
            .cloned())
    }

    fn put(&self, key: CacheKey, entry: CachedAnalysis) -> Result<(), CacheError> {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .insert(key, entry);
        Ok(())
    }
}

pub(super) struct UnavailableSource;

impl SignalSource for UnavailableSource {
    fn lead(&self, _id: &LeadId) -> Result<Option<Lead>, SignalSourceError> {
        Err(SignalSourceError::Unavailable("crm offline".to_string()))
    }

    fn leads(&self) -> Result<Vec<Lead>, SignalSourceError> {
        Err(SignalSourceError::Unavailable("crm offline".to_string()))
    }
}

pub(super) struct UnavailableCache;

impl ResultCache for UnavailableCache {
    fn get(&self, _key: &CacheKey) -> Result<Option<CachedAnalysis>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    fn put(&self, _key: CacheKey, _entry: CachedAnalysis) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: OutreachAnalyticsService<MemorySignals, MemoryCache>,
) -> axum::Router {
    analytics_router(Arc::new(service))
}
