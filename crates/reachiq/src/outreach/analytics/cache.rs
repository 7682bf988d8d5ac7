use chrono::{DateTime, Duration, Utc};

use crate::outreach::sequencing::SequenceAnalysis;
use crate::outreach::signals::LeadId;

/// Cached results are only valid for the policy that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub lead_id: LeadId,
    pub policy: String,
}

impl CacheKey {
    pub fn new(lead_id: LeadId, policy: impl Into<String>) -> Self {
        Self {
            lead_id,
            policy: policy.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedAnalysis {
    pub stored_at: DateTime<Utc>,
    pub analysis: SequenceAnalysis,
}

impl CachedAnalysis {
    /// Entries stamped in the future are treated as stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = now.signed_duration_since(self.stored_at);
        age >= Duration::zero() && age < ttl
    }
}

/// Storage seam for computed analyses so the service can be tested in isolation.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<Option<CachedAnalysis>, CacheError>;
    fn put(&self, key: CacheKey, entry: CachedAnalysis) -> Result<(), CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("result cache unavailable: {0}")]
    Unavailable(String),
}
