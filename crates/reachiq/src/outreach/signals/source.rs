use super::domain::{Lead, LeadId};

/// Upstream lead/signal directory. Lookups happen before the engine runs.
pub trait SignalSource: Send + Sync {
    fn lead(&self, id: &LeadId) -> Result<Option<Lead>, SignalSourceError>;
    fn leads(&self) -> Result<Vec<Lead>, SignalSourceError>;
}

/// Failure reaching the signal directory. Callers may retry.
#[derive(Debug, thiserror::Error)]
pub enum SignalSourceError {
    #[error("signal source unavailable: {0}")]
    Unavailable(String),
}
