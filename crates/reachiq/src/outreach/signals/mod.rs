//! Lead signal model, the upstream source seam and CSV seeding.

pub mod domain;
mod import;
mod source;

pub use domain::{
    ChannelEffectiveness, EngagementSignals, IntentBand, Lead, LeadId, OutreachSignals,
};
pub use import::{LeadImportError, LeadImporter};
pub use source::{SignalSource, SignalSourceError};
