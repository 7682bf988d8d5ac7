//! Outreach sequencing decision engine.
//!
//! Given a lead's per-channel effectiveness signals the engine predicts a
//! multi-step outreach sequence, estimates the response probability at each
//! step, finds the point of diminishing returns and recommends where to stop.
//! The [`outreach::analytics`] module wraps the engine in a cached service and
//! an axum router.

pub mod config;
pub mod error;
pub mod outreach;
pub mod telemetry;
