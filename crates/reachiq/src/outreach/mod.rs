pub mod analytics;
pub mod sequencing;
pub mod signals;
