mod events_service;
pub mod insights;

pub use events_service::{AnalyticsError, AnalyticsService};
pub use insights::generate_insights;
