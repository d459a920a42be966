//! Dashboard and widget management for DataPulse
//!
//! Dashboards are organization-scoped containers; widgets belong to exactly
//! one dashboard and carry a free-form config blob plus a grid position.

pub mod handlers;
pub mod plugin;
pub mod service;
pub mod types;

pub use plugin::DashboardsPlugin;
pub use service::{DashboardError, DashboardService};
