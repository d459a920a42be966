//! Data source management for DataPulse
//!
//! A data source records where an organization's data comes from: a live
//! database, uploaded files, a polled API, or pushed payloads. The connection
//! config is an opaque JSON blob interpreted per source type.

pub mod handlers;
pub mod plugin;
pub mod service;
pub mod types;

pub use plugin::DatasourcesPlugin;
pub use service::{DatasourceError, DatasourceService};
