//! Temperature & humidity dashboard: CSV loading, time/location filtering
//! and per-group summary metrics. The egui shell lives in the binary.

pub mod config;
pub mod data;

pub use config::{ColumnMapping, DashboardConfig};
