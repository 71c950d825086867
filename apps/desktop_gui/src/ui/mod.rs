//! UI layer for the dashboard window: app shell and report widgets.

pub mod app;
pub mod report;

pub use app::{DashboardApp, PersistedDashboardSettings, SETTINGS_STORAGE_KEY};
