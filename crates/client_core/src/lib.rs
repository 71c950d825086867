//! Client-side core of the store insights dashboard: settings, the HTTP
//! transport to the insights service, per-operation progress simulation,
//! request orchestration, and the pure view model both front ends render.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod transport;
pub mod view;

pub use config::{load_settings, load_settings_from, Settings, SettingsError};
pub use error::{ErrorKind, OperationError};
pub use orchestrator::{DashboardSnapshot, DashboardState, OperationState, Orchestrator, Phase};
pub use progress::{ProgressConfig, ProgressFrame, ProgressPhase, ProgressSimulator};
pub use transport::{HttpInsightsClient, InsightsApi};
pub use view::{DashboardView, ViewComposer};
