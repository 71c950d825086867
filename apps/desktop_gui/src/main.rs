use std::sync::Arc;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Result};
use client_core::{load_settings, HttpInsightsClient, Orchestrator, Settings, ViewComposer};
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::{DashboardApp, PersistedDashboardSettings, SETTINGS_STORAGE_KEY};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(error = %err, "falling back to default dashboard settings");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::General,
                format!("Settings ignored: {err}"),
            )));
            Settings::default()
        }
    };
    tracing::info!(api_base_url = %settings.api_base_url, "using insights service");

    let api = Arc::new(HttpInsightsClient::from_settings(&settings)?);
    let orchestrator = Orchestrator::new(api, settings.progress);
    let composer = ViewComposer::new(settings.competitor_slots);
    backend_bridge::runtime::launch(Arc::clone(&orchestrator), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Shopify Insights Pro")
            .with_inner_size([1180.0, 820.0])
            .with_min_inner_size([760.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Shopify Insights Pro",
        options,
        Box::new(move |cc| {
            let persisted_settings = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedDashboardSettings>(&text).ok())
            });
            Ok(Box::new(DashboardApp::new(
                orchestrator,
                composer,
                cmd_tx,
                ui_rx,
                persisted_settings,
            )))
        }),
    )
    .map_err(|err| anyhow!("dashboard window failed: {err}"))
}
