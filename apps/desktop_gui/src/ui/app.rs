use std::{sync::Arc, time::Duration};

use client_core::{
    view::{DashboardView, OverlayView, TabBarView, TriggerControl},
    Orchestrator, ViewComposer,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::protocol::BrandSummary;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiEvent},
    orchestration::dispatch_backend_command,
};
use crate::ui::report;

pub const SETTINGS_STORAGE_KEY: &str = "store_insights.dashboard_settings";
const URL_PLACEHOLDER: &str = "https://store.myshopify.com";
const ERROR_TEXT: egui::Color32 = egui::Color32::from_rgb(235, 110, 110);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedDashboardSettings {
    #[serde(default)]
    pub last_url: String,
}

pub struct DashboardApp {
    orchestrator: Arc<Orchestrator>,
    composer: ViewComposer,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    url_input: String,
    status: String,
    status_banner: Option<UiError>,
    brands: Option<Vec<BrandSummary>>,
}

impl DashboardApp {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        composer: ViewComposer,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted_settings: Option<PersistedDashboardSettings>,
    ) -> Self {
        let persisted = persisted_settings.unwrap_or_default();
        Self {
            orchestrator,
            composer,
            cmd_tx,
            ui_rx,
            url_input: persisted.last_url,
            status: "Starting...".to_string(),
            status_banner: None,
            brands: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    tracing::warn!(
                        category = ?err.category(),
                        context = ?err.context(),
                        "{}",
                        err.message()
                    );
                    if err.is_fatal() {
                        self.status = "Backend unavailable".to_string();
                    }
                    self.status_banner = Some(err);
                }
                UiEvent::BrandsLoaded(brands) => {
                    self.status = format!("Loaded {} stored brand(s)", brands.len());
                    self.brands = Some(brands);
                }
            }
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.status_banner = Some(err);
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new("Shopify Insights Pro").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(&self.status).weak());
            });
        });
        ui.label(
            egui::RichText::new("Professional E-commerce Intelligence Platform").weak(),
        );
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.status_banner.clone() else {
            return;
        };

        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(banner.message()).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.status_banner = None;
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn show_input(&mut self, ui: &mut egui::Ui, controls: &[TriggerControl]) {
        egui::Frame::group(ui.style())
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(16, 12))
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Enter Store URL for Analysis").strong());
                ui.add(
                    egui::TextEdit::singleline(&mut self.url_input)
                        .hint_text(URL_PLACEHOLDER)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);
                ui.columns(controls.len().max(1), |columns| {
                    for (column, control) in columns.iter_mut().zip(controls) {
                        let button = egui::Button::new(control.label)
                            .min_size(egui::vec2(column.available_width(), 32.0));
                        if column.add_enabled(control.enabled, button).clicked() {
                            self.dispatch(BackendCommand::Trigger {
                                operation: control.operation,
                                url: self.url_input.clone(),
                            });
                        }
                        if let Some(error) = &control.error {
                            column.colored_label(ERROR_TEXT, error);
                        }
                    }
                });
                ui.horizontal(|ui| {
                    if ui.small_button("Stored brands").clicked() {
                        self.dispatch(BackendCommand::ListBrands);
                    }
                });
            });
    }

    fn show_tabs(&self, ui: &mut egui::Ui, tabs: &TabBarView) {
        let mut selected = tabs.active;
        ui.horizontal(|ui| {
            for tab in &tabs.tabs {
                ui.selectable_value(&mut selected, tab.tab, &tab.label);
            }
        });
        if selected != tabs.active {
            self.orchestrator.select_tab(selected);
        }
        ui.separator();
    }

    fn show_brands(&mut self, ui: &mut egui::Ui) {
        let Some(brands) = &self.brands else {
            return;
        };
        let mut close = false;
        egui::CollapsingHeader::new(format!("Stored brands ({})", brands.len()))
            .default_open(true)
            .show(ui, |ui| {
                if brands.is_empty() {
                    ui.label("No brands stored yet");
                }
                for brand in brands {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(format!("#{}", brand.id));
                        ui.hyperlink_to(&brand.url, &brand.url);
                    });
                }
                close = ui.small_button("Hide").clicked();
            });
        if close {
            self.brands = None;
        }
        ui.add_space(8.0);
    }

    fn show_dashboard(&mut self, ctx: &egui::Context, view: &DashboardView) {
        egui::TopBottomPanel::top("dashboard_header").show(ctx, |ui| {
            ui.add_space(6.0);
            self.show_header(ui);
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            self.show_input(ui, &view.controls);
            ui.add_space(10.0);
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.show_brands(ui);
                    if let Some(tabs) = &view.tabs {
                        self.show_tabs(ui, tabs);
                    }
                    if let Some(panel) = &view.panel {
                        report::show_panel(ui, panel);
                    }
                });
        });

        if let Some(overlay) = &view.overlay {
            show_overlay(ctx, overlay);
        }
    }
}

fn show_overlay(ctx: &egui::Context, overlay: &OverlayView) {
    egui::Modal::new(egui::Id::new("progress_overlay")).show(ctx, |ui| {
        ui.set_width(360.0);
        ui.vertical_centered(|ui| {
            ui.add(egui::Spinner::new().size(28.0));
            ui.heading(overlay.title);
            ui.label(egui::RichText::new(overlay.subtitle).weak());
            ui.add_space(8.0);
            ui.add(egui::ProgressBar::new(overlay.fraction()).text(overlay.progress_label()));
        });
    });
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let view = self.composer.compose(&self.orchestrator.snapshot());
        self.show_dashboard(ctx, &view);

        let repaint = if view.overlay.is_some() { 50 } else { 250 };
        ctx.request_repaint_after(Duration::from_millis(repaint));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedDashboardSettings {
            last_url: self.url_input.clone(),
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
