//! Widgets for composed report panels.

use client_core::view::{ChipGroup, PanelView, ProductCard, ReportView};
use eframe::egui;

const HERO_COLUMNS: usize = 4;
const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 212, 255);

pub fn show_panel(ui: &mut egui::Ui, panel: &PanelView) {
    match panel {
        PanelView::Loading { placeholders } => {
            for index in 0..*placeholders {
                ui.push_id(index, show_placeholder);
            }
        }
        PanelView::Report(report) => show_report(ui, report),
        PanelView::Competitors {
            banner,
            caption,
            reports,
        } => {
            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(32, 64, 48))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(banner).color(egui::Color32::WHITE));
                    if let Some(caption) = caption {
                        ui.label(egui::RichText::new(caption).small().color(egui::Color32::LIGHT_GRAY));
                    }
                });
            ui.add_space(8.0);
            for (index, report) in reports.iter().enumerate() {
                ui.push_id(index, |ui| show_report(ui, report));
            }
        }
        PanelView::NoCompetitors { notice } => {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(*notice).weak());
            });
        }
        PanelView::Empty => {}
    }
}

fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    let inner = egui::Frame::group(ui.style())
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(14, 12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner;
    ui.add_space(10.0);
    inner
}

fn show_placeholder(ui: &mut egui::Ui) {
    card(ui, |ui| {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(egui::RichText::new("Loading report...").weak());
        });
        ui.add_space(40.0);
    });
}

fn show_report(ui: &mut egui::Ui, report: &ReportView) {
    card(ui, |ui| {
        ui.heading(egui::RichText::new(&report.title).color(ACCENT));
        ui.label(egui::RichText::new(report.subtitle).weak());
        if let Some(caption) = &report.caption {
            ui.label(egui::RichText::new(caption).small().weak());
        }
        ui.add_space(8.0);

        ui.columns(report.stats.len().max(1), |columns| {
            for (column, stat) in columns.iter_mut().zip(&report.stats) {
                column.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(stat.value.to_string()).size(24.0).strong());
                    ui.label(egui::RichText::new(stat.label).weak());
                });
            }
        });
        ui.separator();

        ui.columns(2, |columns| {
            columns[0].label(egui::RichText::new("Store Information").strong());
            for excerpt in &report.store_info {
                columns[0].label(egui::RichText::new(excerpt.label).small().weak());
                let text = egui::RichText::new(&excerpt.text);
                columns[0].label(if excerpt.available { text } else { text.italics().weak() });
            }

            columns[1].label(egui::RichText::new("Contact Information").strong());
            show_chips(&mut columns[1], &report.emails);
            show_chips(&mut columns[1], &report.phones);
        });

        if let Some(grid) = &report.hero_grid {
            ui.separator();
            ui.label(egui::RichText::new(format!("Hero Products ({})", grid.len())).strong());
            egui::Grid::new("hero_grid")
                .num_columns(HERO_COLUMNS)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for (index, product) in grid.iter().enumerate() {
                        ui.vertical(|ui| show_product(ui, product));
                        if (index + 1) % HERO_COLUMNS == 0 {
                            ui.end_row();
                        }
                    }
                });
        }

        if let Some(list) = &report.product_list {
            ui.separator();
            egui::CollapsingHeader::new(&list.header).show(ui, |ui| {
                for product in &list.items {
                    ui.horizontal_wrapped(|ui| show_product(ui, product));
                }
                let hidden = list.total.saturating_sub(list.items.len());
                if hidden > 0 {
                    ui.label(egui::RichText::new(format!("... and {hidden} more")).weak());
                }
            });
        }

        ui.separator();
        ui.label(egui::RichText::new("Social Media").strong());
        match report.social.notice {
            Some(notice) => {
                ui.label(egui::RichText::new(notice).weak());
            }
            None => {
                ui.horizontal_wrapped(|ui| {
                    for chip in &report.social.chips {
                        ui.hyperlink_to(&chip.label, &chip.href)
                            .on_hover_text(&chip.tooltip);
                    }
                });
            }
        }
    });
}

fn show_chips(ui: &mut egui::Ui, group: &ChipGroup) {
    ui.label(egui::RichText::new(group.label).small().weak());
    match group.empty_notice {
        Some(notice) => {
            ui.label(egui::RichText::new(notice).italics().weak());
        }
        None => {
            ui.horizontal_wrapped(|ui| {
                for chip in &group.chips {
                    egui::Frame::NONE
                        .stroke(egui::Stroke::new(1.0, ACCENT))
                        .corner_radius(10.0)
                        .inner_margin(egui::Margin::symmetric(8, 2))
                        .show(ui, |ui| {
                            ui.label(chip);
                        });
                }
            });
        }
    }
}

fn show_product(ui: &mut egui::Ui, product: &ProductCard) {
    if product.url.is_empty() {
        ui.label(&product.title);
    } else {
        let link = ui.hyperlink_to(&product.title, &product.url);
        if let Some(image) = &product.image {
            link.on_hover_text(image);
        }
    }
    if let Some(price) = &product.price_label {
        ui.label(egui::RichText::new(price).color(ACCENT));
    }
}
