//! Plain-text rendering of composed dashboard views.

use std::fmt::{self, Write};

use client_core::view::{
    truncate_excerpt, ChipGroup, PanelView, ProductCard, ReportView, TriggerControl,
};
use shared::protocol::BrandSummary;

pub const NO_BRANDS: &str = "No brands stored yet";

pub fn render_panel(panel: &PanelView) -> String {
    let mut out = String::new();
    let _ = write_panel(&mut out, panel);
    out
}

pub fn render_brands(brands: &[BrandSummary]) -> String {
    let mut out = String::new();
    if brands.is_empty() {
        let _ = writeln!(out, "{NO_BRANDS}");
        return out;
    }
    for brand in brands {
        let _ = writeln!(out, "#{} {}", brand.id, brand.url);
        if let Some(about) = brand.about.as_deref().filter(|about| !about.trim().is_empty()) {
            let _ = writeln!(out, "    {}", truncate_excerpt(about));
        }
    }
    out
}

/// One line per failed control, e.g. `Find Competitors: request timed out`.
pub fn render_failures(controls: &[TriggerControl]) -> Vec<String> {
    controls
        .iter()
        .filter_map(|control| {
            control
                .error
                .as_ref()
                .map(|error| format!("{}: {error}", control.label))
        })
        .collect()
}

fn write_panel(out: &mut impl Write, panel: &PanelView) -> fmt::Result {
    match panel {
        PanelView::Report(report) => write_report(out, report),
        PanelView::Competitors {
            banner,
            caption,
            reports,
        } => {
            writeln!(out, "{banner}")?;
            if let Some(caption) = caption {
                writeln!(out, "{caption}")?;
            }
            for report in reports {
                writeln!(out)?;
                write_report(out, report)?;
            }
            Ok(())
        }
        PanelView::NoCompetitors { notice } => writeln!(out, "{notice}"),
        PanelView::Loading { .. } | PanelView::Empty => Ok(()),
    }
}

fn write_report(out: &mut impl Write, report: &ReportView) -> fmt::Result {
    writeln!(out, "== {} ==", report.title)?;
    writeln!(out, "{}", report.subtitle)?;
    if let Some(caption) = &report.caption {
        writeln!(out, "{caption}")?;
    }
    let stats: Vec<String> = report
        .stats
        .iter()
        .map(|stat| format!("{}: {}", stat.label, stat.value))
        .collect();
    writeln!(out, "{}", stats.join(" | "))?;

    writeln!(out, "\nStore Information")?;
    for excerpt in &report.store_info {
        writeln!(out, "  {}: {}", excerpt.label, excerpt.text)?;
    }

    writeln!(out, "\nContact Information")?;
    write_chips(out, &report.emails)?;
    write_chips(out, &report.phones)?;

    if let Some(grid) = &report.hero_grid {
        writeln!(out, "\nHero Products")?;
        for card in grid {
            write_card(out, card)?;
        }
    }

    if let Some(list) = &report.product_list {
        writeln!(out, "\n{}", list.header)?;
        for card in &list.items {
            write_card(out, card)?;
        }
        let hidden = list.total.saturating_sub(list.items.len());
        if hidden > 0 {
            writeln!(out, "  ... and {hidden} more")?;
        }
    }

    writeln!(out, "\nSocial Media")?;
    match report.social.notice {
        Some(notice) => writeln!(out, "  {notice}")?,
        None => {
            for chip in &report.social.chips {
                writeln!(out, "  {}: {}", chip.label, chip.href)?;
            }
        }
    }
    Ok(())
}

fn write_chips(out: &mut impl Write, group: &ChipGroup) -> fmt::Result {
    match group.empty_notice {
        Some(notice) => writeln!(out, "  {}: {notice}", group.label),
        None => writeln!(out, "  {}: {}", group.label, group.chips.join(", ")),
    }
}

fn write_card(out: &mut impl Write, card: &ProductCard) -> fmt::Result {
    write!(out, "  - {}", card.title)?;
    if let Some(price) = &card.price_label {
        write!(out, "  {price}")?;
    }
    if !card.url.is_empty() {
        write!(out, "  <{}>", card.url)?;
    }
    writeln!(out)
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
