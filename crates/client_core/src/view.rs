//! Pure mapping from dashboard state to what the front ends draw.

use shared::domain::{InsightRecord, Operation, Product, Tab};

use crate::orchestrator::{DashboardSnapshot, OperationState, Phase};

pub const HERO_GRID_LIMIT: usize = 8;
pub const PRODUCT_LIST_LIMIT: usize = 50;
pub const EXCERPT_LIMIT: usize = 120;
pub const TRUNCATION_MARKER: &str = "...";
pub const NOT_AVAILABLE: &str = "Not available";
pub const NO_EMAILS: &str = "No emails found";
pub const NO_PHONES: &str = "No phones found";
pub const NO_SOCIALS: &str = "No social media links found";
pub const NO_COMPETITORS: &str =
    "No competitors found yet. Click \"Find Competitors\" to discover similar stores!";
pub const REPORT_SUBTITLE: &str = "Complete brand analysis report";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub controls: Vec<TriggerControl>,
    pub overlay: Option<OverlayView>,
    pub tabs: Option<TabBarView>,
    pub panel: Option<PanelView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerControl {
    pub operation: Operation,
    pub label: &'static str,
    pub enabled: bool,
    /// Inline error from the last failed invocation of this control.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub progress: u8,
}

impl OverlayView {
    pub fn progress_label(&self) -> String {
        format!("{}% Complete", self.progress)
    }

    pub fn fraction(&self) -> f32 {
        f32::from(self.progress) / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabBarView {
    pub active: Tab,
    pub tabs: Vec<TabLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    pub tab: Tab,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    /// Skeleton cards while the active tab's operation is in flight.
    Loading { placeholders: usize },
    Report(Box<ReportView>),
    Competitors {
        banner: String,
        /// Which store the list belongs to and when it arrived.
        caption: Option<String>,
        reports: Vec<ReportView>,
    },
    NoCompetitors { notice: &'static str },
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub title: String,
    pub subtitle: &'static str,
    /// Set for the main analysis: requested url and completion time.
    pub caption: Option<String>,
    pub stats: Vec<StatView>,
    pub store_info: Vec<ExcerptView>,
    pub emails: ChipGroup,
    pub phones: ChipGroup,
    pub hero_grid: Option<Vec<ProductCard>>,
    pub product_list: Option<ProductListView>,
    pub social: SocialView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatView {
    pub label: &'static str,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcerptView {
    pub label: &'static str,
    pub text: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipGroup {
    pub label: &'static str,
    pub chips: Vec<String>,
    pub empty_notice: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub title: String,
    pub url: String,
    pub price_label: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductListView {
    pub header: String,
    pub total: usize,
    pub items: Vec<ProductCard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialView {
    pub chips: Vec<LinkChip>,
    pub notice: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkChip {
    pub label: String,
    pub href: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewComposer {
    competitor_slots: usize,
}

impl Default for ViewComposer {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ViewComposer {
    pub fn new(competitor_slots: usize) -> Self {
        Self { competitor_slots }
    }

    pub fn compose(&self, snapshot: &DashboardSnapshot) -> DashboardView {
        let state = &snapshot.state;
        let controls = Operation::ALL
            .into_iter()
            .map(|operation| TriggerControl {
                operation,
                label: control_label(operation),
                enabled: state.phase(operation) != Phase::InFlight,
                error: state.error(operation).map(ToString::to_string),
            })
            .collect();

        let overlay = snapshot.progress_active().then(|| {
            let analysis_active = state.analysis.is_in_flight()
                || (!state.competitors.is_in_flight() && snapshot.analysis_progress.is_active());
            let (title, subtitle) = if analysis_active {
                ("Analyzing Store...", "Extracting products, policies, and insights")
            } else {
                ("Finding Competitors...", "Discovering similar stores in your market")
            };
            OverlayView {
                title,
                subtitle,
                progress: snapshot.progress(),
            }
        });

        let show_tabs = state.analysis.is_succeeded() || state.competitors.is_succeeded();
        if !show_tabs {
            return DashboardView {
                controls,
                overlay,
                tabs: None,
                panel: None,
            };
        }

        let competitor_count = state.competitors.result().map_or(0, Vec::len);
        let tabs = TabBarView {
            active: state.active_tab,
            tabs: vec![
                TabLabel {
                    tab: Tab::Analysis,
                    label: "Main Analysis".to_string(),
                },
                TabLabel {
                    tab: Tab::Competitors,
                    label: format!("Competitors ({competitor_count})"),
                },
            ],
        };

        let panel = match state.active_tab {
            Tab::Analysis => match (state.analysis.phase(), state.analysis.result()) {
                (Phase::InFlight, _) => PanelView::Loading { placeholders: 1 },
                (Phase::Succeeded, Some(record)) => {
                    let mut report = compose_report(record, None);
                    report.caption = completion_caption("Analyzed", &state.analysis);
                    PanelView::Report(Box::new(report))
                }
                _ => PanelView::Empty,
            },
            Tab::Competitors => match (state.competitors.phase(), state.competitors.result()) {
                (Phase::InFlight, _) => PanelView::Loading {
                    placeholders: self.competitor_slots,
                },
                (Phase::Succeeded, Some(list)) if !list.is_empty() => PanelView::Competitors {
                    banner: competitor_banner(list.len()),
                    caption: completion_caption("Competitors of", &state.competitors),
                    reports: list
                        .iter()
                        .enumerate()
                        .map(|(index, record)| {
                            compose_report(record, Some(format!("Competitor {}", index + 1)))
                        })
                        .collect(),
                },
                _ => PanelView::NoCompetitors {
                    notice: NO_COMPETITORS,
                },
            },
        };

        DashboardView {
            controls,
            overlay,
            tabs: Some(tabs),
            panel: Some(panel),
        }
    }
}

pub fn control_label(operation: Operation) -> &'static str {
    match operation {
        Operation::Analysis => "Analyze Store",
        Operation::Competitors => "Find Competitors",
    }
}

fn completion_caption<T>(prefix: &str, state: &OperationState<T>) -> Option<String> {
    let url = state.target_url()?;
    let completed_at = state.completed_at()?;
    Some(format!(
        "{prefix} {url} at {}",
        completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ))
}

fn competitor_banner(count: usize) -> String {
    let plural = if count > 1 { "s" } else { "" };
    format!("Found {count} competitor{plural} for analysis")
}

/// Maps one record into report sections. `title` defaults to the store url.
pub fn compose_report(record: &InsightRecord, title: Option<String>) -> ReportView {
    let stats = vec![
        StatView {
            label: "Products",
            value: record.products.len(),
        },
        StatView {
            label: "Hero Items",
            value: record.hero_products.len(),
        },
        StatView {
            label: "FAQs",
            value: record.faqs.len(),
        },
        StatView {
            label: "Socials",
            value: record.social_handles.len(),
        },
    ];

    let store_info = vec![
        excerpt("ABOUT", record.about.as_deref()),
        excerpt("PRIVACY POLICY", record.privacy_policy.as_deref()),
        excerpt("RETURN POLICY", record.return_policy.as_deref()),
    ];

    let emails = chip_group(
        "Email Addresses",
        record.contacts.emails.iter().cloned().collect(),
        NO_EMAILS,
    );
    let phones = chip_group(
        "Phone Numbers",
        record.contacts.phones.iter().cloned().collect(),
        NO_PHONES,
    );

    let hero_grid = (!record.hero_products.is_empty()).then(|| {
        record
            .hero_products
            .iter()
            .take(HERO_GRID_LIMIT)
            .map(product_card)
            .collect()
    });

    let product_list = (!record.products.is_empty()).then(|| ProductListView {
        header: format!("All Products ({})", record.products.len()),
        total: record.products.len(),
        items: record
            .products
            .iter()
            .take(PRODUCT_LIST_LIMIT)
            .map(product_card)
            .collect(),
    });

    let chips: Vec<LinkChip> = record
        .social_handles
        .iter()
        .map(|(platform, url)| LinkChip {
            label: platform.clone(),
            href: url.clone(),
            tooltip: format!("Visit {platform}"),
        })
        .collect();
    let social = SocialView {
        notice: chips.is_empty().then_some(NO_SOCIALS),
        chips,
    };

    ReportView {
        title: title.unwrap_or_else(|| record.store_url.clone()),
        subtitle: REPORT_SUBTITLE,
        caption: None,
        stats,
        store_info,
        emails,
        phones,
        hero_grid,
        product_list,
        social,
    }
}

fn excerpt(label: &'static str, text: Option<&str>) -> ExcerptView {
    match text.filter(|text| !text.trim().is_empty()) {
        Some(text) => ExcerptView {
            label,
            text: truncate_excerpt(text),
            available: true,
        },
        None => ExcerptView {
            label,
            text: NOT_AVAILABLE.to_string(),
            available: false,
        },
    }
}

/// Keeps the first [`EXCERPT_LIMIT`] characters and marks the cut.
pub fn truncate_excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_LIMIT) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}

fn chip_group(label: &'static str, chips: Vec<String>, empty: &'static str) -> ChipGroup {
    ChipGroup {
        label,
        empty_notice: chips.is_empty().then_some(empty),
        chips,
    }
}

fn product_card(product: &Product) -> ProductCard {
    ProductCard {
        title: product.title.clone(),
        url: product.url.clone(),
        price_label: product.price.map(price_label),
        image: product.image.clone().filter(|image| !image.is_empty()),
    }
}

pub fn price_label(price: f64) -> String {
    format!("₹{price}")
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
