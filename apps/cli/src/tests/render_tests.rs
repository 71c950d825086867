use super::*;
use client_core::view::{compose_report, NO_COMPETITORS, NO_SOCIALS};
use shared::domain::{InsightRecord, Operation, Product};

fn record() -> InsightRecord {
    let mut record = InsightRecord::new("https://memy.co.in/");
    record.products = (0..53)
        .map(|index| Product {
            title: format!("Tee {index}"),
            url: format!("https://memy.co.in/products/tee-{index}"),
            price: Some(499.0),
            image: None,
        })
        .collect();
    record.contacts.emails.insert("help@memy.co.in".to_string());
    record
}

#[test]
fn report_lists_sections_in_order() {
    let mut report = compose_report(&record(), None);
    report.caption = Some("Analyzed https://memy.co.in/ at 2025-01-05 10:00:00 UTC".into());
    let text = render_panel(&PanelView::Report(Box::new(report)));

    let headings = [
        "== https://memy.co.in/ ==",
        "Store Information",
        "Contact Information",
        "All Products (53)",
        "Social Media",
    ];
    let positions: Vec<usize> = headings
        .iter()
        .map(|heading| text.find(heading).expect(heading))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    assert!(text.contains("Products: 53 | Hero Items: 0 | FAQs: 0 | Socials: 0"));
    assert!(text.contains("\nAnalyzed https://memy.co.in/ at 2025-01-05 10:00:00 UTC\n"));
    assert!(text.contains("  Email Addresses: help@memy.co.in"));
    assert!(text.contains("  Phone Numbers: No phones found"));
    assert!(text.contains("  - Tee 0  ₹499  <https://memy.co.in/products/tee-0>"));
    assert!(text.contains("  ... and 3 more"));
    assert!(!text.contains("Tee 50"));
    assert!(!text.contains("Hero Products"));
    assert!(text.contains(NO_SOCIALS));
}

#[test]
fn competitor_panel_prints_banner_then_reports() {
    let reports = vec![
        compose_report(&InsightRecord::new("https://a.example/"), Some("Competitor 1".into())),
        compose_report(&InsightRecord::new("https://b.example/"), Some("Competitor 2".into())),
    ];
    let text = render_panel(&PanelView::Competitors {
        banner: "Found 2 competitors for analysis".to_string(),
        caption: Some("Competitors of https://memy.co.in/ at 2025-01-05 10:00:00 UTC".into()),
        reports,
    });

    assert!(text.starts_with(
        "Found 2 competitors for analysis\nCompetitors of https://memy.co.in/ at 2025-01-05 10:00:00 UTC\n"
    ));
    let first = text.find("== Competitor 1 ==").expect("first report");
    let second = text.find("== Competitor 2 ==").expect("second report");
    assert!(first < second);
}

#[test]
fn empty_competitor_panel_prints_notice() {
    let text = render_panel(&PanelView::NoCompetitors {
        notice: NO_COMPETITORS,
    });
    assert_eq!(text.trim_end(), NO_COMPETITORS);
    assert!(render_panel(&PanelView::Empty).is_empty());
}

#[test]
fn brands_render_with_truncated_about() {
    let brands = vec![
        BrandSummary {
            id: 1,
            url: "https://memy.co.in".to_string(),
            about: Some("B".repeat(150)),
        },
        BrandSummary {
            id: 2,
            url: "https://hairoriginals.com".to_string(),
            about: None,
        },
    ];
    let text = render_brands(&brands);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "#1 https://memy.co.in");
    assert_eq!(lines[1], format!("    {}...", "B".repeat(120)));
    assert_eq!(lines[2], "#2 https://hairoriginals.com");
    assert_eq!(lines.len(), 3);

    assert_eq!(render_brands(&[]).trim_end(), NO_BRANDS);
}

#[test]
fn failures_are_prefixed_with_control_label() {
    let controls = vec![
        TriggerControl {
            operation: Operation::Analysis,
            label: "Analyze Store",
            enabled: true,
            error: None,
        },
        TriggerControl {
            operation: Operation::Competitors,
            label: "Find Competitors",
            enabled: true,
            error: Some("request failed with status code 502".to_string()),
        },
    ];
    assert_eq!(
        render_failures(&controls),
        ["Find Competitors: request failed with status code 502".to_string()]
    );
}
