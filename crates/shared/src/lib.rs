pub mod domain;
pub mod error;
pub mod protocol;

#[cfg(test)]
mod tests {
    use crate::{domain::InsightRecord, protocol::CompetitorsResponse};

    #[test]
    fn insight_record_tolerates_missing_collections() {
        let record: InsightRecord =
            serde_json::from_str(r#"{"store_url":"https://shop.example.com/"}"#).expect("parse");
        assert_eq!(record.store_url, "https://shop.example.com/");
        assert!(record.products.is_empty());
        assert!(record.social_handles.is_empty());
        assert!(record.contacts.emails.is_empty());
        assert_eq!(record.about, None);
    }

    #[test]
    fn insight_record_parses_service_payload() {
        let raw = r#"{
            "store_url": "https://memy.co.in/",
            "products": [{"title": "Tee", "url": "https://memy.co.in/products/tee", "price": 499.0, "image": null}],
            "hero_products": [],
            "privacy_policy": "We respect your privacy",
            "return_policy": null,
            "faqs": [{"question": "Ship?", "answer": "Yes"}],
            "social_handles": {"instagram": "https://instagram.com/memy"},
            "contacts": {"emails": ["help@memy.co.in", "help@memy.co.in"], "phones": []},
            "about": null,
            "important_links": {"Track Order": "https://memy.co.in/track"}
        }"#;
        let record: InsightRecord = serde_json::from_str(raw).expect("parse");
        assert_eq!(record.products[0].price, Some(499.0));
        assert_eq!(record.products[0].image, None);
        assert_eq!(record.faqs.len(), 1);
        assert_eq!(record.contacts.emails.len(), 1);
        assert_eq!(record.important_links.len(), 1);
    }

    #[test]
    fn competitors_response_defaults_to_empty_list() {
        let body: CompetitorsResponse =
            serde_json::from_str(r#"{"original_store":"https://memy.co.in/"}"#).expect("parse");
        assert!(body.competitors.is_empty());
        assert_eq!(body.original_store.as_deref(), Some("https://memy.co.in/"));
    }

    #[test]
    fn competitors_response_treats_null_list_as_empty() {
        let body: CompetitorsResponse = serde_json::from_str(
            r#"{"original_store":"https://memy.co.in/","competitors":null}"#,
        )
        .expect("parse");
        assert!(body.competitors.is_empty());

        let body: CompetitorsResponse =
            serde_json::from_str(r#"{"competitors":[{"store_url":"https://a.example/"}]}"#)
                .expect("parse");
        assert_eq!(body.competitors.len(), 1);
        assert_eq!(body.original_store, None);
    }
}
