use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contacts {
    #[serde(default)]
    pub emails: BTreeSet<String>,
    #[serde(default)]
    pub phones: BTreeSet<String>,
}

/// One storefront report, identical in shape for the analyzed store and for
/// each discovered competitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightRecord {
    pub store_url: String,
    #[serde(default)]
    pub products: Vec<Product>,
    /// Curated subset; order is display order.
    #[serde(default)]
    pub hero_products: Vec<Product>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub social_handles: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_policy: Option<String>,
    #[serde(default)]
    pub contacts: Contacts,
    #[serde(default)]
    pub important_links: BTreeMap<String, String>,
}

impl InsightRecord {
    pub fn new(store_url: impl Into<String>) -> Self {
        Self {
            store_url: store_url.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Analysis,
    Competitors,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::Analysis, Operation::Competitors];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Analysis => "analysis",
            Operation::Competitors => "competitors",
        }
    }

    /// The dashboard tab that shows this operation's result.
    pub fn tab(self) -> Tab {
        match self {
            Operation::Analysis => Tab::Analysis,
            Operation::Competitors => Tab::Competitors,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Analysis,
    Competitors,
}
