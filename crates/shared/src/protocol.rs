use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::InsightRecord;

pub const ANALYSIS_PATH: &str = "fetch-shopify-insights";
pub const COMPETITORS_PATH: &str = "competitors";
pub const BRANDS_PATH: &str = "brands";
pub const WEBSITE_URL_PARAM: &str = "website_url";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_store: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub competitors: Vec<InsightRecord>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandSummary {
    pub id: i64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}
