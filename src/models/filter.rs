use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One selectable value of a filter dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_en: Option<String>,
}

impl FilterOption {
    /// Creates an option whose label is the value itself.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            label_en: None,
        }
    }
}

/// Whether a dimension's values come from configuration or from stored posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionType {
    Fixed,
    Dynamic,
}

/// The option list for one dimension, as served to a filter bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDimension {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_en: Option<String>,
    #[serde(rename = "type")]
    pub kind: DimensionType,
    pub values: Vec<FilterOption>,
}

/// Number of posts carrying one dimension value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: i64,
}

/// Filter options for every configured dimension.
///
/// Keys are dimension keys in configuration order.
pub type FilterOptions = IndexMap<String, FilterDimension>;
