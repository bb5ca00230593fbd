use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized classification tags attached to a stored post.
///
/// Once persisted, `category` and any present `recruit_type`, `experience`
/// and `salary` are members of their dimension's standard value set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDimensions {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruit_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub custom: Vec<String>,
}

/// Tag dimensions as submitted, before any validation.
///
/// Array fields are kept as raw JSON so malformed input (a string instead of a
/// list, numbers inside the list) reaches the validator instead of failing
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTagDimensions {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub recruit_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub technologies: Option<Value>,
    #[serde(default)]
    pub custom: Option<Value>,
}

impl RawTagDimensions {
    /// Builds raw input from string lists, as the CLI does.
    pub fn from_lists(technologies: Vec<String>, custom: Vec<String>) -> Self {
        Self {
            technologies: Some(Value::from(technologies)),
            custom: Some(Value::from(custom)),
            ..Default::default()
        }
    }
}

impl From<TagDimensions> for RawTagDimensions {
    fn from(tags: TagDimensions) -> Self {
        Self {
            category: Some(tags.category),
            recruit_type: tags.recruit_type,
            location: tags.location,
            experience: tags.experience,
            salary: tags.salary,
            technologies: Some(Value::from(tags.technologies)),
            custom: Some(Value::from(tags.custom)),
        }
    }
}
