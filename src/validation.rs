//! Validation of classification tags against their standard value sets.
//!
//! Two entry points exist with deliberately different behaviour:
//!
//! - [`validate_tag_dimensions`] is strict: a value outside the standard set is
//!   rejected even when it would normalize to a standard value. The error names
//!   the expected normalized form so callers can correct it.
//! - [`validate_and_normalize_post`] normalizes first and then validates, so it
//!   self-corrects and reports each correction as a warning.
//!
//! Validation problems are returned as human-readable strings, never as `Err`.

mod post;

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::dimensions::Dimension;
use crate::models::{RawTagDimensions, TagDimensions};
use crate::normalize::normalize;

pub use post::{PostValidation, validate_and_normalize_post};

/// Outcome of checking a single value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValueCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn invalid(error: String) -> Self {
        Self {
            valid: false,
            error: Some(error),
        }
    }
}

/// Outcome of validating a full set of tag dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// The input with array fields cleaned and defaulted to empty lists.
    pub normalized: TagDimensions,
}

/// Checks one value of `dimension` against its standard value set.
///
/// # Examples
///
/// ```
/// use mianjing::Dimension;
/// use mianjing::validation::validate_value;
///
/// assert!(validate_value(Dimension::Category, Some("SWE"), true).valid);
/// assert!(validate_value(Dimension::Salary, None, false).valid);
///
/// let missing = validate_value(Dimension::Category, Some("  "), true);
/// assert_eq!(missing.error.as_deref(), Some("category is required"));
///
/// let raw = validate_value(Dimension::Category, Some("算法"), true);
/// assert!(!raw.valid);
/// assert!(raw.error.unwrap().contains("'Data'"));
/// ```
pub fn validate_value(dimension: Dimension, value: Option<&str>, required: bool) -> ValueCheck {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ if required => return ValueCheck::invalid(format!("{dimension} is required")),
        _ => return ValueCheck::ok(),
    };

    let Some(allowed) = dimension.standard_values() else {
        return ValueCheck::ok();
    };
    if allowed.contains(&value) {
        return ValueCheck::ok();
    }

    let normalized = normalize(dimension, value);
    if dimension.is_standard(&normalized) {
        ValueCheck::invalid(format!(
            "Invalid {dimension} value '{value}', expected normalized value '{normalized}'"
        ))
    } else {
        ValueCheck::invalid(format!(
            "Invalid {dimension} value '{value}'. Allowed values: {}",
            allowed.join(", ")
        ))
    }
}

/// Validates tag dimensions without correcting them.
///
/// `category` is required; `recruitType`, `experience` and `salary` are
/// checked only when present; `technologies` and `custom` must be arrays of
/// non-empty strings when present.
pub fn validate_tag_dimensions(tags: &RawTagDimensions) -> TagValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let checks = [
        (Dimension::Category, tags.category.as_deref(), true),
        (Dimension::RecruitType, tags.recruit_type.as_deref(), false),
        (Dimension::Experience, tags.experience.as_deref(), false),
        (Dimension::Salary, tags.salary.as_deref(), false),
    ];
    for (dimension, value, required) in checks {
        if let Some(error) = validate_value(dimension, value, required).error {
            errors.push(error);
        }
    }

    let technologies = string_list(
        Dimension::Technologies,
        tags.technologies.as_ref(),
        &mut errors,
        &mut warnings,
    );
    let custom = string_list(
        Dimension::Custom,
        tags.custom.as_ref(),
        &mut errors,
        &mut warnings,
    );

    let normalized = TagDimensions {
        category: tags.category.clone().unwrap_or_default(),
        recruit_type: non_blank(&tags.recruit_type),
        location: non_blank(&tags.location),
        experience: non_blank(&tags.experience),
        salary: non_blank(&tags.salary),
        technologies,
        custom,
    };

    TagValidation {
        valid: errors.is_empty(),
        errors,
        warnings,
        normalized,
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Validates an optional array field and returns its cleaned contents.
///
/// The first non-string or blank element invalidates the whole array. Valid
/// arrays are trimmed and de-duplicated case-insensitively, with a warning for
/// each dropped duplicate.
fn string_list(
    dimension: Dimension,
    value: Option<&Value>,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) -> Vec<String> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.push(format!("{dimension} must be an array of non-empty strings"));
            return Vec::new();
        }
    };

    let well_formed = items
        .iter()
        .all(|item| item.as_str().is_some_and(|s| !s.trim().is_empty()));
    if !well_formed {
        errors.push(format!("{dimension} must be an array of non-empty strings"));
    }

    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();
    for item in items.iter().filter_map(Value::as_str).map(str::trim) {
        if item.is_empty() {
            continue;
        }
        if seen.insert(item.to_lowercase()) {
            cleaned.push(item.to_string());
        } else if well_formed {
            warnings.push(format!("{dimension} contains duplicate value '{item}'"));
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawTagDimensions {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn required_empty_value_is_invalid() {
        let check = validate_value(Dimension::Category, None, true);
        assert!(!check.valid);
        assert_eq!(check.error.as_deref(), Some("category is required"));
    }

    #[test]
    fn optional_empty_value_is_valid() {
        assert_eq!(
            validate_value(Dimension::RecruitType, Some(""), false),
            ValueCheck::ok()
        );
    }

    #[test]
    fn normalizable_value_is_still_rejected() {
        let check = validate_value(Dimension::RecruitType, Some("校招"), false);
        assert!(!check.valid);
        assert_eq!(
            check.error.as_deref(),
            Some("Invalid recruitType value '校招', expected normalized value 'newgrad'")
        );
    }

    #[test]
    fn unknown_value_lists_allowed_values() {
        let check = validate_value(Dimension::Category, Some("量化"), true);
        assert_eq!(
            check.error.as_deref(),
            Some("Invalid category value '量化'. Allowed values: SWE, Data, PM, Design, Infra, Other")
        );
    }

    #[test]
    fn free_form_dimension_accepts_anything() {
        assert!(validate_value(Dimension::Location, Some("杭州"), true).valid);
    }

    #[test]
    fn raw_chinese_category_is_rejected() {
        let report = validate_tag_dimensions(&raw(json!({"category": "算法"})));
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("'Data'"));
        assert_eq!(report.normalized.category, "算法");
    }

    #[test]
    fn missing_category_is_an_error() {
        let report = validate_tag_dimensions(&raw(json!({"recruitType": "intern"})));
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("category")));
    }

    #[test]
    fn valid_dimensions_default_arrays_to_empty() {
        let report = validate_tag_dimensions(&raw(json!({
            "category": "SWE",
            "recruitType": "newgrad",
            "location": "北京"
        })));

        assert!(report.valid, "{:?}", report.errors);
        assert!(report.warnings.is_empty());
        assert_eq!(report.normalized.location.as_deref(), Some("北京"));
        assert!(report.normalized.technologies.is_empty());
        assert!(report.normalized.custom.is_empty());
    }

    #[test]
    fn non_array_technologies_is_invalid() {
        let report = validate_tag_dimensions(&raw(json!({
            "category": "SWE",
            "technologies": "rust"
        })));

        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec!["technologies must be an array of non-empty strings"]
        );
        assert!(report.normalized.technologies.is_empty());
    }

    #[test]
    fn one_bad_element_invalidates_the_array_once() {
        let report = validate_tag_dimensions(&raw(json!({
            "category": "SWE",
            "custom": ["hot", 3, "", null]
        })));

        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.normalized.custom, vec!["hot"]);
    }

    #[test]
    fn duplicate_array_entries_are_dropped_with_warning() {
        let report = validate_tag_dimensions(&raw(json!({
            "category": "Data",
            "technologies": ["Python", " python ", "SQL"]
        })));

        assert!(report.valid);
        assert_eq!(report.normalized.technologies, vec!["Python", "SQL"]);
        assert_eq!(
            report.warnings,
            vec!["technologies contains duplicate value 'python'"]
        );
    }

    #[test]
    fn null_arrays_are_treated_as_absent() {
        let report = validate_tag_dimensions(&raw(json!({
            "category": "PM",
            "technologies": null
        })));
        assert!(report.valid);
    }
}
