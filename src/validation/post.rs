use serde::Serialize;

use super::validate_tag_dimensions;
use crate::dimensions::Dimension;
use crate::models::{NormalizedPost, PostDraft};
use crate::normalize::normalize;

/// Outcome of normalizing a candidate post.
///
/// `post` is populated even when `valid` is false so callers can decide
/// whether to reject it or ask for a correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostValidation {
    pub valid: bool,
    pub post: NormalizedPost,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Normalizes a candidate post's tags and validates the result.
///
/// `category`, `recruitType`, `experience` and `salary` are run through the
/// value normalizer before validation; each change is reported as a warning.
/// `title` and `company` must be present.
///
/// # Examples
///
/// ```
/// use mianjing::{PostDraft, RawTagDimensions};
/// use mianjing::validation::validate_and_normalize_post;
///
/// let draft = PostDraft {
///     title: "t".to_string(),
///     company: "c".to_string(),
///     tag_dimensions: RawTagDimensions {
///         category: Some("算法".to_string()),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
///
/// let result = validate_and_normalize_post(&draft);
/// assert!(result.valid);
/// assert_eq!(result.post.tag_dimensions.category, "Data");
/// assert_eq!(result.warnings, vec!["category value '算法' normalized to 'Data'"]);
/// ```
pub fn validate_and_normalize_post(draft: &PostDraft) -> PostValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let title = draft.title.trim();
    if title.is_empty() {
        errors.push("title is required".to_string());
    }
    let company = draft.company.trim();
    if company.is_empty() {
        errors.push("company is required".to_string());
    }

    let mut tags = draft.tag_dimensions.clone();
    let fields = [
        (Dimension::Category, &mut tags.category),
        (Dimension::RecruitType, &mut tags.recruit_type),
        (Dimension::Experience, &mut tags.experience),
        (Dimension::Salary, &mut tags.salary),
    ];
    for (dimension, slot) in fields {
        let Some(original) = slot.as_deref() else {
            continue;
        };
        let normalized = normalize(dimension, original);
        if !normalized.is_empty() && normalized != original {
            warnings.push(format!(
                "{dimension} value '{original}' normalized to '{normalized}'"
            ));
        }
        *slot = Some(normalized).filter(|value| !value.is_empty());
    }

    let report = validate_tag_dimensions(&tags);
    errors.extend(report.errors);
    warnings.extend(report.warnings);

    PostValidation {
        valid: errors.is_empty(),
        post: NormalizedPost {
            title: title.to_string(),
            company: company.to_string(),
            content: draft.content.clone(),
            tag_dimensions: report.normalized,
        },
        errors,
        warnings,
    }
}
