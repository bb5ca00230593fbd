//! Value normalization: mapping raw, informal strings to canonical dimension values.
//!
//! Posts arrive with free-typed classification values: Chinese slang for
//! companies ("鹅厂", "买它"), localized category names ("算法"), mixed casing
//! and stray whitespace. [`ValueNormalizer`] resolves each value through the
//! [`ValueMatcher`] registered for its [`Dimension`]:
//!
//! - general dimensions use an [`AliasMatcher`] (standard value, then ordered
//!   fuzzy alias scan);
//! - `company` uses a [`CompanyMatcher`] (space/case-insensitive exact match,
//!   then longest-alias-first containment);
//! - dimensions with no matcher pass values through.
//!
//! A value with no mapping is returned trimmed but otherwise unchanged, so that
//! downstream validation can report it instead of silently losing data.
//!
//! # Examples
//!
//! ```
//! use mianjing::Dimension;
//! use mianjing::normalize::normalize;
//!
//! assert_eq!(normalize(Dimension::Category, "算法"), "Data");
//! assert_eq!(normalize(Dimension::Company, "鹅厂"), "Tencent");
//! assert_eq!(normalize(Dimension::RecruitType, "  校招 "), "newgrad");
//! assert_eq!(normalize(Dimension::Company, "小透明公司"), "小透明公司");
//! assert_eq!(normalize(Dimension::Category, "   "), "");
//! ```

pub mod aliases;
mod company;
mod matcher;

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::dimensions::{
    CATEGORY_VALUES, Dimension, EXPERIENCE_VALUES, RECRUIT_TYPE_VALUES, SALARY_VALUES,
    STANDARD_COMPANIES,
};

pub use company::CompanyMatcher;
pub use matcher::{AliasMatcher, ValueMatcher};

/// Process-wide normalizer built from the builtin alias tables.
static BUILTIN: LazyLock<ValueNormalizer> = LazyLock::new(ValueNormalizer::builtin);

/// Normalizes `raw` for `dimension` using the builtin tables.
pub fn normalize(dimension: Dimension, raw: &str) -> String {
    BUILTIN.normalize(dimension, raw)
}

/// Returns the process-wide builtin normalizer.
pub fn builtin() -> &'static ValueNormalizer {
    &BUILTIN
}

/// Registry of per-dimension matchers.
#[derive(Default)]
pub struct ValueNormalizer {
    matchers: HashMap<Dimension, Box<dyn ValueMatcher>>,
}

impl ValueNormalizer {
    /// Creates a normalizer with no matchers; every value passes through trimmed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a normalizer wired with the builtin standard sets and alias tables.
    pub fn builtin() -> Self {
        Self::new()
            .with_matcher(
                Dimension::Company,
                CompanyMatcher::new(STANDARD_COMPANIES, aliases::COMPANY_ALIASES),
            )
            .with_matcher(
                Dimension::Category,
                AliasMatcher::new(CATEGORY_VALUES, aliases::CATEGORY_ALIASES),
            )
            .with_matcher(
                Dimension::RecruitType,
                AliasMatcher::new(RECRUIT_TYPE_VALUES, aliases::RECRUIT_TYPE_ALIASES),
            )
            .with_matcher(
                Dimension::Experience,
                AliasMatcher::new(EXPERIENCE_VALUES, aliases::EXPERIENCE_ALIASES),
            )
            .with_matcher(
                Dimension::Salary,
                AliasMatcher::new(SALARY_VALUES, aliases::SALARY_ALIASES),
            )
    }

    /// Registers (or replaces) the matcher for `dimension`.
    pub fn with_matcher(mut self, dimension: Dimension, matcher: impl ValueMatcher + 'static) -> Self {
        self.matchers.insert(dimension, Box::new(matcher));
        self
    }

    /// Returns the canonical value for `raw`, or `raw` trimmed when nothing maps it.
    ///
    /// Empty and whitespace-only input yields an empty string.
    pub fn normalize(&self, dimension: Dimension, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let Some(matcher) = self.matchers.get(&dimension) else {
            return trimmed.to_string();
        };

        match matcher.matches(trimmed) {
            Some(canonical) => canonical,
            None => {
                tracing::debug!(%dimension, value = trimmed, "no canonical mapping");
                trimmed.to_string()
            }
        }
    }
}
