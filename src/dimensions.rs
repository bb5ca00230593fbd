//! Classification dimensions and their standard value sets.
//!
//! A dimension is one facet a post can be filtered by. Some dimensions carry a
//! closed set of canonical tokens; every other layer (normalizer, validator,
//! aggregator, store) dispatches on [`Dimension`] rather than on raw strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical job categories.
pub const CATEGORY_VALUES: &[&str] = &["SWE", "Data", "PM", "Design", "Infra", "Other"];

/// Canonical recruiting channels.
pub const RECRUIT_TYPE_VALUES: &[&str] = &["intern", "newgrad", "experienced"];

/// Canonical years-of-experience buckets.
pub const EXPERIENCE_VALUES: &[&str] = &["0-1", "1-3", "3-5", "5-10", "10+"];

/// Canonical monthly salary buckets.
pub const SALARY_VALUES: &[&str] = &["0-10k", "10-20k", "20-30k", "30-50k", "50k+"];

/// Canonical company names, in their display casing.
pub const STANDARD_COMPANIES: &[&str] = &[
    "Google",
    "Meta",
    "Amazon",
    "Microsoft",
    "Apple",
    "Netflix",
    "ByteDance",
    "Alibaba",
    "Tencent",
    "Baidu",
    "Meituan",
    "JD",
    "Pinduoduo",
    "Kuaishou",
    "Xiaomi",
    "Huawei",
    "NetEase",
    "Didi",
    "Nvidia",
    "Tesla",
    "Ant Group",
    "Shopee",
    "LinkedIn",
    "Uber",
    "Airbnb",
];

/// A named facet of post classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Company,
    Category,
    RecruitType,
    Location,
    Experience,
    Salary,
    Technologies,
    Custom,
    /// Derived from the creation timestamp; never stored as a field.
    PublishMonth,
}

/// Where a dimension's values live in the `posts` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredField {
    /// A nullable text column holding one value.
    Scalar(&'static str),
    /// A text column holding a JSON array of strings.
    Array(&'static str),
}

impl Dimension {
    /// Every dimension, in display order.
    pub const ALL: [Dimension; 9] = [
        Dimension::Company,
        Dimension::Category,
        Dimension::RecruitType,
        Dimension::Location,
        Dimension::Experience,
        Dimension::Salary,
        Dimension::Technologies,
        Dimension::Custom,
        Dimension::PublishMonth,
    ];

    /// Returns the wire key used in configuration, JSON payloads and messages.
    pub fn key(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Category => "category",
            Self::RecruitType => "recruitType",
            Self::Location => "location",
            Self::Experience => "experience",
            Self::Salary => "salary",
            Self::Technologies => "technologies",
            Self::Custom => "custom",
            Self::PublishMonth => "publishMonth",
        }
    }

    /// Returns the authoritative value set, if this dimension has one.
    pub fn standard_values(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Category => Some(CATEGORY_VALUES),
            Self::RecruitType => Some(RECRUIT_TYPE_VALUES),
            Self::Experience => Some(EXPERIENCE_VALUES),
            Self::Salary => Some(SALARY_VALUES),
            Self::Company => Some(STANDARD_COMPANIES),
            Self::Location | Self::Technologies | Self::Custom | Self::PublishMonth => None,
        }
    }

    /// Returns true if `value` is exactly one of this dimension's standard values.
    pub fn is_standard(self, value: &str) -> bool {
        self.standard_values()
            .is_some_and(|values| values.contains(&value))
    }

    /// Returns the column backing this dimension, or `None` for derived dimensions.
    pub fn stored_field(self) -> Option<StoredField> {
        match self {
            Self::Company => Some(StoredField::Scalar("company")),
            Self::Category => Some(StoredField::Scalar("category")),
            Self::RecruitType => Some(StoredField::Scalar("recruit_type")),
            Self::Location => Some(StoredField::Scalar("location")),
            Self::Experience => Some(StoredField::Scalar("experience")),
            Self::Salary => Some(StoredField::Scalar("salary")),
            Self::Technologies => Some(StoredField::Array("technologies")),
            Self::Custom => Some(StoredField::Array("custom_tags")),
            Self::PublishMonth => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when parsing an unknown dimension key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dimension '{0}'")]
pub struct UnknownDimension(pub String);

impl FromStr for Dimension {
    type Err = UnknownDimension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dimension| dimension.key() == s)
            .ok_or_else(|| UnknownDimension(s.to_string()))
    }
}
