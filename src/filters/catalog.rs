use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::ConfigError;
use crate::dimensions::Dimension;
use crate::models::{DimensionType, FilterOption};

const BUILTIN_CONFIG: &str = include_str!("../../config/dimensions.json");

/// Predefined values for a dynamic dimension, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PredefinedValues {
    FlatList(Vec<String>),
    GroupedByCategory(IndexMap<String, Vec<String>>),
}

impl PredefinedValues {
    /// Flattens into one list in configuration order, keeping first occurrences.
    pub fn flatten(self) -> Vec<String> {
        let values: Vec<String> = match self {
            Self::FlatList(values) => values,
            Self::GroupedByCategory(groups) => groups.into_values().flatten().collect(),
        };

        let mut seen = HashSet::new();
        values
            .into_iter()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty() && seen.insert(value.clone()))
            .collect()
    }
}

/// One dimension entry as written in configuration.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawDimension {
    Fixed {
        label: String,
        #[serde(default, rename = "labelEn")]
        label_en: Option<String>,
        #[serde(default)]
        values: Vec<FilterOption>,
    },
    Dynamic {
        label: String,
        #[serde(default, rename = "labelEn")]
        label_en: Option<String>,
        #[serde(default)]
        predefined: Option<PredefinedValues>,
    },
}

/// Where a configured dimension gets its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Closed value set served verbatim.
    Fixed(Vec<FilterOption>),
    /// Values discovered in the store, seeded with `predefined`.
    Dynamic { predefined: Vec<String> },
}

/// A resolved dimension entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionConfig {
    pub dimension: Dimension,
    pub label: String,
    pub label_en: Option<String>,
    pub source: ValueSource,
}

impl DimensionConfig {
    pub fn kind(&self) -> DimensionType {
        match self.source {
            ValueSource::Fixed(_) => DimensionType::Fixed,
            ValueSource::Dynamic { .. } => DimensionType::Dynamic,
        }
    }

    /// Returns the flattened predefined values, empty for fixed dimensions.
    pub fn predefined(&self) -> &[String] {
        match &self.source {
            ValueSource::Fixed(_) => &[],
            ValueSource::Dynamic { predefined } => predefined,
        }
    }
}

/// The configured filter dimensions, in configuration order.
///
/// Loaded once at startup. Unknown dimension keys are skipped with a warning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionCatalog {
    entries: Vec<DimensionConfig>,
}

impl DimensionCatalog {
    /// Creates a catalog with no dimensions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the catalog shipped with the crate (`config/dimensions.json`).
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_CONFIG).unwrap_or_else(|err| {
            tracing::error!(error = %err, "builtin dimension config is invalid");
            Self::empty()
        })
    }

    /// Parses a catalog from a JSON object keyed by dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a JSON object or an entry for a
    /// known dimension has the wrong shape.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let document: Map<String, Value> = serde_json::from_str(json)?;

        let mut entries = Vec::with_capacity(document.len());
        for (key, value) in document {
            let Ok(dimension) = key.parse::<Dimension>() else {
                tracing::warn!(key = %key, "skipping unknown dimension in config");
                continue;
            };

            let raw: RawDimension = serde_json::from_value(value)
                .map_err(|source| ConfigError::InvalidDimension { key, source })?;

            entries.push(match raw {
                RawDimension::Fixed {
                    label,
                    label_en,
                    values,
                } => DimensionConfig {
                    dimension,
                    label,
                    label_en,
                    source: ValueSource::Fixed(values),
                },
                RawDimension::Dynamic {
                    label,
                    label_en,
                    predefined,
                } => DimensionConfig {
                    dimension,
                    label,
                    label_en,
                    source: ValueSource::Dynamic {
                        predefined: predefined.map(PredefinedValues::flatten).unwrap_or_default(),
                    },
                },
            });
        }

        Ok(Self { entries })
    }

    /// Reads and parses a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Reads a catalog file, degrading to an empty catalog on any failure.
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "continuing without filter dimensions");
            Self::empty()
        })
    }

    /// Loads the catalog at `path`, or the builtin catalog when no path is set.
    pub fn resolve(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load_or_empty(path),
            None => Self::builtin(),
        }
    }

    pub fn get(&self, dimension: Dimension) -> Option<&DimensionConfig> {
        self.entries.iter().find(|entry| entry.dimension == dimension)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DimensionConfig> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::{CATEGORY_VALUES, EXPERIENCE_VALUES, RECRUIT_TYPE_VALUES, SALARY_VALUES};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn builtin_config_parses_in_order() {
        let catalog = DimensionCatalog::builtin();
        let keys: Vec<&str> = catalog.iter().map(|entry| entry.dimension.key()).collect();

        assert_eq!(
            keys,
            vec![
                "company",
                "category",
                "recruitType",
                "location",
                "experience",
                "salary",
                "technologies",
                "custom",
                "publishMonth"
            ]
        );
    }

    #[test]
    fn builtin_fixed_values_match_standard_sets() {
        let catalog = DimensionCatalog::builtin();

        for (dimension, standard) in [
            (Dimension::Category, CATEGORY_VALUES),
            (Dimension::RecruitType, RECRUIT_TYPE_VALUES),
            (Dimension::Experience, EXPERIENCE_VALUES),
            (Dimension::Salary, SALARY_VALUES),
        ] {
            let entry = catalog.get(dimension).expect("dimension configured");
            let ValueSource::Fixed(values) = &entry.source else {
                panic!("{dimension} should be fixed");
            };
            let configured: Vec<&str> = values.iter().map(|v| v.value.as_str()).collect();
            assert_eq!(configured, standard, "{dimension}");
        }
    }

    #[test]
    fn builtin_predefined_companies_are_standard() {
        let catalog = DimensionCatalog::builtin();
        let company = catalog.get(Dimension::Company).unwrap();

        assert!(!company.predefined().is_empty());
        for name in company.predefined() {
            assert!(Dimension::Company.is_standard(name), "{name}");
        }
    }

    #[test]
    fn grouped_predefined_values_keep_configuration_order() {
        let catalog = DimensionCatalog::from_json(
            r#"{"location": {"label": "地点", "type": "dynamic",
                "predefined": {"b": ["上海", "北京"], "a": ["Seattle", "北京"]}}}"#,
        )
        .unwrap();

        let location = catalog.get(Dimension::Location).unwrap();
        assert_eq!(location.kind(), DimensionType::Dynamic);
        assert_eq!(location.predefined(), ["上海", "北京", "Seattle"]);
        assert_eq!(location.label_en, None);
    }

    #[test]
    fn dynamic_without_predefined_is_empty() {
        let catalog =
            DimensionCatalog::from_json(r#"{"custom": {"label": "标签", "type": "dynamic"}}"#)
                .unwrap();
        assert!(catalog.get(Dimension::Custom).unwrap().predefined().is_empty());
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let catalog = DimensionCatalog::from_json(
            r#"{"level": {"label": "职级", "type": "dynamic"},
                "salary": {"label": "月薪", "type": "fixed", "values": []}}"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(Dimension::Salary).is_some());
    }

    #[test]
    fn malformed_entry_is_an_error() {
        let err = DimensionCatalog::from_json(r#"{"company": {"label": "公司", "type": "magic"}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDimension { ref key, .. } if key == "company"));
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let catalog = DimensionCatalog::load_or_empty(Path::new("/nonexistent/dimensions.json"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn unparseable_file_degrades_to_empty() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        assert!(matches!(
            DimensionCatalog::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
        assert!(DimensionCatalog::load_or_empty(file.path()).is_empty());
    }

    #[test]
    fn resolve_prefers_explicit_path() {
        assert_eq!(DimensionCatalog::resolve(None), DimensionCatalog::builtin());
        assert!(DimensionCatalog::resolve(Some(Path::new("/nonexistent/d.json"))).is_empty());
    }

    #[test]
    fn file_catalog_loads() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"company": {{"label": "公司", "type": "dynamic", "predefined": ["Google"]}}}}"#
        )
        .unwrap();

        let catalog = DimensionCatalog::load_or_empty(file.path());
        assert_eq!(catalog.get(Dimension::Company).unwrap().predefined(), ["Google"]);
    }
}
