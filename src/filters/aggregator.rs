use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{join_all, try_join_all};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;

use crate::dimensions::{Dimension, STANDARD_COMPANIES};
use crate::filters::catalog::{DimensionCatalog, DimensionConfig, ValueSource};
use crate::filters::months::{MAX_PUBLISH_MONTHS, month_key, month_options};
use crate::models::{FilterDimension, FilterOption, FilterOptions, ValueCount};
use crate::normalize::ValueNormalizer;
use crate::store::PostStore;

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// What a store query was answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTarget {
    Dimension(Dimension),
    PostCount,
}

impl From<Dimension> for QueryTarget {
    fn from(dimension: Dimension) -> Self {
        Self::Dimension(dimension)
    }
}

impl fmt::Display for QueryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimension(dimension) => write!(f, "{dimension}"),
            Self::PostCount => f.write_str("post count"),
        }
    }
}

/// Failure of one store query.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The store returned an error
    #[error("query for {target} failed: {source:#}")]
    Query {
        target: QueryTarget,
        #[source]
        source: anyhow::Error,
    },

    /// The query did not finish in time
    #[error("query for {target} timed out after {timeout:?}")]
    Timeout {
        target: QueryTarget,
        timeout: Duration,
    },

    /// The blocking worker panicked or was cancelled
    #[error("query worker for {target} failed: {source}")]
    Join {
        target: QueryTarget,
        #[source]
        source: JoinError,
    },
}

/// Per-dimension value counts, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStats {
    pub total_posts: i64,
    pub dimensions: IndexMap<String, Vec<ValueCount>>,
}

/// Builds filter options from the dimension catalog and the post store.
///
/// Dynamic dimensions are queried concurrently on blocking workers, each query
/// bounded by a timeout. If any query fails the whole pass is retried one
/// dimension at a time, and a dimension that still fails is served empty.
#[derive(Clone)]
pub struct FilterAggregator {
    store: Arc<dyn PostStore>,
    catalog: Arc<DimensionCatalog>,
    normalizer: Arc<ValueNormalizer>,
    query_timeout: Duration,
}

impl FilterAggregator {
    /// Creates an aggregator using the builtin normalizer and a 5 second timeout.
    pub fn new(store: Arc<dyn PostStore>, catalog: Arc<DimensionCatalog>) -> Self {
        Self {
            store,
            catalog,
            normalizer: Arc::new(ValueNormalizer::builtin()),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Arc<ValueNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &DimensionCatalog {
        &self.catalog
    }

    /// Computes the option list of every configured dimension, in catalog order.
    ///
    /// Never fails: a dimension whose query cannot be answered gets no values.
    pub async fn compute(&self) -> FilterOptions {
        let dynamic: Vec<&DimensionConfig> = self
            .catalog
            .iter()
            .filter(|config| matches!(config.source, ValueSource::Dynamic { .. }))
            .collect();

        let concurrent = try_join_all(dynamic.iter().map(|config| async move {
            let values = self.dynamic_values(config).await?;
            Ok::<_, FilterError>((config.dimension, values))
        }))
        .await;

        let mut discovered: HashMap<Dimension, Vec<FilterOption>> = match concurrent {
            Ok(results) => results.into_iter().collect(),
            Err(err) => {
                tracing::warn!(error = %err, "concurrent filter queries failed, retrying sequentially");
                self.compute_sequentially(&dynamic).await
            }
        };

        self.catalog
            .iter()
            .map(|config| {
                let values = match &config.source {
                    ValueSource::Fixed(values) => values.clone(),
                    ValueSource::Dynamic { .. } => {
                        discovered.remove(&config.dimension).unwrap_or_default()
                    }
                };
                let dimension = FilterDimension {
                    label: config.label.clone(),
                    label_en: config.label_en.clone(),
                    kind: config.kind(),
                    values,
                };
                (config.dimension.key().to_string(), dimension)
            })
            .collect()
    }

    async fn compute_sequentially(
        &self,
        dynamic: &[&DimensionConfig],
    ) -> HashMap<Dimension, Vec<FilterOption>> {
        let mut discovered = HashMap::with_capacity(dynamic.len());
        for config in dynamic {
            let values = match self.dynamic_values(config).await {
                Ok(values) => values,
                Err(err) => {
                    tracing::warn!(error = %err, "serving {} without values", config.dimension);
                    Vec::new()
                }
            };
            discovered.insert(config.dimension, values);
        }
        discovered
    }

    async fn dynamic_values(&self, config: &DimensionConfig) -> Result<Vec<FilterOption>, FilterError> {
        let dimension = config.dimension;

        if dimension == Dimension::PublishMonth {
            let buckets = self
                .run_blocking(dimension, |store| store.publish_months(MAX_PUBLISH_MONTHS))
                .await?;
            return Ok(month_options(buckets));
        }

        let found = self
            .run_blocking(dimension, move |store| store.distinct_values(dimension))
            .await?;

        let values = if dimension == Dimension::Company {
            merge_company(config.predefined(), &found, &self.normalizer)
        } else {
            merge_values(config.predefined(), found)
        };
        Ok(values.into_iter().map(FilterOption::plain).collect())
    }

    /// Returns the post total and per-dimension value counts.
    ///
    /// Every configured dimension is counted, fixed ones included. Failed
    /// queries are logged and reported as empty.
    pub async fn stats(&self) -> FilterStats {
        let total = self.run_blocking(QueryTarget::PostCount, |store| store.count_posts());

        let counts = join_all(self.catalog.iter().map(|config| async move {
            let dimension = config.dimension;
            let counts = if dimension == Dimension::PublishMonth {
                self.run_blocking(dimension, |store| store.publish_months(MAX_PUBLISH_MONTHS))
                    .await
                    .map(|buckets| {
                        buckets
                            .into_iter()
                            .map(|bucket| ValueCount {
                                value: month_key(bucket.year, bucket.month),
                                count: bucket.count,
                            })
                            .collect()
                    })
            } else {
                self.run_blocking(dimension, move |store| store.value_counts(dimension))
                    .await
            };

            let counts = counts.unwrap_or_else(|err| {
                tracing::warn!(error = %err, "no counts for {dimension}");
                Vec::new()
            });
            (dimension.key().to_string(), counts)
        }));

        let (total, dimensions) = futures::join!(total, counts);

        FilterStats {
            total_posts: total.unwrap_or_else(|err| {
                tracing::warn!(error = %err, "failed to count posts");
                0
            }),
            dimensions: dimensions.into_iter().collect(),
        }
    }

    async fn run_blocking<T, F>(
        &self,
        target: impl Into<QueryTarget>,
        query: F,
    ) -> Result<T, FilterError>
    where
        F: FnOnce(&dyn PostStore) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let target = target.into();
        let store = Arc::clone(&self.store);
        let task = tokio::task::spawn_blocking(move || query(store.as_ref()));

        match tokio::time::timeout(self.query_timeout, task).await {
            Err(_) => Err(FilterError::Timeout {
                target,
                timeout: self.query_timeout,
            }),
            Ok(Err(source)) => Err(FilterError::Join { target, source }),
            Ok(Ok(result)) => result.map_err(|source| FilterError::Query { target, source }),
        }
    }
}

/// Merges configured and discovered values.
///
/// Predefined values come first, then newly discovered ones, each group sorted
/// and free of duplicates. Blank values are dropped.
pub fn merge_values(predefined: &[String], discovered: Vec<String>) -> Vec<String> {
    let configured: BTreeSet<String> = predefined
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(String::from)
        .collect();

    let extra: BTreeSet<String> = discovered
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && !configured.contains(value))
        .collect();

    configured.into_iter().chain(extra).collect()
}

/// Merges configured companies with stored company names.
///
/// Each stored name is normalized. It is kept only when the normalized form is
/// a known company (predefined or standard), or the raw name is itself
/// predefined. Anything else is dropped.
pub fn merge_company(
    predefined: &[String],
    discovered: &[String],
    normalizer: &ValueNormalizer,
) -> Vec<String> {
    let configured: HashSet<&str> = predefined.iter().map(String::as_str).collect();

    let kept = discovered.iter().filter_map(|raw| {
        let normalized = normalizer.normalize(Dimension::Company, raw);
        if configured.contains(normalized.as_str()) || STANDARD_COMPANIES.contains(&normalized.as_str()) {
            Some(normalized)
        } else if configured.contains(raw.trim()) {
            Some(raw.trim().to_string())
        } else {
            tracing::debug!(company = %raw, "dropping unrecognized company");
            None
        }
    });

    merge_values(predefined, kept.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DimensionType;
    use crate::store::MonthBucket;
    use anyhow::bail;

    /// In-memory store with canned answers and an optional failing dimension.
    #[derive(Default)]
    struct FakeStore {
        values: HashMap<Dimension, Vec<String>>,
        months: Vec<MonthBucket>,
        failing: Option<Dimension>,
        slow: Option<Dimension>,
        failing_count: bool,
    }

    impl FakeStore {
        fn with(mut self, dimension: Dimension, values: &[&str]) -> Self {
            self.values
                .insert(dimension, values.iter().map(|v| v.to_string()).collect());
            self
        }

        fn check(&self, dimension: Dimension) -> anyhow::Result<()> {
            if self.slow == Some(dimension) {
                std::thread::sleep(Duration::from_millis(300));
            }
            if self.failing == Some(dimension) {
                bail!("{dimension} index unavailable");
            }
            Ok(())
        }
    }

    impl PostStore for FakeStore {
        fn distinct_values(&self, dimension: Dimension) -> anyhow::Result<Vec<String>> {
            self.check(dimension)?;
            Ok(self.values.get(&dimension).cloned().unwrap_or_default())
        }

        fn publish_months(&self, limit: usize) -> anyhow::Result<Vec<MonthBucket>> {
            self.check(Dimension::PublishMonth)?;
            Ok(self.months.iter().copied().take(limit).collect())
        }

        fn value_counts(&self, dimension: Dimension) -> anyhow::Result<Vec<ValueCount>> {
            self.check(dimension)?;
            Ok(self
                .values
                .get(&dimension)
                .map(|values| {
                    values
                        .iter()
                        .map(|value| ValueCount {
                            value: value.clone(),
                            count: 1,
                        })
                        .collect()
                })
                .unwrap_or_default())
        }

        fn count_posts(&self) -> anyhow::Result<i64> {
            if self.failing_count {
                bail!("posts table locked");
            }
            Ok(self.months.iter().map(|bucket| bucket.count).sum())
        }
    }

    fn catalog() -> Arc<DimensionCatalog> {
        let json = r#"{
            "company": {"label": "公司", "labelEn": "Company", "type": "dynamic",
                        "predefined": ["Google", "Meta"]},
            "category": {"label": "岗位类别", "type": "fixed",
                         "values": [{"value": "SWE", "label": "软件开发"}]},
            "location": {"label": "地点", "type": "dynamic",
                         "predefined": {"国内": ["上海", "北京"]}},
            "publishMonth": {"label": "发布时间", "type": "dynamic"}
        }"#;
        Arc::new(DimensionCatalog::from_json(json).unwrap())
    }

    fn values(options: &FilterOptions, key: &str) -> Vec<String> {
        options
            .get(key)
            .unwrap()
            .values
            .iter()
            .map(|option| option.value.clone())
            .collect()
    }

    #[test]
    fn merge_ranks_predefined_first() {
        let merged = merge_values(
            &["北京".to_string(), "上海".to_string()],
            vec!["杭州".into(), "北京".into(), " ".into(), "Austin".into()],
        );
        assert_eq!(merged, vec!["上海", "北京", "Austin", "杭州"]);
    }

    #[test]
    fn merge_company_drops_unknown_names() {
        let normalizer = ValueNormalizer::builtin();
        let merged = merge_company(
            &["Google".to_string(), "Meta".to_string()],
            &[
                "谷歌".into(),
                "META".into(),
                "Google 上海".into(),
                "小透明公司".into(),
            ],
            &normalizer,
        );
        assert_eq!(merged, vec!["Google", "Meta"]);
    }

    #[test]
    fn merge_company_keeps_standard_and_predefined_names() {
        let normalizer = ValueNormalizer::builtin();
        let merged = merge_company(
            &["Google".to_string(), "Shein".to_string()],
            &["鹅厂".into(), "Shein".into()],
            &normalizer,
        );
        assert_eq!(merged, vec!["Google", "Shein", "Tencent"]);
    }

    #[tokio::test]
    async fn compute_follows_catalog_order() {
        let store = FakeStore::default()
            .with(Dimension::Company, &["谷歌", "META", "小透明公司"])
            .with(Dimension::Location, &["杭州", "北京"]);
        let aggregator = FilterAggregator::new(Arc::new(store), catalog());

        let options = aggregator.compute().await;

        let keys: Vec<&str> = options.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["company", "category", "location", "publishMonth"]);
        assert_eq!(values(&options, "company"), vec!["Google", "Meta"]);
        assert_eq!(values(&options, "location"), vec!["上海", "北京", "杭州"]);

        let category = options.get("category").unwrap();
        assert_eq!(category.kind, DimensionType::Fixed);
        assert_eq!(category.values[0].label, "软件开发");

        let company = options.get("company").unwrap();
        assert_eq!(company.kind, DimensionType::Dynamic);
        assert_eq!(company.label_en.as_deref(), Some("Company"));
    }

    #[tokio::test]
    async fn publish_months_are_labelled() {
        let store = FakeStore {
            months: vec![
                MonthBucket {
                    year: 2024,
                    month: 2,
                    count: 1,
                },
                MonthBucket {
                    year: 2024,
                    month: 1,
                    count: 3,
                },
            ],
            ..FakeStore::default()
        };
        let aggregator = FilterAggregator::new(Arc::new(store), catalog());

        let options = aggregator.compute().await;
        let months = &options.get("publishMonth").unwrap().values;

        assert_eq!(months.len(), 2);
        assert_eq!(months[0].value, "2024-02");
        assert_eq!(months[0].label, "2024年二月");
        assert_eq!(months[1].value, "2024-01");
        assert_eq!(months[1].label, "2024年一月");
    }

    #[tokio::test]
    async fn failing_dimension_degrades_to_empty() {
        let store = FakeStore {
            failing: Some(Dimension::Location),
            ..FakeStore::default().with(Dimension::Company, &["Google"])
        };
        let aggregator = FilterAggregator::new(Arc::new(store), catalog());

        let options = aggregator.compute().await;

        assert!(options.get("location").unwrap().values.is_empty());
        assert_eq!(values(&options, "company"), vec!["Google", "Meta"]);
        assert_eq!(options.get("category").unwrap().values.len(), 1);
        assert_eq!(options.len(), 4);
    }

    #[tokio::test]
    async fn slow_dimension_times_out() {
        let store = FakeStore {
            slow: Some(Dimension::Location),
            ..FakeStore::default().with(Dimension::Location, &["杭州"])
        };
        let aggregator = FilterAggregator::new(Arc::new(store), catalog())
            .with_query_timeout(Duration::from_millis(50));

        let options = aggregator.compute().await;

        assert!(options.get("location").unwrap().values.is_empty());
        assert_eq!(values(&options, "company"), vec!["Google", "Meta"]);
    }

    #[tokio::test]
    async fn empty_catalog_yields_empty_options() {
        let aggregator = FilterAggregator::new(
            Arc::new(FakeStore::default()),
            Arc::new(DimensionCatalog::empty()),
        );
        assert!(aggregator.compute().await.is_empty());
    }

    #[tokio::test]
    async fn stats_count_every_dimension() {
        let store = FakeStore {
            months: vec![MonthBucket {
                year: 2024,
                month: 1,
                count: 3,
            }],
            failing: Some(Dimension::Location),
            ..FakeStore::default().with(Dimension::Category, &["SWE"])
        };
        let aggregator = FilterAggregator::new(Arc::new(store), catalog());

        let stats = aggregator.stats().await;

        assert_eq!(stats.total_posts, 3);
        assert_eq!(stats.dimensions.len(), 4);
        assert_eq!(stats.dimensions.get("category").unwrap()[0].value, "SWE");
        assert!(stats.dimensions.get("location").unwrap().is_empty());
        assert_eq!(
            stats.dimensions.get("publishMonth").unwrap(),
            &vec![ValueCount {
                value: "2024-01".to_string(),
                count: 3
            }]
        );
    }

    #[test]
    fn errors_name_the_dimension() {
        let err = FilterError::Timeout {
            target: Dimension::Location.into(),
            timeout: Duration::from_millis(50),
        };
        assert_eq!(err.to_string(), "query for location timed out after 50ms");
    }

    #[tokio::test]
    async fn failed_post_count_is_not_blamed_on_a_dimension() {
        let store = FakeStore {
            failing_count: true,
            ..FakeStore::default().with(Dimension::Company, &["Google"])
        };
        let aggregator = FilterAggregator::new(Arc::new(store), catalog());

        let err = aggregator
            .run_blocking(QueryTarget::PostCount, |store| store.count_posts())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FilterError::Query {
                target: QueryTarget::PostCount,
                ..
            }
        ));
        assert!(err.to_string().starts_with("query for post count failed"), "{err}");

        let stats = aggregator.stats().await;
        assert_eq!(stats.total_posts, 0);
        assert_eq!(stats.dimensions.get("company").unwrap()[0].value, "Google");
    }
}
