//! Filter options for the post list's filter bar.
//!
//! The [`DimensionCatalog`] says which dimensions exist and where their values
//! come from. The [`FilterAggregator`] turns that into concrete option lists by
//! querying a [`PostStore`](crate::store::PostStore), and the
//! [`FilterOptionsCache`] keeps the result for a TTL.

pub mod aggregator;
pub mod cache;
pub mod catalog;
mod months;

pub use aggregator::{
    FilterAggregator, FilterError, FilterStats, QueryTarget, merge_company, merge_values,
};
pub use cache::{FilterOptionsCache, FilterOptionsResponse};
pub use catalog::{DimensionCatalog, DimensionConfig, PredefinedValues, ValueSource};
pub use months::{MAX_PUBLISH_MONTHS, month_key, month_options};
