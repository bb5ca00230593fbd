//! Tag normalization and filter-option aggregation for shared interview posts.
//!
//! Posts ("面经") carry a company name and a set of classification tags. This
//! crate maps the informal values people type to canonical ones, validates
//! posts before they are stored, and builds the option lists a filter bar
//! offers from configuration plus what is actually in the store.

pub mod config;
pub mod db;
pub mod dimensions;
pub mod filters;
pub mod models;
pub mod normalize;
pub mod service;
pub mod store;
pub mod utils;
pub mod validation;

pub use config::{AppConfig, ConfigError};
pub use db::Database;
pub use dimensions::Dimension;
pub use filters::{DimensionCatalog, FilterAggregator, FilterOptionsCache};
pub use models::{
    DimensionType, FilterDimension, FilterOption, FilterOptions, NormalizedPost, Post,
    PostBuilder, PostDraft, PostId, RawTagDimensions, TagDimensions, ValueCount,
};
pub use service::{PostQuery, PostService, Submission};
