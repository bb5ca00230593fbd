mod filter;
mod ids;
mod post;
mod tag_dimensions;

pub use filter::{DimensionType, FilterDimension, FilterOption, FilterOptions, ValueCount};
pub use ids::PostId;
pub use post::{NormalizedPost, Post, PostBuilder, PostDraft};
pub use tag_dimensions::{RawTagDimensions, TagDimensions};
