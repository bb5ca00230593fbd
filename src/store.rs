//! Read-only query surface the filter aggregator depends on.
//!
//! Any backing store works as long as it can answer these shapes; the crate
//! ships a SQLite implementation on [`Database`](crate::Database).

use anyhow::Result;

use crate::dimensions::Dimension;
use crate::models::ValueCount;

/// Number of posts created in one calendar month (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBucket {
    pub year: i32,
    /// 1-based month.
    pub month: u8,
    pub count: i64,
}

/// Aggregate queries over stored posts.
///
/// Implementations are shared across blocking worker threads and must be
/// `Send + Sync`.
pub trait PostStore: Send + Sync {
    /// Returns the distinct non-null, non-blank values stored for `dimension`.
    ///
    /// Array-valued dimensions are unnested. Derived dimensions yield nothing.
    fn distinct_values(&self, dimension: Dimension) -> Result<Vec<String>>;

    /// Returns posts grouped by creation month, most recent first, at most `limit` groups.
    fn publish_months(&self, limit: usize) -> Result<Vec<MonthBucket>>;

    /// Returns per-value post counts for `dimension`, most frequent first.
    fn value_counts(&self, dimension: Dimension) -> Result<Vec<ValueCount>>;

    /// Returns the total number of stored posts.
    fn count_posts(&self) -> Result<i64>;
}
