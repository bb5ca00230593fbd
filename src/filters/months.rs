use crate::models::FilterOption;
use crate::store::MonthBucket;

/// Most recent months offered by the publish-month filter.
pub const MAX_PUBLISH_MONTHS: usize = 24;

const MONTH_NAMES_ZH: [&str; 12] = [
    "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "十一月",
    "十二月",
];

const MONTH_NAMES_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Formats a month as its filter value, `YYYY-MM`.
pub fn month_key(year: i32, month: u8) -> String {
    format!("{year:04}-{month:02}")
}

/// Turns month buckets into filter options, most recent first.
///
/// Buckets with a month outside `1..=12` are skipped. At most
/// [`MAX_PUBLISH_MONTHS`] options are returned.
///
/// # Examples
///
/// ```
/// use mianjing::filters::month_options;
/// use mianjing::store::MonthBucket;
///
/// let options = month_options(vec![MonthBucket { year: 2024, month: 2, count: 1 }]);
/// assert_eq!(options[0].value, "2024-02");
/// assert_eq!(options[0].label, "2024年二月");
/// assert_eq!(options[0].label_en.as_deref(), Some("Feb 2024"));
/// ```
pub fn month_options(mut buckets: Vec<MonthBucket>) -> Vec<FilterOption> {
    buckets.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));

    buckets
        .into_iter()
        .filter_map(|bucket| {
            let index = usize::from(bucket.month).checked_sub(1)?;
            let zh = MONTH_NAMES_ZH.get(index)?;
            Some(FilterOption {
                value: month_key(bucket.year, bucket.month),
                label: format!("{}年{zh}", bucket.year),
                label_en: Some(format!("{} {}", MONTH_NAMES_EN[index], bucket.year)),
            })
        })
        .take(MAX_PUBLISH_MONTHS)
        .collect()
}
