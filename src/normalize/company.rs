use std::collections::HashMap;

use super::ValueMatcher;

/// Aliases shorter than this many characters only match exactly.
const MIN_PARTIAL_ALIAS_CHARS: usize = 2;

/// Matcher for company names.
///
/// Company names vary far more than other dimensions (slang, spacing, casing),
/// so matching is space- and case-insensitive and falls back to substring
/// containment, preferring the longest alias that fits.
#[derive(Debug, Clone)]
pub struct CompanyMatcher {
    standard: HashMap<String, String>,
    exact_aliases: HashMap<String, String>,
    /// Lowercased aliases eligible for containment, longest first.
    partial_aliases: Vec<(String, String)>,
}

impl CompanyMatcher {
    /// Creates a matcher from canonical company names and `(alias, canonical)` pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use mianjing::normalize::{CompanyMatcher, ValueMatcher};
    ///
    /// let matcher = CompanyMatcher::new(&["Meta", "Ant Group"], &[("买它", "Meta")]);
    /// assert_eq!(matcher.matches("META"), Some("Meta".to_string()));
    /// assert_eq!(matcher.matches("antgroup"), Some("Ant Group".to_string()));
    /// assert_eq!(matcher.matches("买它 SDE 二面"), Some("Meta".to_string()));
    /// ```
    pub fn new(standard: &[&str], aliases: &[(&str, &str)]) -> Self {
        let standard_names = standard
            .iter()
            .map(|name| (compact(name), name.to_string()))
            .collect();

        let mut exact_aliases = HashMap::new();
        for (alias, canonical) in aliases {
            exact_aliases
                .entry(compact(alias))
                .or_insert_with(|| canonical.to_string());
        }

        // Canonical names also match by containment, as in "Google 上海".
        let mut partial_aliases: Vec<(String, String)> = aliases
            .iter()
            .map(|(alias, canonical)| (alias.to_lowercase(), canonical.to_string()))
            .chain(standard.iter().map(|name| (compact(name), name.to_string())))
            .filter(|(alias, _)| alias.chars().count() >= MIN_PARTIAL_ALIAS_CHARS)
            .collect();
        // Stable sort keeps configuration order among equal lengths.
        partial_aliases.sort_by_key(|(alias, _)| std::cmp::Reverse(alias.chars().count()));

        Self {
            standard: standard_names,
            exact_aliases,
            partial_aliases,
        }
    }
}

impl ValueMatcher for CompanyMatcher {
    fn matches(&self, value: &str) -> Option<String> {
        let compacted = compact(value);

        if let Some(name) = self.standard.get(&compacted) {
            return Some(name.clone());
        }
        if let Some(canonical) = self.exact_aliases.get(&compacted) {
            return Some(canonical.clone());
        }

        let lowered = value.to_lowercase();
        self.partial_aliases
            .iter()
            .find(|(alias, _)| compacted.contains(alias.as_str()) || lowered.contains(alias.as_str()))
            .map(|(_, canonical)| canonical.clone())
    }
}

/// Lowercases and strips all whitespace.
fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> CompanyMatcher {
        CompanyMatcher::new(
            &["Google", "Meta", "Tencent", "Ant Group"],
            &[
                ("谷歌", "Google"),
                ("买它", "Meta"),
                ("fb", "Meta"),
                ("鹅", "Tencent"),
            ],
        )
    }

    #[test]
    fn compact_strips_spaces_and_case() {
        assert_eq!(compact(" Ant  Group "), "antgroup");
        assert_eq!(compact("谷 歌"), "谷歌");
    }

    #[test]
    fn standard_name_matches_regardless_of_spacing() {
        assert_eq!(matcher().matches("ant group"), Some("Ant Group".to_string()));
        assert_eq!(matcher().matches("AntGroup"), Some("Ant Group".to_string()));
    }

    #[test]
    fn exact_alias_ignores_spaces() {
        assert_eq!(matcher().matches("谷 歌"), Some("Google".to_string()));
    }

    #[test]
    fn single_char_alias_only_matches_exactly() {
        assert_eq!(matcher().matches("鹅"), Some("Tencent".to_string()));
        assert_eq!(matcher().matches("鹅肝"), None);
    }

    #[test]
    fn partial_match_uses_spaced_or_compact_form() {
        assert_eq!(matcher().matches("FB infra"), Some("Meta".to_string()));
        assert_eq!(matcher().matches("谷歌 上海"), Some("Google".to_string()));
    }

    #[test]
    fn canonical_name_with_suffix_matches() {
        assert_eq!(matcher().matches("Google 上海"), Some("Google".to_string()));
        assert_eq!(matcher().matches("Meta Platforms"), Some("Meta".to_string()));
        assert_eq!(matcher().matches("蚂蚁 Ant Group 杭州"), Some("Ant Group".to_string()));
    }

    #[test]
    fn longest_alias_wins() {
        let matcher = CompanyMatcher::new(
            &["Meta", "Netflix"],
            &[("买它", "Meta"), ("买它Ng", "Netflix")],
        );
        assert_eq!(matcher.matches("买它ng 面经"), Some("Netflix".to_string()));
        assert_eq!(matcher.matches("买它 面经"), Some("Meta".to_string()));
    }

    #[test]
    fn unknown_company_is_unmatched() {
        assert_eq!(matcher().matches("小透明公司"), None);
    }
}
