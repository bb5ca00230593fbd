/// Per-dimension matching strategy.
///
/// Implementations receive a trimmed, non-empty value and return its canonical
/// form, or `None` when they have no mapping for it.
pub trait ValueMatcher: Send + Sync {
    fn matches(&self, value: &str) -> Option<String>;
}

/// Matcher for dimensions with a standard value set and an ordered alias list.
///
/// Standard values map to themselves in any casing. Otherwise aliases are
/// scanned in order and the first one that equals, contains, or is contained
/// by the value (case-insensitively) wins.
#[derive(Debug, Clone)]
pub struct AliasMatcher {
    standard: Vec<String>,
    aliases: Vec<(String, String)>,
}

impl AliasMatcher {
    /// Creates a matcher from a standard value set and an ordered alias list.
    ///
    /// # Examples
    ///
    /// ```
    /// use mianjing::normalize::{AliasMatcher, ValueMatcher};
    ///
    /// let matcher = AliasMatcher::new(&["intern", "newgrad"], &[("实习", "intern")]);
    /// assert_eq!(matcher.matches("intern"), Some("intern".to_string()));
    /// assert_eq!(matcher.matches("NewGrad"), Some("newgrad".to_string()));
    /// assert_eq!(matcher.matches("暑期实习"), Some("intern".to_string()));
    /// assert_eq!(matcher.matches("contract"), None);
    /// ```
    pub fn new(standard: &[&str], aliases: &[(&str, &str)]) -> Self {
        Self {
            standard: standard.iter().map(|s| s.to_string()).collect(),
            aliases: aliases
                .iter()
                .map(|(alias, canonical)| (alias.to_lowercase(), canonical.to_string()))
                .collect(),
        }
    }
}

impl ValueMatcher for AliasMatcher {
    fn matches(&self, value: &str) -> Option<String> {
        if self.standard.iter().any(|s| s == value) {
            return Some(value.to_string());
        }

        let lowered = value.to_lowercase();
        if let Some(standard) = self.standard.iter().find(|s| s.to_lowercase() == lowered) {
            return Some(standard.clone());
        }

        self.aliases
            .iter()
            .find(|(alias, _)| {
                *alias == lowered || alias.contains(&lowered) || lowered.contains(alias.as_str())
            })
            .map(|(_, canonical)| canonical.clone())
    }
}
