//! Suggestion aggregation for one analysis run.
//!
//! A `SuggestionSet` collects finding codes from independent rule functions.
//! Codes are unique and keep first-insertion order, which is the order the
//! learner sees them in. Each code may carry named placeholders for later
//! rendering. Severity weights are looked up at read time, so
//! `total_severity` always reflects the current comments.

use crate::error::RuleError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// A finding code with optional named placeholders (e.g. `name = "x"`).
///
/// Identity is the code alone; placeholders never take part in dedup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    code: String,
    params: BTreeMap<String, String>,
}

impl Comment {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_params<K, V, I>(code: impl Into<String>, params: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            code: code.into(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

// Bare code string when there is nothing to fill in, otherwise
// `{"comment": code, "params": {...}}`.
impl Serialize for Comment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.params.is_empty() {
            return serializer.serialize_str(&self.code);
        }
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("comment", &self.code)?;
        map.serialize_entry("params", &self.params)?;
        map.end()
    }
}

/// Per-run aggregation of unique comments, severity weights, and rule errors.
#[derive(Debug, Default)]
pub struct SuggestionSet {
    comments: Vec<Comment>,
    severity: HashMap<String, u32>,
    errors: Vec<RuleError>,
}

impl SuggestionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh set seeded with a severity table, typically a registry's defaults.
    pub fn with_severities<K, I>(table: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, u32)>,
    {
        let mut set = Self::new();
        set.register_severities(table);
        set
    }

    /// Insert `code` unless it is already present.
    pub fn append_unique(&mut self, code: impl Into<String>) {
        self.insert(Comment::new(code));
    }

    /// Insert `code` with placeholders unless the code is already present.
    ///
    /// When the code exists the whole call is a no-op, so the payload of the
    /// first insertion is the one that gets rendered.
    pub fn append_unique_with_placeholders<K, V, I>(&mut self, code: impl Into<String>, params: I)
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.insert(Comment::with_params(code, params));
    }

    fn insert(&mut self, comment: Comment) {
        if let Some(existing) = self.comments.iter().find(|c| c.code == comment.code) {
            if existing.params != comment.params && !comment.params.is_empty() {
                debug!(code = %comment.code, "placeholders dropped for already reported code");
            }
            return;
        }
        debug!(code = %comment.code, "suggestion added");
        self.comments.push(comment);
    }

    /// Merge weights into the severity table; entries for the same code overwrite.
    pub fn register_severities<K, I>(&mut self, table: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, u32)>,
    {
        for (code, weight) in table {
            self.severity.insert(code.into(), weight);
        }
    }

    /// Record a rule anomaly. `None` and blank messages are dropped.
    pub fn report_error(&mut self, err: impl Into<Option<RuleError>>) {
        let err: Option<RuleError> = err.into();
        let Some(err) = err else {
            return;
        };
        if err.is_empty() {
            return;
        }
        warn!(error = %err, "rule reported an error");
        self.errors.push(err);
    }

    pub fn contains(&self, code: &str) -> bool {
        self.comments.iter().any(|c| c.code == code)
    }

    /// Weight of a single code; 0 when the table has no entry.
    pub fn severity_of(&self, code: &str) -> u32 {
        self.severity.get(code).copied().unwrap_or(0)
    }

    /// Sum of the weights of the current comments.
    pub fn total_severity(&self) -> u32 {
        self.comments
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(self.severity_of(&c.code)))
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn errors(&self) -> &[RuleError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(set: &SuggestionSet) -> Vec<&str> {
        set.comments().iter().map(Comment::code).collect()
    }

    #[test]
    fn test_append_unique_ignores_duplicates_and_keeps_order() {
        let mut once = SuggestionSet::new();
        once.append_unique("go.b");
        once.append_unique("go.a");

        let mut twice = SuggestionSet::new();
        twice.append_unique("go.b");
        twice.append_unique("go.a");
        twice.append_unique("go.b");
        twice.append_unique("go.a");

        assert_eq!(codes(&once), vec!["go.b", "go.a"]);
        assert_eq!(codes(&once), codes(&twice));
        assert!(twice.contains("go.a"));
        assert!(!twice.contains("go.c"));
    }

    #[test]
    fn test_first_placeholder_payload_wins() {
        let mut set = SuggestionSet::new();
        set.append_unique_with_placeholders("go.extra_var", [("name", "x")]);
        set.append_unique_with_placeholders("go.extra_var", [("name", "y")]);
        set.append_unique("go.extra_var");

        assert_eq!(set.comments().len(), 1);
        assert_eq!(
            set.comments()[0].params().get("name").map(String::as_str),
            Some("x")
        );
    }

    #[test]
    fn test_plain_code_blocks_later_placeholders() {
        let mut set = SuggestionSet::new();
        set.append_unique("go.extra_var");
        set.append_unique_with_placeholders("go.extra_var", [("name", "y")]);
        assert!(set.comments()[0].params().is_empty());
    }

    #[test]
    fn test_absent_errors_are_dropped() {
        let mut set = SuggestionSet::new();
        set.report_error(None::<RuleError>);
        set.report_error(RuleError::Message("   ".into()));
        assert!(set.errors().is_empty());

        set.report_error(RuleError::from("x"));
        set.report_error(RuleError::unexpected("exam", "no params"));
        let rendered: Vec<String> = set.errors().iter().map(|e| e.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["x", "unexpected tree shape in exam: no params"]
        );
    }

    #[test]
    fn test_total_severity_sums_present_codes_only() {
        let mut set = SuggestionSet::with_severities([("a", 2), ("b", 1), ("unused", 40)]);
        set.append_unique("a");
        set.append_unique("b");
        set.append_unique("unweighted");
        set.append_unique("a");
        assert_eq!(set.total_severity(), 3);
        assert_eq!(set.severity_of("unweighted"), 0);
    }

    #[test]
    fn test_register_severities_overwrites_and_is_live() {
        let mut set = SuggestionSet::with_severities([("a", 2)]);
        set.append_unique("a");
        assert_eq!(set.total_severity(), 2);
        set.register_severities([("a".to_string(), 7), ("b".to_string(), 1)]);
        assert_eq!(set.total_severity(), 7);
        set.append_unique("b");
        assert_eq!(set.total_severity(), 8);
    }

    #[test]
    fn test_comment_serialization_shape() {
        let plain = serde_json::to_value(Comment::new("go.a")).unwrap();
        assert_eq!(plain, serde_json::json!("go.a"));

        let with = serde_json::to_value(Comment::with_params("go.b", [("name", "x")])).unwrap();
        assert_eq!(with["comment"], "go.b");
        assert_eq!(with["params"]["name"], "x");
    }
}
