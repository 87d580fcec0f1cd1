//! Rule registration and execution for one exercise.
//!
//! A `Registry` is built once and only read afterwards, so a single instance
//! can be shared across analyses running on different threads. Rule functions
//! are plain function pointers over a tree-query provider `P`.

use crate::sugg::SuggestionSet;
use std::collections::BTreeMap;
use tracing::debug;

/// A check over a parsed submission that may add suggestions or report errors.
///
/// Rules never fail: an unexpected tree shape goes to
/// `SuggestionSet::report_error` and the rule returns.
pub type RuleFn<P> = fn(&P, &mut SuggestionSet);

/// Ordered rule functions plus the default severity table of one exercise.
pub struct Registry<P: ?Sized> {
    rules: Vec<RuleFn<P>>,
    severity: BTreeMap<String, u32>,
}

impl<P: ?Sized> Registry<P> {
    pub fn new<K, I>(rules: Vec<RuleFn<P>>, severity: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, u32)>,
    {
        Self {
            rules,
            severity: severity.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn rules(&self) -> &[RuleFn<P>] {
        &self.rules
    }

    pub fn severity(&self) -> &BTreeMap<String, u32> {
        &self.severity
    }

    /// A fresh suggestion set seeded with this registry's severity table.
    pub fn new_suggestions(&self) -> SuggestionSet {
        SuggestionSet::with_severities(self.severity.iter().map(|(c, w)| (c.as_str(), *w)))
    }

    /// Invoke every rule once, in registration order, against the same
    /// provider and set. No rule can stop the loop early.
    pub fn run(&self, provider: &P, suggestions: &mut SuggestionSet) {
        for (i, rule) in self.rules.iter().enumerate() {
            let before = suggestions.comments().len();
            let errors_before = suggestions.errors().len();
            rule(provider, suggestions);
            debug!(
                rule = i,
                added = suggestions.comments().len() - before,
                errors = suggestions.errors().len() - errors_before,
                "rule finished"
            );
        }
    }
}
