//! Verdict selection from a goodness score and a finished suggestion set.
//!
//! Base status:
//!
//! | comments | severity | goodness == 1 | status                  |
//! |----------|----------|---------------|-------------------------|
//! | none     | -        | yes           | ApproveAsOptimal        |
//! | none     | -        | no            | ReferToMentor           |
//! | some     | > 0      | -             | DisapproveWithComment   |
//! | some     | 0        | yes           | ApproveWithComment      |
//! | some     | 0        | no            | ReferToMentor           |
//!
//! Any captured rule error overrides the base status with `ReferToMentor`.
//! Comments and severity are reported unchanged in that case.

use crate::models::{ReviewResult, Status};
use crate::sugg::SuggestionSet;

/// Decide the review outcome. Pure: the set is only read.
///
/// Only an exact goodness of 1.0 counts as optimal; partial scores are
/// treated the same as 0.
pub fn decide(goodness: f64, suggestions: &SuggestionSet) -> ReviewResult {
    let comments = suggestions.comments().to_vec();
    let severity = suggestions.total_severity();
    let errors: Vec<String> = suggestions.errors().iter().map(|e| e.to_string()).collect();

    let optimal = goodness == 1.0;
    let base = if comments.is_empty() {
        if optimal {
            Status::ApproveAsOptimal
        } else {
            Status::ReferToMentor
        }
    } else if severity > 0 {
        Status::DisapproveWithComment
    } else if optimal {
        Status::ApproveWithComment
    } else {
        Status::ReferToMentor
    };

    let status = if errors.is_empty() {
        base
    } else {
        Status::ReferToMentor
    };

    ReviewResult {
        status,
        comments,
        severity,
        errors,
    }
}
