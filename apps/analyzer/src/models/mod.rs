//! Shared data models for review verdicts and per-submission reports.

use crate::sugg::Comment;
use serde::Serialize;
use std::fmt;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Final verdict of one analysis run.
pub enum Status {
    ApproveAsOptimal,
    ApproveWithComment,
    DisapproveWithComment,
    ReferToMentor,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::ApproveAsOptimal => "approve_as_optimal",
            Status::ApproveWithComment => "approve_with_comment",
            Status::DisapproveWithComment => "disapprove_with_comment",
            Status::ReferToMentor => "refer_to_mentor",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
/// Terminal artifact of one run: verdict, comments in first-seen order,
/// total severity, and stringified rule errors.
pub struct ReviewResult {
    pub status: Status,
    pub comments: Vec<Comment>,
    pub severity: u32,
    pub errors: Vec<String>,
}

#[derive(Serialize, Debug, Clone)]
/// A review result tied to the submission it was produced for.
pub struct Report {
    pub solution: String,
    pub exercise: String,
    pub goodness: f64,
    #[serde(flatten)]
    pub result: ReviewResult,
}
