//! Analyzer core library.
//!
//! This crate exposes programmatic APIs for reviewing exercise submissions:
//! rules inspect a parsed Go package, record findings into a suggestion set,
//! and a decision table turns findings plus a goodness score into a verdict.
//!
//! High-level modules:
//! - `sugg`: Suggestion set (findings, severities, rule errors).
//! - `registry`: Ordered rule list plus default severities; runs rules.
//! - `decision`: Pure decision table producing a `ReviewResult`.
//! - `tree`: Go parsing and the read-only tree query interface rules use.
//! - `pattern`: Goodness score against canonical solutions.
//! - `exercises`: Built-in exercise catalogue (`two-fer`).
//! - `analyze`: Load, score, run, and decide for one or many submissions.
//! - `config`: Discovery and effective configuration resolution.
//! - `output`: Human/JSON printers and `analysis.json` writer.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `models`, `error`, `utils`: Supporting types and helpers.
pub mod analyze;
pub mod cli;
pub mod config;
pub mod decision;
pub mod error;
pub mod exercises;
pub mod models;
pub mod output;
pub mod pattern;
pub mod registry;
pub mod sugg;
pub mod tree;
pub mod utils;
