//! Analysis driver: load a submission, score it, run the exercise rules, and
//! decide.
//!
//! Each submission gets its own `SuggestionSet`; the exercise registry is only
//! read, so batches are analyzed in parallel with `rayon`.

use crate::decision::decide;
use crate::error::{AnalyzerError, Result, RuleError};
use crate::exercises::Exercise;
use crate::models::{Report, ReviewResult};
use crate::pattern;
use crate::tree::GoPackage;
use glob::{glob, Pattern};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Per-run inputs that do not come from the submission itself.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Externally supplied goodness; computed from canonical solutions when `None`.
    pub goodness: Option<f64>,
    /// Weights merged over the registry defaults.
    pub severity: BTreeMap<String, u32>,
}

/// Parse every non-test `.go` file in `dir`, sorted by path.
pub fn load_solution(dir: &Path) -> Result<GoPackage> {
    if !dir.is_dir() {
        return Err(AnalyzerError::MissingSolution(dir.to_path_buf()));
    }
    // The directory part is literal; only the file name is a pattern.
    let pattern = Path::new(&Pattern::escape(&dir.to_string_lossy())).join("*.go");
    let mut paths: Vec<PathBuf> = glob(&pattern.to_string_lossy())?
        .filter_map(|entry| entry.ok())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| !n.ends_with("_test.go"))
        })
        .collect();
    paths.sort();
    if paths.is_empty() {
        return Err(AnalyzerError::NoSourceFiles(dir.to_path_buf()));
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let source = fs::read_to_string(&path).map_err(|source| AnalyzerError::Io {
            path: path.clone(),
            source,
        })?;
        files.push((path, source));
    }
    GoPackage::parse(files)
}

/// Run one exercise over an already parsed package.
///
/// Returns the goodness used for the decision alongside the result.
pub fn analyze_package(
    exercise: &Exercise,
    pkg: &GoPackage,
    opts: &Options,
) -> Result<(f64, ReviewResult)> {
    let goodness = match opts.goodness {
        Some(g) => g,
        None => pattern::goodness(pkg, exercise.canonical())?,
    };

    let registry = exercise.registry();
    let mut suggestions = registry.new_suggestions();
    suggestions.register_severities(opts.severity.iter().map(|(c, w)| (c.as_str(), *w)));

    let syntax_errors = pkg.syntax_errors();
    if syntax_errors > 0 {
        warn!(
            exercise = exercise.slug(),
            syntax_errors, "submission does not parse cleanly"
        );
        suggestions.report_error(RuleError::unexpected(
            "parse",
            format!("{} syntax error(s) in submission", syntax_errors),
        ));
    }

    registry.run(pkg, &mut suggestions);
    let result = decide(goodness, &suggestions);
    info!(
        exercise = exercise.slug(),
        goodness,
        status = %result.status,
        severity = result.severity,
        comments = result.comments.len(),
        "analysis finished"
    );
    Ok((goodness, result))
}

/// Analyze the submission stored in `dir`.
pub fn analyze_dir(exercise: &Exercise, dir: &Path, opts: &Options) -> Result<Report> {
    let pkg = load_solution(dir)?;
    let (goodness, result) = analyze_package(exercise, &pkg, opts)?;
    Ok(Report {
        solution: dir.to_string_lossy().to_string(),
        exercise: exercise.slug().to_string(),
        goodness,
        result,
    })
}

/// Analyze independent submissions in parallel; results keep input order.
pub fn analyze_all(exercise: &Exercise, dirs: &[PathBuf], opts: &Options) -> Vec<Result<Report>> {
    dirs.par_iter()
        .map(|dir| analyze_dir(exercise, dir, opts))
        .collect()
}
