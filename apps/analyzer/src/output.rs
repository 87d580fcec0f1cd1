//! Output rendering for analysis reports and the exercise catalogue.
//!
//! Supports `human` (default) and `json` outputs. `analysis.json` files use
//! the compact `{status, comments}` shape consumed by downstream renderers.

use crate::error::{AnalyzerError, Result};
use crate::exercises::Catalogue;
use crate::models::{Report, ReviewResult};
use crate::utils::{status_badge, use_colors};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::fs;
use std::path::{Path, PathBuf};

pub const ANALYSIS_FILE: &str = "analysis.json";

/// Print reports in the requested format.
pub fn print_reports(reports: &[Report], output: &str) -> Result<()> {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_reports_json(reports)?)?
        ),
        _ => {
            let color = use_colors(output);
            for r in reports {
                let shown = display_path(Path::new(&r.solution));
                let file = if color {
                    shown.bold().to_string()
                } else {
                    shown
                };
                println!(
                    "{} {} severity={} goodness={:.2}",
                    status_badge(r.result.status, color),
                    file,
                    r.result.severity,
                    r.goodness
                );
                for c in &r.result.comments {
                    let params: Vec<String> = c
                        .params()
                        .iter()
                        .map(|(k, v)| format!("{}={}", k, v))
                        .collect();
                    let icon = if color {
                        "◆".blue().to_string()
                    } else {
                        "◆".to_string()
                    };
                    if params.is_empty() {
                        println!("  {} {}", icon, c.code());
                    } else {
                        println!("  {} {} ❲{}❳", icon, c.code(), params.join(", "));
                    }
                }
                for e in &r.result.errors {
                    let icon = if color {
                        "✖".red().to_string()
                    } else {
                        "✖".to_string()
                    };
                    println!("  {} {}", icon, e);
                }
            }
        }
    }
    Ok(())
}

/// Print the exercise catalogue.
pub fn print_exercises(catalogue: &Catalogue, output: &str) -> Result<()> {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_exercises_json(catalogue))?
        ),
        _ => {
            let color = use_colors(output);
            for ex in catalogue.iter() {
                let slug = if color {
                    ex.slug().bold().to_string()
                } else {
                    ex.slug().to_string()
                };
                println!(
                    "{} rules={} canonical={}",
                    slug,
                    ex.registry().rules().len(),
                    ex.canonical().len()
                );
                for (code, weight) in ex.registry().severity() {
                    println!("  {} = {}", code, weight);
                }
            }
        }
    }
    Ok(())
}

fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(path, cwd))
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

/// Compose report JSON (pure) for testing/snapshot purposes.
///
/// A single report renders as an object, several as an array.
pub fn compose_reports_json(reports: &[Report]) -> Result<JsonVal> {
    match reports {
        [one] => Ok(serde_json::to_value(one)?),
        many => Ok(serde_json::to_value(many)?),
    }
}

/// Compose the `analysis.json` document for one result.
pub fn compose_analysis_json(result: &ReviewResult) -> Result<JsonVal> {
    let mut out = json!({
        "status": result.status,
        "comments": serde_json::to_value(&result.comments)?,
    });
    if !result.errors.is_empty() {
        out["errors"] = json!(result.errors);
    }
    Ok(out)
}

/// Compose the catalogue JSON (pure).
pub fn compose_exercises_json(catalogue: &Catalogue) -> JsonVal {
    let items: Vec<_> = catalogue
        .iter()
        .map(|ex| {
            json!({
                "slug": ex.slug(),
                "rules": ex.registry().rules().len(),
                "canonical": ex.canonical().len(),
                "severity": ex.registry().severity(),
            })
        })
        .collect();
    json!({ "exercises": items })
}

/// Write `analysis.json` into the solution directory; returns the file path.
pub fn write_analysis(dir: &Path, result: &ReviewResult) -> Result<PathBuf> {
    let path = dir.join(ANALYSIS_FILE);
    let body = serde_json::to_string_pretty(&compose_analysis_json(result)?)?;
    fs::write(&path, body + "\n").map_err(|source| AnalyzerError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
