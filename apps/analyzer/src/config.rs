//! Configuration discovery and effective settings resolution.
//!
//! The analyzer reads `analyzer.toml|yaml|yml` from the root directory (or
//! the closest ancestor) and merges it with CLI flags into an `Effective`
//! config.
//! Defaults:
//! - `output`: `human`
//! - `write`: false
//! - `exercises.<slug>.severity`: empty
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{AnalyzerError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILES: &[&str] = &["analyzer.toml", "analyzer.yaml", "analyzer.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `analyzer.toml|yaml`.
pub struct AnalyzerConfig {
    pub output: Option<String>,
    pub write: Option<bool>,
    #[serde(default)]
    pub exercises: HashMap<String, ExerciseCfg>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Per-exercise section `[exercises.<slug>]`.
pub struct ExerciseCfg {
    /// Extra or replacement weights, merged over the registry defaults.
    #[serde(default)]
    pub severity: BTreeMap<String, u32>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub output: String,
    pub write: bool,
    pub severity: HashMap<String, BTreeMap<String, u32>>, // slug -> code -> weight
}

impl Effective {
    /// Severity overrides for one exercise; empty when none are configured.
    pub fn severity_for(&self, slug: &str) -> BTreeMap<String, u32> {
        self.severity.get(slug).cloned().unwrap_or_default()
    }
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when an `analyzer.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `AnalyzerConfig` from the first config file present in `root`.
///
/// A present but unreadable or malformed file is an error.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, AnalyzerConfig)>> {
    for name in CONFIG_FILES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        let s = fs::read_to_string(&path).map_err(|source| AnalyzerError::Io {
            path: path.clone(),
            source,
        })?;
        let parsed = if name.ends_with(".toml") {
            toml::from_str::<AnalyzerConfig>(&s).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<AnalyzerConfig>(&s).map_err(|e| e.to_string())
        };
        return match parsed {
            Ok(cfg) => Ok(Some((path, cfg))),
            Err(detail) => Err(AnalyzerError::Config { path, detail }),
        };
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_root: Option<&str>,
    cli_output: Option<&str>,
    cli_write: Option<bool>,
) -> Result<Effective> {
    let start = PathBuf::from(cli_root.unwrap_or("."));
    let root = detect_root(&start);
    let (config_path, cfg) = match load_config(&root)? {
        Some((path, cfg)) => (Some(path), cfg),
        None => (None, AnalyzerConfig::default()),
    };

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let write = cli_write.or(cfg.write).unwrap_or(false);

    let severity = cfg
        .exercises
        .into_iter()
        .map(|(slug, ex)| (slug, ex.severity))
        .collect();

    Ok(Effective {
        root,
        config_path,
        output,
        write,
        severity,
    })
}
