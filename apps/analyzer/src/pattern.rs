//! Structural closeness of a submission to canonical solutions.
//!
//! Each file is flattened into the preorder sequence of named node kinds,
//! skipping comments; identifier names and literal contents do not count.
//! The score against one canonical is `2 * LCS / (len(a) + len(b))`, which is
//! exactly 1.0 only for identical shapes. Goodness is the best score over all
//! canonical solutions.

use crate::error::Result;
use crate::tree::{walk, GoPackage, TreeQuery};

/// Named node kinds of every file, in order, without comments.
pub fn shape(pkg: &dyn TreeQuery) -> Vec<&'static str> {
    let mut kinds = Vec::new();
    for root in pkg.roots() {
        walk(root, &mut |n| {
            if n.is_named() && n.kind() != "comment" {
                kinds.push(n.kind());
            }
        });
    }
    kinds
}

/// Similarity of two shapes in `[0, 1]`.
pub fn similarity(a: &[&str], b: &[&str]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let common = lcs_len(a, b);
    (2 * common) as f64 / (a.len() + b.len()) as f64
}

fn lcs_len(a: &[&str], b: &[&str]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            cur[j + 1] = if x == y {
                prev[j] + 1
            } else {
                cur[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Best similarity of `pkg` against the canonical sources; 0.0 without any.
pub fn goodness(pkg: &dyn TreeQuery, canonical: &[&str]) -> Result<f64> {
    let submitted = shape(pkg);
    let mut best = 0.0f64;
    for src in canonical {
        let reference = GoPackage::parse_str(src)?;
        best = best.max(similarity(&submitted, &shape(&reference)));
        if best == 1.0 {
            break;
        }
    }
    Ok(best)
}
