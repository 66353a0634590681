//! Per-year distribution of population size across replicates.

use crate::simulation::ProjectionResult;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Cross-replicate statistics for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    /// One-based year
    pub year: usize,
    pub mean: f64,
    pub p05: f64,
    pub median: f64,
    pub p95: f64,
    /// Fraction of replicates with population zero
    pub extinct_fraction: f64,
}

/// Summarize every year of `result`.
pub fn summarize_years(result: &ProjectionResult) -> Vec<YearSummary> {
    (1..=result.year_count())
        .into_par_iter()
        .map(|year| summarize(year, result.sizes_at(year)))
        .collect()
}

fn summarize(year: usize, mut sizes: Vec<f64>) -> YearSummary {
    if sizes.is_empty() {
        return YearSummary {
            year,
            mean: 0.0,
            p05: 0.0,
            median: 0.0,
            p95: 0.0,
            extinct_fraction: 0.0,
        };
    }
    sizes.sort_by(f64::total_cmp);
    let n = sizes.len() as f64;
    YearSummary {
        year,
        mean: sizes.iter().sum::<f64>() / n,
        p05: quantile(&sizes, 0.05),
        median: quantile(&sizes, 0.5),
        p95: quantile(&sizes, 0.95),
        extinct_fraction: sizes.iter().filter(|&&s| s == 0.0).count() as f64 / n,
    }
}

/// Linearly interpolated quantile of already sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
