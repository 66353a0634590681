//! Quasi-extinction probability.
//!
//! A replicate is quasi-extinct when its final-year population is strictly
//! below the threshold. Replicates that dip below the threshold and recover
//! by the final year are not counted under this rule; the
//! [`ExtinctionCriterion::RunningMinimum`] variant counts them and can be
//! selected explicitly.

use crate::errors::InvalidThresholdError;
use crate::simulation::{ProjectionResult, Replicate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which population size of a replicate is compared with the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtinctionCriterion {
    /// Population size in the final year.
    #[default]
    FinalYear,
    /// Smallest population size reached in any year.
    RunningMinimum,
}

impl ExtinctionCriterion {
    fn size(self, replicate: &Replicate) -> f64 {
        match self {
            Self::FinalYear => replicate.final_size(),
            Self::RunningMinimum => replicate.min_size(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FinalYear => "final_year",
            Self::RunningMinimum => "running_minimum",
        }
    }
}

impl fmt::Display for ExtinctionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtinctionCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "final_year" | "final" => Ok(Self::FinalYear),
            "running_minimum" | "minimum" | "min" => Ok(Self::RunningMinimum),
            other => Err(format!(
                "Unknown criterion '{other}'. Use: final-year or running-minimum"
            )),
        }
    }
}

/// A threshold together with the probability evaluated at it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuasiExtinctionResult {
    pub threshold: f64,
    pub probability: f64,
    #[serde(default)]
    pub criterion: ExtinctionCriterion,
}

impl QuasiExtinctionResult {
    /// Evaluate `result` at `threshold` under `criterion`.
    pub fn evaluate(
        result: &ProjectionResult,
        threshold: f64,
        criterion: ExtinctionCriterion,
    ) -> Result<Self, InvalidThresholdError> {
        check_threshold(threshold)?;
        Ok(Self {
            threshold,
            probability: probability_below(result, threshold, criterion),
            criterion,
        })
    }
}

/// Fraction of replicates whose final-year size is below `threshold`.
pub fn quasi_extinction_probability(
    result: &ProjectionResult,
    threshold: f64,
) -> Result<f64, InvalidThresholdError> {
    check_threshold(threshold)?;
    Ok(probability_below(
        result,
        threshold,
        ExtinctionCriterion::FinalYear,
    ))
}

/// Evaluate the probability at each threshold, in the order given.
pub fn risk_curve(
    result: &ProjectionResult,
    thresholds: &[f64],
    criterion: ExtinctionCriterion,
) -> Result<Vec<QuasiExtinctionResult>, InvalidThresholdError> {
    thresholds
        .iter()
        .map(|&t| QuasiExtinctionResult::evaluate(result, t, criterion))
        .collect()
}

fn check_threshold(threshold: f64) -> Result<(), InvalidThresholdError> {
    // NaN fails the comparison and is rejected too
    if threshold >= 0.0 {
        Ok(())
    } else {
        Err(InvalidThresholdError(threshold))
    }
}

fn probability_below(
    result: &ProjectionResult,
    threshold: f64,
    criterion: ExtinctionCriterion,
) -> f64 {
    let total = result.replicate_count();
    if total == 0 {
        return 0.0;
    }
    let below = result
        .replicates()
        .iter()
        .filter(|rep| criterion.size(rep) < threshold)
        .count();
    below as f64 / total as f64
}
