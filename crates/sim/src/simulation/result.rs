//! Aggregated output of a projection run.

use crate::simulation::{Replicate, SimulationConfig};
use serde::{Deserialize, Serialize};

/// All replicates produced from one configuration.
///
/// Replicate order carries no meaning; year order within a replicate does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    config: SimulationConfig,
    replicates: Vec<Replicate>,
}

/// One row of the tabular view consumed by charting collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRow {
    pub replicate: usize,
    /// One-based year
    pub year: usize,
    pub population: f64,
    pub birth_rate: f64,
    pub death_rate: f64,
    /// Births leading into the next year; `None` on the final year
    pub births: Option<f64>,
    /// Deaths leading into the next year; `None` on the final year
    pub deaths: Option<f64>,
}

impl ProjectionResult {
    /// Wrap replicates produced under `config`.
    pub fn new(config: SimulationConfig, replicates: Vec<Replicate>) -> Self {
        Self { config, replicates }
    }

    /// Configuration the replicates were produced under.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn replicates(&self) -> &[Replicate] {
        &self.replicates
    }

    pub fn replicate_count(&self) -> usize {
        self.replicates.len()
    }

    pub fn year_count(&self) -> usize {
        self.config.year_count
    }

    pub fn is_empty(&self) -> bool {
        self.replicates.is_empty()
    }

    /// Final-year population size of every replicate.
    pub fn final_sizes(&self) -> Vec<f64> {
        self.replicates.iter().map(Replicate::final_size).collect()
    }

    /// Population sizes of every replicate at one-based `year`.
    pub fn sizes_at(&self, year: usize) -> Vec<f64> {
        let idx = year.saturating_sub(1);
        self.replicates
            .iter()
            .filter_map(|r| r.population().get(idx).copied())
            .collect()
    }

    /// Iterate the `(replicate, year, population, ...)` table.
    pub fn rows(&self) -> impl Iterator<Item = TrajectoryRow> + '_ {
        self.replicates.iter().flat_map(|rep| {
            rep.population()
                .iter()
                .zip(rep.birth_rates())
                .zip(rep.death_rates())
                .enumerate()
                .map(move |(idx, ((&population, &birth_rate), &death_rate))| TrajectoryRow {
                    replicate: rep.id(),
                    year: idx + 1,
                    population,
                    birth_rate,
                    death_rate,
                    births: rep.births().get(idx).copied(),
                    deaths: rep.deaths().get(idx).copied(),
                })
        })
    }

    pub fn into_replicates(self) -> Vec<Replicate> {
        self.replicates
    }
}
