//! Query interface for recorded projection data.

use crate::analysis::{ExtinctionCriterion, QuasiExtinctionResult};
use crate::demography::{RateSequences, VitalRates};
use crate::errors::DatabaseError;
use crate::simulation::{ProjectionResult, Replicate, SimulationConfig};
use crate::storage::recorder::{CONFIG_KEY, STATUS_KEY};
use crate::storage::Database;
use rusqlite::{params, OptionalExtension};
use std::collections::{BTreeMap, HashMap};

/// Query builder for analyzing stored projections.
pub struct QueryBuilder {
    db: Database,
}

/// Per-replicate columns accumulated while reading the trajectory table.
#[derive(Default)]
struct PartialReplicate {
    population: Vec<f64>,
    birth_rates: Vec<f64>,
    death_rates: Vec<f64>,
    births: Vec<f64>,
    deaths: Vec<f64>,
}

impl QueryBuilder {
    /// Open a database for querying.
    pub fn new(db_path: impl AsRef<std::path::Path>) -> Result<Self, DatabaseError> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    /// Get raw metadata value by key.
    pub fn get_metadata_value(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT value FROM metadata WHERE key = ?1")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        stmt.query_row(params![key], |row| row.get(0))
            .optional()
            .map_err(|e| DatabaseError::Query(e.to_string()))
    }

    /// Get all metadata as a map.
    pub fn get_metadata(&self) -> Result<HashMap<String, String>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT key, value FROM metadata")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let mut meta = HashMap::new();
        for row in rows {
            let (k, v): (String, String) = row.map_err(|e| DatabaseError::Query(e.to_string()))?;
            meta.insert(k, v);
        }
        Ok(meta)
    }

    /// Load the stored configuration.
    pub fn get_full_config(&self) -> Result<SimulationConfig, DatabaseError> {
        let json = self
            .get_metadata_value(CONFIG_KEY)?
            .ok_or_else(|| DatabaseError::Query("No configuration recorded".to_string()))?;
        serde_json::from_str(&json).map_err(|e| DatabaseError::Corrupt(e.to_string()))
    }

    /// Check whether a completed projection result is stored.
    pub fn has_result(&self) -> Result<bool, DatabaseError> {
        Ok(self.get_metadata_value(STATUS_KEY)?.as_deref() == Some("complete"))
    }

    /// Final-year population size of every stored replicate, by replicate id.
    pub fn get_final_sizes(&self) -> Result<Vec<(usize, f64)>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare(
                "SELECT replicate_id, population FROM trajectory
                 WHERE year = (SELECT MAX(year) FROM trajectory)
                 ORDER BY replicate_id",
            )
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)? as usize, row.get::<_, f64>(1)?))
            })
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| DatabaseError::Query(e.to_string()))
    }

    /// Reconstruct the stored projection result.
    pub fn get_result(&self) -> Result<ProjectionResult, DatabaseError> {
        let config = self.get_full_config()?;
        if !self.has_result()? {
            return Err(DatabaseError::Query(
                "No completed projection recorded".to_string(),
            ));
        }

        // 1. Mean rates per replicate
        let mut means: BTreeMap<usize, VitalRates> = BTreeMap::new();
        {
            let mut stmt = self
                .db
                .connection()
                .prepare("SELECT replicate_id, mean_birth_rate, mean_death_rate FROM replicates")
                .map_err(|e| DatabaseError::Query(e.to_string()))?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)? as usize,
                        VitalRates::new(row.get(1)?, row.get(2)?),
                    ))
                })
                .map_err(|e| DatabaseError::Query(e.to_string()))?;
            for r in rows {
                let (id, rates) = r.map_err(|e| DatabaseError::Query(e.to_string()))?;
                means.insert(id, rates);
            }
        }

        // 2. Trajectory rows, ordered so each replicate's years arrive in sequence
        let mut partials: BTreeMap<usize, PartialReplicate> = BTreeMap::new();
        let mut stmt = self
            .db
            .connection()
            .prepare(
                "SELECT replicate_id, year, population, birth_rate, death_rate, births, deaths
                 FROM trajectory
                 ORDER BY replicate_id, year",
            )
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)? as usize,
                    row.get::<_, i64>(1)? as usize,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, Option<f64>>(5)?,
                    row.get::<_, Option<f64>>(6)?,
                ))
            })
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        for r in rows {
            let (id, year, population, birth_rate, death_rate, births, deaths) =
                r.map_err(|e| DatabaseError::Query(e.to_string()))?;
            let entry = partials.entry(id).or_default();
            if year != entry.population.len() + 1 {
                return Err(DatabaseError::Corrupt(format!(
                    "Replicate {id} is missing year {}",
                    entry.population.len() + 1
                )));
            }
            entry.population.push(population);
            entry.birth_rates.push(birth_rate);
            entry.death_rates.push(death_rate);
            if let (Some(b), Some(d)) = (births, deaths) {
                entry.births.push(b);
                entry.deaths.push(d);
            }
        }

        let mut replicates = Vec::with_capacity(partials.len());
        for (id, p) in partials {
            let mean_rates = means
                .get(&id)
                .copied()
                .ok_or_else(|| DatabaseError::Corrupt(format!("Replicate {id} has no mean rates")))?;
            let replicate = Replicate::from_parts(
                id,
                mean_rates,
                RateSequences {
                    birth: p.birth_rates,
                    death: p.death_rates,
                },
                p.population,
                p.births,
                p.deaths,
            )
            .ok_or_else(|| {
                DatabaseError::Corrupt(format!("Replicate {id} has inconsistent event rows"))
            })?;
            replicates.push(replicate);
        }

        if replicates.len() != config.replicate_count {
            return Err(DatabaseError::Corrupt(format!(
                "Configuration expects {} replicates, found {}",
                config.replicate_count,
                replicates.len()
            )));
        }

        Ok(ProjectionResult::new(config, replicates))
    }

    /// All stored quasi-extinction evaluations, grouped by criterion.
    pub fn get_extinction_results(&self) -> Result<Vec<QuasiExtinctionResult>, DatabaseError> {
        let mut stmt = self
            .db
            .connection()
            .prepare(
                "SELECT threshold, criterion, probability FROM extinction
                 ORDER BY criterion, threshold",
            )
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, f64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let mut results = Vec::new();
        for r in rows {
            let (threshold, criterion, probability) =
                r.map_err(|e| DatabaseError::Query(e.to_string()))?;
            let criterion: ExtinctionCriterion =
                criterion.parse().map_err(DatabaseError::Corrupt)?;
            results.push(QuasiExtinctionResult {
                threshold,
                probability,
                criterion,
            });
        }
        Ok(results)
    }

    /// Underlying database, for integrity checks.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Close the database.
    pub fn close(self) -> Result<(), DatabaseError> {
        self.db.close()
    }
}
