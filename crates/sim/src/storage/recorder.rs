//! Recorder that persists a configuration and the projection run under it.
//!
//! Opening a recorder discards any rows left by a previous run, so a
//! database never mixes replicates produced under different configurations.

use crate::analysis::QuasiExtinctionResult;
use crate::errors::DatabaseError;
use crate::simulation::{ProjectionResult, SimulationConfig};
use crate::storage::Database;
use rusqlite::{params, Transaction};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Metadata key holding the serialized configuration.
pub const CONFIG_KEY: &str = "full_config_json";
/// Metadata key holding the run status (`configured` or `complete`).
pub const STATUS_KEY: &str = "status";

/// Statistics about what a recorder has written.
#[derive(Debug, Clone, Default)]
pub struct RecorderStats {
    pub replicates_recorded: usize,
    pub rows_written: usize,
    pub extinction_results: usize,
}

/// Synchronous SQLite recorder for one configuration.
#[derive(Debug)]
pub struct Recorder {
    db: Database,
    config: SimulationConfig,
    stats: RecorderStats,
}

impl Recorder {
    /// Open `db_path`, clear previous results and store `config`.
    pub fn new(db_path: impl AsRef<Path>, config: &SimulationConfig) -> Result<Self, DatabaseError> {
        let mut db = Database::open(db_path)?;
        let config_json =
            serde_json::to_string(config).map_err(|e| DatabaseError::Insert(e.to_string()))?;

        let meta_pairs = vec![
            ("replicate_count", config.replicate_count.to_string()),
            ("year_count", config.year_count.to_string()),
            (
                "seed",
                config
                    .seed
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "None".to_string()),
            ),
            (CONFIG_KEY, config_json),
            (STATUS_KEY, "configured".to_string()),
            ("created_at", unix_now().to_string()),
        ];

        let tx = db.transaction()?;
        clear_results(&tx)?;
        tx.execute("DELETE FROM metadata", [])
            .map_err(|e| DatabaseError::Insert(e.to_string()))?;
        insert_metadata(&tx, &meta_pairs)?;
        tx.commit()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        Ok(Self {
            db,
            config: config.clone(),
            stats: RecorderStats::default(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn stats(&self) -> &RecorderStats {
        &self.stats
    }

    /// Store every replicate of `result`, replacing any earlier result.
    pub fn record_result(&mut self, result: &ProjectionResult) -> Result<(), DatabaseError> {
        if result.config() != &self.config {
            return Err(DatabaseError::ConfigMismatch);
        }

        let tx = self.db.transaction()?;
        clear_results(&tx)?;

        let mut rows = 0;
        {
            let mut rep_stmt = tx
                .prepare(
                    "INSERT INTO replicates (replicate_id, mean_birth_rate, mean_death_rate)
                     VALUES (?1, ?2, ?3)",
                )
                .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            for rep in result.replicates() {
                let rates = rep.mean_rates();
                rep_stmt
                    .execute(params![rep.id() as i64, rates.birth, rates.death])
                    .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            }

            let mut row_stmt = tx
                .prepare(
                    "INSERT INTO trajectory
                     (replicate_id, year, population, birth_rate, death_rate, births, deaths)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )
                .map_err(|e| DatabaseError::Insert(e.to_string()))?;
            for row in result.rows() {
                row_stmt
                    .execute(params![
                        row.replicate as i64,
                        row.year as i64,
                        row.population,
                        row.birth_rate,
                        row.death_rate,
                        row.births,
                        row.deaths,
                    ])
                    .map_err(|e| DatabaseError::Insert(e.to_string()))?;
                rows += 1;
            }
        }

        insert_metadata(
            &tx,
            &[
                (STATUS_KEY, "complete".to_string()),
                ("completed_at", unix_now().to_string()),
            ],
        )?;
        tx.commit()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        self.stats.replicates_recorded = result.replicate_count();
        self.stats.rows_written += rows;
        debug!(
            replicates = result.replicate_count(),
            rows, "Recorded projection result"
        );
        Ok(())
    }

    /// Store an evaluated quasi-extinction probability.
    pub fn record_extinction(&mut self, result: &QuasiExtinctionResult) -> Result<(), DatabaseError> {
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO extinction (threshold, criterion, probability, timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    result.threshold,
                    result.criterion.as_str(),
                    result.probability,
                    unix_now() as i64
                ],
            )
            .map_err(|e| DatabaseError::Insert(e.to_string()))?;
        self.stats.extinction_results += 1;
        Ok(())
    }

    /// Close the underlying database.
    pub fn close(self) -> Result<RecorderStats, DatabaseError> {
        self.db.close()?;
        Ok(self.stats)
    }
}

fn clear_results(tx: &Transaction<'_>) -> Result<(), DatabaseError> {
    tx.execute_batch(
        "DELETE FROM replicates;
         DELETE FROM trajectory;
         DELETE FROM extinction;",
    )
    .map_err(|e| DatabaseError::Insert(e.to_string()))
}

fn insert_metadata(tx: &Transaction<'_>, pairs: &[(&str, String)]) -> Result<(), DatabaseError> {
    let mut stmt = tx
        .prepare("INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)")
        .map_err(|e| DatabaseError::Insert(e.to_string()))?;
    for (k, v) in pairs {
        stmt.execute(params![k, v])
            .map_err(|e| DatabaseError::Insert(e.to_string()))?;
    }
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
