//! Low-level database operations and schema management.

pub use crate::errors::DatabaseError;
use rusqlite::{Connection, Transaction};
use std::path::Path;
use tracing::warn;

/// Database connection wrapper with schema management.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    db_path: String,
}

impl Database {
    /// Open (or create) a database at the specified path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let conn =
            Connection::open(&path_str).map_err(|e| DatabaseError::Connection(e.to_string()))?;

        // Performance pragmas for faster bulk inserts
        conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA journal_mode = WAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA cache_size = -64000;",
        )
        .map_err(|e| DatabaseError::Initialization(e.to_string()))?;

        let mut db = Self {
            conn,
            db_path: path_str,
        };

        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize database schema.
    fn initialize_schema(&mut self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "-- Metadata table (configuration items)
                CREATE TABLE IF NOT EXISTS metadata (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                -- Resolved mean rates, one row per replicate
                CREATE TABLE IF NOT EXISTS replicates (
                    replicate_id INTEGER PRIMARY KEY,
                    mean_birth_rate REAL NOT NULL,
                    mean_death_rate REAL NOT NULL
                );

                -- One row per replicate per year
                CREATE TABLE IF NOT EXISTS trajectory (
                    replicate_id INTEGER NOT NULL,
                    year INTEGER NOT NULL, -- 1-based
                    population REAL NOT NULL,
                    birth_rate REAL NOT NULL,
                    death_rate REAL NOT NULL,
                    births REAL,  -- NULL on the final year
                    deaths REAL,  -- NULL on the final year
                    PRIMARY KEY (replicate_id, year)
                );

                -- Evaluated quasi-extinction probabilities
                CREATE TABLE IF NOT EXISTS extinction (
                    threshold REAL NOT NULL,
                    criterion TEXT NOT NULL,
                    probability REAL NOT NULL,
                    timestamp INTEGER NOT NULL,
                    PRIMARY KEY (threshold, criterion)
                );

                CREATE INDEX IF NOT EXISTS idx_trajectory_year ON trajectory(year);",
            )
            .map_err(|e| DatabaseError::Initialization(e.to_string()))?;

        Ok(())
    }

    /// Begin a transaction for batched operations.
    pub fn transaction(&mut self) -> Result<Transaction<'_>, DatabaseError> {
        self.conn
            .transaction()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))
    }

    /// Get reference to underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get database path.
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Close the database and clean up WAL files.
    pub fn close(self) -> Result<(), DatabaseError> {
        // Checkpoint and truncate WAL
        if let Err(e) = self.conn.execute_batch(
            "PRAGMA wal_checkpoint(TRUNCATE);
             PRAGMA journal_mode = DELETE;",
        ) {
            warn!("Failed to checkpoint/truncate WAL: {e}");
        }

        self.conn
            .close()
            .map_err(|(_conn, e)| DatabaseError::Close(e.to_string()))?;

        for suffix in &["-wal", "-shm"] {
            let fname = format!("{}{}", self.db_path, suffix);
            if let Err(e) = std::fs::remove_file(&fname) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove {fname}: {e}");
                }
            }
        }

        Ok(())
    }

    /// Get database statistics.
    pub fn stats(&self) -> Result<DatabaseStats, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| DatabaseError::Query(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let count = |table: &str| -> Result<usize, DatabaseError> {
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get::<_, i64>(0)
                })
                .map(|n| n as usize)
                .map_err(|e| DatabaseError::Query(e.to_string()))
        };

        Ok(DatabaseStats {
            replicate_records: count("replicates")?,
            trajectory_records: count("trajectory")?,
            extinction_records: count("extinction")?,
            tables,
        })
    }
}

/// Database statistics.
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub replicate_records: usize,
    pub trajectory_records: usize,
    pub extinction_records: usize,
    pub tables: Vec<String>,
}
