//! Storage module for persisting projection runs.
//!
//! This module provides SQLite-based recording of a configuration, the
//! trajectories produced under it and the quasi-extinction probabilities
//! evaluated from them.

mod database;
mod query;
mod recorder;

pub use database::{Database, DatabaseStats};
pub use query::QueryBuilder;
pub use recorder::{Recorder, RecorderStats};
