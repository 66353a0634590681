//! Shared default values for projection configuration.
//! These mirror `SimulationConfig::default()` and feed the `init` command's clap defaults.

pub const OUTPUT_DB: &str = "projection.db";

pub const REPLICATES: usize = 1000;
pub const YEARS: usize = 50;
pub const INITIAL_POPULATION: f64 = 500.0;

// Vital rates
pub const BIRTH_RATE: f64 = 0.3;
pub const DEATH_RATE: f64 = 0.3;
pub const RATE_SD: f64 = 0.1;
pub const RATE_MIN: f64 = 0.25;
pub const RATE_MAX: f64 = 0.35;

pub const THRESHOLD: f64 = 100.0;
