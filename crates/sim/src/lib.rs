//! # Population Viability Simulation Crate
//!
//! The `pva_sim` crate projects population size through time under three
//! independent sources of uncertainty (environmental stochasticity,
//! demographic stochasticity and parametric uncertainty) and estimates the
//! probability that a population ends below a quasi-extinction threshold.
//!
//! ```
//! use pva_sim::prelude::*;
//!
//! let config = SimulationConfig {
//!     replicate_count: 200,
//!     year_count: 50,
//!     initial_population: 500.0,
//!     birth: VitalRateConfig::fixed(0.4),
//!     death: VitalRateConfig::fixed(0.3),
//!     ..Default::default()
//! };
//! let result = run_projection(&config).unwrap();
//! let p = quasi_extinction_probability(&result, 1000.0).unwrap();
//! assert_eq!(p, 0.0);
//! ```

pub mod analysis;
pub mod demography;
pub mod errors;
pub mod prelude;
pub mod simulation;
pub mod storage;

pub use analysis::quasi_extinction_probability;
pub use simulation::run_projection;
