//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use pva_sim::prelude::*;
//!
//! let projection = SimulationBuilder::new().replicates(10).seed(1).build().unwrap();
//! let result = projection.run().unwrap();
//! assert_eq!(result.replicate_count(), 10);
//! ```

pub use crate::analysis::{
    quasi_extinction_probability, risk_curve, summarize_years, ExtinctionCriterion,
    QuasiExtinctionResult, YearSummary,
};
pub use crate::demography::{VitalEvents, VitalRates, DEMOGRAPHIC_CEILING};
pub use crate::errors::{
    ConfigurationError, InvalidThresholdError, ProjectionError, SamplingDomainError, SamplingFault,
};
pub use crate::simulation::{
    run_projection, Projection, ProjectionResult, Replicate, SimulationBuilder, SimulationConfig,
    StochasticityConfig, TrialRounding, VitalRateConfig,
};
