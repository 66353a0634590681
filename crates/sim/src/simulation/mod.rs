//! Projection engine and configuration.
//!
//! - `SimulationConfig`: the immutable record describing one analysis.
//! - `SimulationBuilder`: fluent constructor with validation.
//! - `TrajectorySimulator`: advances a single replicate year over year.
//! - `Projection`: runs many replicates and aggregates them into a
//!   `ProjectionResult`.

pub mod builder;
pub mod configs;
pub mod engine;
pub mod result;
pub mod trajectory;

pub use builder::SimulationBuilder;
pub use configs::{
    ConfigurationError, SimulationConfig, StochasticityConfig, TrialRounding, VitalRateConfig,
};
pub use engine::{run_projection, Projection};
pub use result::{ProjectionResult, TrajectoryRow};
pub use trajectory::{Replicate, TrajectorySimulator};
