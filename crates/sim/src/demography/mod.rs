//! Stochastic vital-rate machinery.
//!
//! Each submodule implements one stage of a replicate's pipeline:
//!
//! - [`parameters`]: per-replicate mean rates (parametric uncertainty)
//! - [`environment`]: per-year rate sequences (environmental stochasticity)
//! - [`events`]: realized birth and death counts (demographic stochasticity)
//!
//! Every stage degenerates to its deterministic expectation when the
//! corresponding mechanism is disabled, and draws nothing from the RNG in
//! that case.

pub mod environment;
pub mod events;
pub mod parameters;

pub use environment::{RateSequenceGenerator, RateSequences};
pub use events::{VitalEventSampler, VitalEvents, DEMOGRAPHIC_CEILING};
pub use parameters::ParameterResolver;

use serde::{Deserialize, Serialize};

/// A pair of per-capita rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalRates {
    pub birth: f64,
    pub death: f64,
}

impl VitalRates {
    pub fn new(birth: f64, death: f64) -> Self {
        Self { birth, death }
    }

    /// Net per-capita growth, `birth - death`.
    pub fn net(&self) -> f64 {
        self.birth - self.death
    }
}
