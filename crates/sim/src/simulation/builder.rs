//! Builder pattern for creating projections.
//!
//! Provides a fluent API over [`SimulationConfig`] with defaults and
//! validation on `build()`.

use crate::simulation::{
    ConfigurationError, Projection, SimulationConfig, TrialRounding, VitalRateConfig,
};

/// Builder for constructing [`Projection`] instances with a fluent API.
///
/// # Examples
///
/// ```
/// use pva_sim::simulation::SimulationBuilder;
///
/// // Deterministic projection with defaults for everything else
/// let projection = SimulationBuilder::new()
///     .replicates(10)
///     .years(25)
///     .initial_population(200.0)
///     .birth_rate(0.4)
///     .death_rate(0.3)
///     .build()
///     .unwrap();
///
/// // With all three sources of uncertainty
/// let projection = SimulationBuilder::new()
///     .replicates(100)
///     .years(50)
///     .initial_population(20.0)
///     .birth_rate(0.3)
///     .death_rate(0.3)
///     .birth_rate_sd(0.05)
///     .death_rate_sd(0.05)
///     .birth_rate_bounds(0.25, 0.35)
///     .death_rate_bounds(0.25, 0.35)
///     .environmental_stochasticity(true)
///     .demographic_stochasticity(true)
///     .parametric_uncertainty(true)
///     .threshold(10.0)
///     .seed(42)
///     .build()
///     .unwrap();
/// let result = projection.run().unwrap();
/// assert_eq!(result.replicate_count(), 100);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulationBuilder {
    config: SimulationConfig,
}

impl SimulationBuilder {
    /// Create a new builder holding `SimulationConfig::default()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Set the number of replicates.
    pub fn replicates(mut self, count: usize) -> Self {
        self.config.replicate_count = count;
        self
    }

    /// Set the number of years per trajectory (including year 1).
    pub fn years(mut self, count: usize) -> Self {
        self.config.year_count = count;
        self
    }

    pub fn initial_population(mut self, size: f64) -> Self {
        self.config.initial_population = size;
        self
    }

    pub fn birth_rate(mut self, mean: f64) -> Self {
        self.config.birth.mean = mean;
        self
    }

    pub fn death_rate(mut self, mean: f64) -> Self {
        self.config.death.mean = mean;
        self
    }

    pub fn birth_rate_sd(mut self, sd: f64) -> Self {
        self.config.birth.sd = sd;
        self
    }

    pub fn death_rate_sd(mut self, sd: f64) -> Self {
        self.config.death.sd = sd;
        self
    }

    /// Set the uniform range used for birth rates under parametric uncertainty.
    pub fn birth_rate_bounds(mut self, min: f64, max: f64) -> Self {
        self.config.birth.min = min;
        self.config.birth.max = max;
        self
    }

    /// Set the uniform range used for death rates under parametric uncertainty.
    pub fn death_rate_bounds(mut self, min: f64, max: f64) -> Self {
        self.config.death.min = min;
        self.config.death.max = max;
        self
    }

    /// Replace both settings of the birth rate at once.
    pub fn birth(mut self, rate: VitalRateConfig) -> Self {
        self.config.birth = rate;
        self
    }

    /// Replace both settings of the death rate at once.
    pub fn death(mut self, rate: VitalRateConfig) -> Self {
        self.config.death = rate;
        self
    }

    pub fn environmental_stochasticity(mut self, enabled: bool) -> Self {
        self.config.stochasticity.environmental = enabled;
        self
    }

    pub fn demographic_stochasticity(mut self, enabled: bool) -> Self {
        self.config.stochasticity.demographic = enabled;
        self
    }

    pub fn parametric_uncertainty(mut self, enabled: bool) -> Self {
        self.config.stochasticity.parametric = enabled;
        self
    }

    /// Rule for turning a fractional population into a Binomial trial count.
    pub fn trial_rounding(mut self, rounding: TrialRounding) -> Self {
        self.config.stochasticity.trial_rounding = rounding;
        self
    }

    /// Set the quasi-extinction threshold stored with the configuration.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.quasi_extinction_threshold = threshold;
        self
    }

    /// Set the random seed for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate and return the configuration without building a projection.
    pub fn build_config(self) -> Result<SimulationConfig, ConfigurationError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Validate the configuration and build a projection.
    pub fn build(self) -> Result<Projection, ConfigurationError> {
        Projection::new(self.config)
    }
}
