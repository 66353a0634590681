//! Projection configuration.
//!
//! `SimulationConfig` is the single immutable record a caller hands to the
//! engine. It can be deserialized from JSON to reproduce a run exactly
//! (given a seed).

pub use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Settings for one vital rate (births or deaths).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalRateConfig {
    /// Per-capita mean rate used when parametric uncertainty is off
    pub mean: f64,
    /// Year-to-year standard deviation (environmental stochasticity only)
    pub sd: f64,
    /// Lower bound of the uniform draw (parametric uncertainty only)
    pub min: f64,
    /// Upper bound of the uniform draw (parametric uncertainty only)
    pub max: f64,
}

impl VitalRateConfig {
    /// Create a rate with no variation and degenerate bounds at the mean.
    pub fn fixed(mean: f64) -> Self {
        Self {
            mean,
            sd: 0.0,
            min: mean,
            max: mean,
        }
    }

    /// Create a fully specified rate.
    pub fn new(mean: f64, sd: f64, min: f64, max: f64) -> Self {
        Self { mean, sd, min, max }
    }

    fn validate(&self, names: [&'static str; 4]) -> Result<(), ConfigurationError> {
        let values = [self.mean, self.sd, self.min, self.max];
        for (name, value) in names.into_iter().zip(values) {
            check_non_negative(name, value)?;
        }
        Ok(())
    }
}

/// How a non-integer population size becomes a Binomial trial count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialRounding {
    /// Largest integer not above the population size.
    #[default]
    Floor,
    /// Nearest integer, halves rounded away from zero.
    Nearest,
}

impl TrialRounding {
    /// Convert a population size to a trial count.
    ///
    /// Returns `None` when the size is negative, not finite, or too large
    /// to be represented as a `u64`.
    pub fn trials(self, population: f64) -> Option<u64> {
        if !population.is_finite() || population < 0.0 {
            return None;
        }
        let rounded = match self {
            Self::Floor => population.floor(),
            Self::Nearest => population.round(),
        };
        if rounded >= u64::MAX as f64 {
            return None;
        }
        Some(rounded as u64)
    }
}

/// Which random mechanisms are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StochasticityConfig {
    /// Per-year rates drawn from Normal(mean, sd), absolute value taken
    pub environmental: bool,
    /// Poisson births and Binomial deaths instead of expected counts
    pub demographic: bool,
    /// Per-replicate mean rates drawn uniformly from [min, max]
    pub parametric: bool,
    /// Rule used when demographic sampling meets a non-integer population
    #[serde(default)]
    pub trial_rounding: TrialRounding,
}

impl StochasticityConfig {
    /// All mechanisms off: the projection is fully deterministic.
    pub fn deterministic() -> Self {
        Self::default()
    }

    /// Check whether any mechanism injects randomness.
    pub fn is_deterministic(&self) -> bool {
        !(self.environmental || self.demographic || self.parametric)
    }
}

/// Complete description of one viability analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of independent replicates
    pub replicate_count: usize,
    /// Number of years per trajectory, including the initial year
    pub year_count: usize,
    /// Population size in year 1
    pub initial_population: f64,
    /// Birth rate settings
    pub birth: VitalRateConfig,
    /// Death rate settings
    pub death: VitalRateConfig,
    /// Active uncertainty mechanisms
    pub stochasticity: StochasticityConfig,
    /// Threshold used when evaluating the result (not by the simulator)
    pub quasi_extinction_threshold: f64,
    /// Optional RNG seed for reproducibility
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            replicate_count: 1000,
            year_count: 50,
            initial_population: 500.0,
            birth: VitalRateConfig::new(0.3, 0.1, 0.25, 0.35),
            death: VitalRateConfig::new(0.3, 0.1, 0.25, 0.35),
            stochasticity: StochasticityConfig::deterministic(),
            quasi_extinction_threshold: 100.0,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.replicate_count == 0 {
            return Err(ConfigurationError::NoReplicates);
        }
        if self.year_count == 0 {
            return Err(ConfigurationError::NoYears);
        }
        check_non_negative("initial_population", self.initial_population)?;
        check_non_negative("quasi_extinction_threshold", self.quasi_extinction_threshold)?;
        self.birth.validate(
            ["mean_birth_rate", "birth_rate_sd", "min_birth_rate", "max_birth_rate"],
        )?;
        self.death.validate(
            ["mean_death_rate", "death_rate_sd", "min_death_rate", "max_death_rate"],
        )?;

        let stochasticity = &self.stochasticity;
        if stochasticity.parametric {
            for (rate, cfg) in [("birth", &self.birth), ("death", &self.death)] {
                if cfg.min > cfg.max {
                    return Err(ConfigurationError::InvertedBounds {
                        rate,
                        min: cfg.min,
                        max: cfg.max,
                    });
                }
            }
        }

        if stochasticity.demographic {
            let (name, value) = if stochasticity.parametric {
                ("max_death_rate", self.death.max)
            } else {
                ("mean_death_rate", self.death.mean)
            };
            if value > 1.0 {
                return Err(ConfigurationError::DeathProbabilityAboveOne { name, value });
            }
        }

        Ok(())
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if !value.is_finite() {
        return Err(ConfigurationError::NonFinite { name, value });
    }
    if value < 0.0 {
        return Err(ConfigurationError::Negative { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.replicate_count, 1000);
        assert_eq!(config.year_count, 50);
        assert_eq!(config.initial_population, 500.0);
        assert!(config.stochasticity.is_deterministic());
    }

    #[test]
    fn test_rejects_zero_counts() {
        let config = SimulationConfig {
            replicate_count: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigurationError::NoReplicates));

        let config = SimulationConfig {
            year_count: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigurationError::NoYears));
    }

    #[test]
    fn test_rejects_negative_values() {
        let config = SimulationConfig {
            initial_population: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::Negative {
                name: "initial_population",
                ..
            })
        ));

        let mut config = SimulationConfig::default();
        config.death.sd = -0.01;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::Negative {
                name: "death_rate_sd",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_invalid_threshold() {
        for (threshold, non_finite) in [(-5.0, false), (f64::NAN, true), (f64::INFINITY, true)] {
            let config = SimulationConfig {
                quasi_extinction_threshold: threshold,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            match err {
                ConfigurationError::NonFinite { name, .. } => {
                    assert!(non_finite);
                    assert_eq!(name, "quasi_extinction_threshold");
                }
                ConfigurationError::Negative { name, .. } => {
                    assert!(!non_finite);
                    assert_eq!(name, "quasi_extinction_threshold");
                }
                other => panic!("unexpected error {other:?}"),
            }
        }

        let config = SimulationConfig {
            quasi_extinction_threshold: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_nan() {
        let mut config = SimulationConfig::default();
        config.birth.mean = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::NonFinite {
                name: "mean_birth_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_bounds_only_matter_when_parametric() {
        let mut config = SimulationConfig::default();
        config.birth.min = 0.5;
        config.birth.max = 0.1;
        assert!(config.validate().is_ok());

        config.stochasticity.parametric = true;
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::InvertedBounds {
                rate: "birth",
                min: 0.5,
                max: 0.1
            })
        );
    }

    #[test]
    fn test_death_probability_checked_under_demographic() {
        let mut config = SimulationConfig::default();
        config.death = VitalRateConfig::fixed(1.2);
        assert!(config.validate().is_ok());

        config.stochasticity.demographic = true;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::DeathProbabilityAboveOne {
                name: "mean_death_rate",
                ..
            })
        ));

        config.death = VitalRateConfig::new(0.3, 0.0, 0.2, 1.5);
        config.stochasticity.parametric = true;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::DeathProbabilityAboveOne {
                name: "max_death_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_trial_rounding() {
        assert_eq!(TrialRounding::Floor.trials(4.9), Some(4));
        assert_eq!(TrialRounding::Nearest.trials(4.5), Some(5));
        assert_eq!(TrialRounding::Nearest.trials(4.4), Some(4));
        assert_eq!(TrialRounding::Floor.trials(0.0), Some(0));
        assert_eq!(TrialRounding::Floor.trials(-1.0), None);
        assert_eq!(TrialRounding::Floor.trials(f64::INFINITY), None);
    }

    #[test]
    fn test_json_roundtrip_keeps_seed_and_flags() {
        let mut config = SimulationConfig::default();
        config.seed = Some(42);
        config.stochasticity.environmental = true;
        config.stochasticity.trial_rounding = TrialRounding::Nearest;

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"nearest\""));
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
