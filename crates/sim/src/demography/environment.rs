//! Year-to-year rate variation.
//!
//! Environmental stochasticity draws each year's birth and death rate
//! independently from a normal distribution around the replicate's mean,
//! then takes the absolute value. Reflecting the negative tail (rather than
//! resampling or truncating at zero) biases the realized mean upwards when
//! the standard deviation is large relative to the mean; that bias is part
//! of the model.

use crate::demography::VitalRates;
use crate::errors::SamplingFault;
use crate::simulation::SimulationConfig;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Per-year birth and death rates for one replicate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSequences {
    pub birth: Vec<f64>,
    pub death: Vec<f64>,
}

impl RateSequences {
    /// Rates for year `year` (zero-based).
    pub fn year(&self, year: usize) -> Option<VitalRates> {
        Some(VitalRates::new(*self.birth.get(year)?, *self.death.get(year)?))
    }

    pub fn len(&self) -> usize {
        self.birth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.birth.is_empty()
    }
}

/// Expands mean rates into per-year sequences.
#[derive(Debug, Clone, Copy)]
pub struct RateSequenceGenerator {
    year_count: usize,
    birth_sd: f64,
    death_sd: f64,
    environmental: bool,
}

impl RateSequenceGenerator {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            year_count: config.year_count,
            birth_sd: config.birth.sd,
            death_sd: config.death.sd,
            environmental: config.stochasticity.environmental,
        }
    }

    /// Generate `year_count` rates for each of birth and death.
    ///
    /// The whole birth sequence is drawn before the death sequence.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        means: VitalRates,
        rng: &mut R,
    ) -> Result<RateSequences, SamplingFault> {
        if !self.environmental {
            return Ok(RateSequences {
                birth: vec![means.birth; self.year_count],
                death: vec![means.death; self.year_count],
            });
        }

        let birth = self.draw_sequence(means.birth, self.birth_sd, rng)?;
        let death = self.draw_sequence(means.death, self.death_sd, rng)?;
        Ok(RateSequences { birth, death })
    }

    fn draw_sequence<R: Rng + ?Sized>(
        &self,
        mean: f64,
        sd: f64,
        rng: &mut R,
    ) -> Result<Vec<f64>, SamplingFault> {
        let normal = Normal::new(mean, sd).map_err(|_| SamplingFault::Normal { mean, sd })?;
        Ok((0..self.year_count)
            .map(|_| normal.sample(rng).abs())
            .collect())
    }
}
