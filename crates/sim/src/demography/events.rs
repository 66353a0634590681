//! Realized births and deaths.
//!
//! With demographic stochasticity, births are Poisson with mean `N * b` and
//! deaths are Binomial with `N` trials and probability `d`, so deaths can
//! never exceed the current population. Without it, both are their
//! continuous expectations.
//!
//! Binomial needs an integer trial count. A population carried over from
//! continuous arithmetic may be fractional, so the conversion goes through
//! the configured [`TrialRounding`] rule.
//!
//! Expected counts at or above [`DEMOGRAPHIC_CEILING`] are taken at their
//! expectation even with demographic stochasticity on. Relative noise there
//! is below 1e-7, and both samplers need parameters that fit in a `u64`.

use crate::demography::VitalRates;
use crate::errors::SamplingFault;
use crate::simulation::{SimulationConfig, TrialRounding};
use rand::Rng;
use rand_distr::{Binomial, Distribution, Poisson};

/// Size above which births and deaths are no longer sampled.
pub const DEMOGRAPHIC_CEILING: f64 = 1e15;

/// Births and deaths realized in one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalEvents {
    pub births: f64,
    pub deaths: f64,
}

impl VitalEvents {
    pub const NONE: VitalEvents = VitalEvents {
        births: 0.0,
        deaths: 0.0,
    };
}

/// Converts a population size and rates into event counts.
#[derive(Debug, Clone, Copy)]
pub struct VitalEventSampler {
    demographic: bool,
    rounding: TrialRounding,
}

impl VitalEventSampler {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            demographic: config.stochasticity.demographic,
            rounding: config.stochasticity.trial_rounding,
        }
    }

    /// Sample events for a population of size `population`.
    ///
    /// A population of zero yields no events and consumes no randomness.
    /// Births are drawn before deaths.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        population: f64,
        rates: VitalRates,
        rng: &mut R,
    ) -> Result<VitalEvents, SamplingFault> {
        if population == 0.0 {
            return Ok(VitalEvents::NONE);
        }
        if !self.demographic {
            return Ok(VitalEvents {
                births: population * rates.birth,
                deaths: population * rates.death,
            });
        }

        let births = sample_poisson(population * rates.birth, rng)?;
        let deaths = if population >= DEMOGRAPHIC_CEILING {
            check_probability(rates.death)?;
            population * rates.death
        } else {
            let trials = self
                .rounding
                .trials(population)
                .ok_or(SamplingFault::BinomialTrials(population))?;
            sample_binomial(trials, rates.death, rng)? as f64
        };

        Ok(VitalEvents { births, deaths })
    }
}

fn sample_poisson<R: Rng + ?Sized>(mean: f64, rng: &mut R) -> Result<f64, SamplingFault> {
    if !mean.is_finite() || mean < 0.0 {
        return Err(SamplingFault::PoissonMean(mean));
    }
    if mean == 0.0 {
        return Ok(0.0);
    }
    if mean >= DEMOGRAPHIC_CEILING {
        return Ok(mean);
    }
    let poisson = Poisson::new(mean).map_err(|_| SamplingFault::PoissonMean(mean))?;
    Ok(poisson.sample(rng))
}

fn sample_binomial<R: Rng + ?Sized>(
    trials: u64,
    probability: f64,
    rng: &mut R,
) -> Result<u64, SamplingFault> {
    check_probability(probability)?;
    if trials == 0 {
        return Ok(0);
    }
    let binomial = Binomial::new(trials, probability)
        .map_err(|_| SamplingFault::BinomialProbability(probability))?;
    Ok(binomial.sample(rng))
}

fn check_probability(probability: f64) -> Result<(), SamplingFault> {
    if (0.0..=1.0).contains(&probability) {
        Ok(())
    } else {
        Err(SamplingFault::BinomialProbability(probability))
    }
}
