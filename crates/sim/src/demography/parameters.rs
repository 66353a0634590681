//! Per-replicate mean rates.
//!
//! Parametric uncertainty models a rate whose true value is unknown but
//! fixed: one uniform draw per replicate, held for the replicate's whole
//! lifetime.

use crate::demography::VitalRates;
use crate::simulation::{SimulationConfig, VitalRateConfig};
use rand::Rng;

/// Resolves the mean birth and death rates of a replicate.
#[derive(Debug, Clone, Copy)]
pub struct ParameterResolver {
    birth: VitalRateConfig,
    death: VitalRateConfig,
    parametric: bool,
}

impl ParameterResolver {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            birth: config.birth,
            death: config.death,
            parametric: config.stochasticity.parametric,
        }
    }

    /// Draw (or look up) the mean rates for one replicate.
    ///
    /// With parametric uncertainty on, birth is drawn before death. Bounds
    /// are assumed validated (`min <= max`).
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> VitalRates {
        if !self.parametric {
            return VitalRates::new(self.birth.mean, self.death.mean);
        }
        let birth = draw_uniform(rng, self.birth.min, self.birth.max);
        let death = draw_uniform(rng, self.death.min, self.death.max);
        VitalRates::new(birth, death)
    }
}

fn draw_uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.random_range(min..=max)
}
