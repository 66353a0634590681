//! Projection engine.
//!
//! Runs many independent replicates of the trajectory simulator and
//! collects them into a [`ProjectionResult`]. Each replicate owns its own
//! Xoshiro256++ generator seeded from a master stream, so the output for a
//! given seed is identical whether replicates run on one thread or many.

use crate::errors::{ConfigurationError, ProjectionError, SamplingDomainError};
use crate::simulation::{ProjectionResult, Replicate, SimulationConfig, TrajectorySimulator};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// A validated projection ready to run.
#[derive(Debug, Clone)]
pub struct Projection {
    config: SimulationConfig,
    simulator: TrajectorySimulator,
}

impl Projection {
    /// Validate `config` and prepare a projection.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let simulator = TrajectorySimulator::new(&config);
        Ok(Self { config, simulator })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run all replicates in parallel, seeding from the configured seed.
    pub fn run(&self) -> Result<ProjectionResult, SamplingDomainError> {
        self.run_observed(|| {})
    }

    /// Run in parallel, calling `on_replicate` after each finished replicate.
    pub fn run_observed<F>(&self, on_replicate: F) -> Result<ProjectionResult, SamplingDomainError>
    where
        F: Fn() + Sync,
    {
        let mut master = self.master_rng();
        self.run_parallel_with_rng(&mut master, on_replicate)
    }

    /// Run in parallel, drawing replicate seeds from `rng`.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<ProjectionResult, SamplingDomainError> {
        self.run_parallel_with_rng(rng, || {})
    }

    /// Run all replicates on the calling thread.
    ///
    /// Produces exactly the same result as [`Projection::run`] for the same seed.
    pub fn run_sequential(&self) -> Result<ProjectionResult, SamplingDomainError> {
        let started = Instant::now();
        let seeds = self.replicate_seeds(&mut self.master_rng());

        let replicates = seeds
            .iter()
            .enumerate()
            .map(|(id, &seed)| self.simulate_replicate(id, seed))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.finish(replicates, started))
    }

    fn run_parallel_with_rng<R, F>(
        &self,
        rng: &mut R,
        on_replicate: F,
    ) -> Result<ProjectionResult, SamplingDomainError>
    where
        R: Rng + ?Sized,
        F: Fn() + Sync,
    {
        let started = Instant::now();
        let seeds = self.replicate_seeds(rng);
        debug!(
            replicates = self.config.replicate_count,
            years = self.config.year_count,
            threads = rayon::current_num_threads(),
            "Starting projection"
        );

        // Each replicate builds its own trajectory by value; nothing is shared
        // between workers except the read-only simulator.
        let replicates = seeds
            .par_iter()
            .enumerate()
            .map(|(id, &seed)| {
                let replicate = self.simulate_replicate(id, seed);
                on_replicate();
                replicate
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.finish(replicates, started))
    }

    fn simulate_replicate(&self, id: usize, seed: u64) -> Result<Replicate, SamplingDomainError> {
        let mut local_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        self.simulator.simulate(id, &mut local_rng)
    }

    fn replicate_seeds<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u64> {
        (0..self.config.replicate_count)
            .map(|_| rng.random())
            .collect()
    }

    fn master_rng(&self) -> Xoshiro256PlusPlus {
        match self.config.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_seed(rand::rng().random()),
        }
    }

    fn finish(&self, replicates: Vec<Replicate>, started: Instant) -> ProjectionResult {
        info!(
            replicates = replicates.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Projection complete"
        );
        ProjectionResult::new(self.config.clone(), replicates)
    }
}

/// Validate `config` and run a full projection.
pub fn run_projection(config: &SimulationConfig) -> Result<ProjectionResult, ProjectionError> {
    let projection = Projection::new(config.clone())?;
    Ok(projection.run()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{SimulationBuilder, VitalRateConfig};

    fn stochastic(seed: u64) -> Projection {
        SimulationBuilder::new()
            .replicates(50)
            .years(20)
            .initial_population(30.0)
            .birth_rate(0.3)
            .death_rate(0.3)
            .birth_rate_sd(0.1)
            .death_rate_sd(0.1)
            .birth_rate_bounds(0.2, 0.4)
            .death_rate_bounds(0.2, 0.4)
            .environmental_stochasticity(true)
            .demographic_stochasticity(true)
            .parametric_uncertainty(true)
            .seed(seed)
            .build()
            .unwrap()
    }

    #[test]
    fn test_run_produces_all_replicates() {
        let result = stochastic(1).run().unwrap();
        assert_eq!(result.replicate_count(), 50);
        for (id, rep) in result.replicates().iter().enumerate() {
            assert_eq!(rep.id(), id);
            assert_eq!(rep.year_count(), 20);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let projection = stochastic(99);
        let parallel = projection.run().unwrap();
        let sequential = projection.run_sequential().unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_same_seed_reproduces() {
        let a = stochastic(5).run().unwrap();
        let b = stochastic(5).run().unwrap();
        assert_eq!(a, b);

        let c = stochastic(6).run().unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_injected_rng() {
        let projection = stochastic(0);
        let mut rng_a = Xoshiro256PlusPlus::seed_from_u64(77);
        let mut rng_b = Xoshiro256PlusPlus::seed_from_u64(77);
        assert_eq!(
            projection.run_with_rng(&mut rng_a).unwrap(),
            projection.run_with_rng(&mut rng_b).unwrap()
        );
    }

    #[test]
    fn test_observer_called_per_replicate() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let count = AtomicUsize::new(0);
        stochastic(3)
            .run_observed(|| {
                count.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
        assert_eq!(count.load(Ordering::Relaxed), 50);
    }

    #[test]
    fn test_run_projection_rejects_invalid_config() {
        let config = SimulationConfig {
            replicate_count: 0,
            ..Default::default()
        };
        assert_eq!(
            run_projection(&config),
            Err(ProjectionError::Configuration(ConfigurationError::NoReplicates))
        );
    }

    #[test]
    fn test_run_projection_surfaces_sampling_errors() {
        let mut config = SimulationConfig {
            replicate_count: 20,
            year_count: 30,
            initial_population: 100.0,
            seed: Some(8),
            ..Default::default()
        };
        config.death = VitalRateConfig::new(0.9, 5.0, 0.9, 0.9);
        config.stochasticity.environmental = true;
        config.stochasticity.demographic = true;

        assert!(matches!(
            run_projection(&config),
            Err(ProjectionError::Sampling(_))
        ));
    }
}
