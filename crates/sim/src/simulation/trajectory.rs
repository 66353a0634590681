//! Single-replicate population trajectories.
//!
//! A replicate starts at the configured initial size and advances one year
//! at a time: `N[t] = max(0, N[t-1] + births[t-1] - deaths[t-1])`. Zero is
//! absorbing because no events are sampled from an empty population.

use crate::demography::{
    ParameterResolver, RateSequenceGenerator, RateSequences, VitalEventSampler, VitalEvents,
    VitalRates,
};
use crate::errors::{SamplingDomainError, SamplingFault};
use crate::simulation::SimulationConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One simulated trajectory and the events that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReplicateRecord")]
pub struct Replicate {
    /// Zero-based replicate index
    id: usize,
    /// Mean rates resolved for this replicate
    mean_rates: VitalRates,
    /// Realized per-year birth rates (`year_count` entries)
    birth_rates: Vec<f64>,
    /// Realized per-year death rates (`year_count` entries)
    death_rates: Vec<f64>,
    /// Population size per year (`year_count` entries)
    population: Vec<f64>,
    /// Births of each transition (`year_count - 1` entries)
    births: Vec<f64>,
    /// Deaths of each transition (`year_count - 1` entries)
    deaths: Vec<f64>,
}

/// Unchecked serialized form; lengths are validated by `from_parts`.
#[derive(Deserialize)]
struct ReplicateRecord {
    id: usize,
    mean_rates: VitalRates,
    birth_rates: Vec<f64>,
    death_rates: Vec<f64>,
    population: Vec<f64>,
    births: Vec<f64>,
    deaths: Vec<f64>,
}

impl TryFrom<ReplicateRecord> for Replicate {
    type Error = String;

    fn try_from(record: ReplicateRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        Replicate::from_parts(
            id,
            record.mean_rates,
            RateSequences {
                birth: record.birth_rates,
                death: record.death_rates,
            },
            record.population,
            record.births,
            record.deaths,
        )
        .ok_or_else(|| format!("replicate {id} has inconsistent column lengths"))
    }
}

impl Replicate {
    /// Assemble a replicate from stored parts.
    ///
    /// Returns `None` if the vector lengths are inconsistent.
    pub fn from_parts(
        id: usize,
        mean_rates: VitalRates,
        rates: RateSequences,
        population: Vec<f64>,
        births: Vec<f64>,
        deaths: Vec<f64>,
    ) -> Option<Self> {
        let years = population.len();
        let transitions = years.checked_sub(1)?;
        if rates.birth.len() != years
            || rates.death.len() != years
            || births.len() != transitions
            || deaths.len() != transitions
        {
            return None;
        }
        Some(Self {
            id,
            mean_rates,
            birth_rates: rates.birth,
            death_rates: rates.death,
            population,
            births,
            deaths,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn mean_rates(&self) -> VitalRates {
        self.mean_rates
    }

    /// Population sizes, year 1 first.
    pub fn population(&self) -> &[f64] {
        &self.population
    }

    pub fn births(&self) -> &[f64] {
        &self.births
    }

    pub fn deaths(&self) -> &[f64] {
        &self.deaths
    }

    pub fn birth_rates(&self) -> &[f64] {
        &self.birth_rates
    }

    pub fn death_rates(&self) -> &[f64] {
        &self.death_rates
    }

    pub fn year_count(&self) -> usize {
        self.population.len()
    }

    /// Population size in the final year.
    pub fn final_size(&self) -> f64 {
        self.population.last().copied().unwrap_or(0.0)
    }

    /// Smallest population size over all years.
    pub fn min_size(&self) -> f64 {
        self.population.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// First year (one-based) at which the population is zero.
    pub fn extinction_year(&self) -> Option<usize> {
        self.population.iter().position(|&n| n == 0.0).map(|i| i + 1)
    }

    /// Events that moved the population from `year` to `year + 1`.
    ///
    /// `year` is one-based; the final year has no outgoing events.
    pub fn events(&self, year: usize) -> Option<VitalEvents> {
        let idx = year.checked_sub(1)?;
        Some(VitalEvents {
            births: *self.births.get(idx)?,
            deaths: *self.deaths.get(idx)?,
        })
    }
}

/// Runs the resolver, sequence generator and event sampler for one replicate.
#[derive(Debug, Clone, Copy)]
pub struct TrajectorySimulator {
    initial_population: f64,
    year_count: usize,
    resolver: ParameterResolver,
    sequences: RateSequenceGenerator,
    sampler: VitalEventSampler,
}

impl TrajectorySimulator {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            initial_population: config.initial_population,
            year_count: config.year_count,
            resolver: ParameterResolver::new(config),
            sequences: RateSequenceGenerator::new(config),
            sampler: VitalEventSampler::new(config),
        }
    }

    /// Simulate replicate `id` using `rng` as its sole source of randomness.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        id: usize,
        rng: &mut R,
    ) -> Result<Replicate, SamplingDomainError> {
        let mean_rates = self.resolver.resolve(rng);
        let rates = self
            .sequences
            .generate(mean_rates, rng)
            .map_err(|fault| SamplingDomainError {
                replicate: id,
                year: 1,
                fault,
            })?;

        let transitions = self.year_count.saturating_sub(1);
        let mut population = Vec::with_capacity(self.year_count);
        let mut births = Vec::with_capacity(transitions);
        let mut deaths = Vec::with_capacity(transitions);

        let mut current = self.initial_population;
        population.push(current);

        for (idx, (&b, &d)) in rates.birth.iter().zip(&rates.death).take(transitions).enumerate() {
            let events = self
                .sampler
                .sample(current, VitalRates::new(b, d), rng)
                .map_err(|fault| SamplingDomainError {
                    replicate: id,
                    year: idx + 1,
                    fault,
                })?;

            let next = current + events.births - events.deaths;
            // An overflowed size would turn into NaN next year and be floored to zero
            if !next.is_finite() {
                return Err(SamplingDomainError {
                    replicate: id,
                    year: idx + 2,
                    fault: SamplingFault::SizeOverflow(next),
                });
            }
            current = next.max(0.0);
            births.push(events.births);
            deaths.push(events.deaths);
            population.push(current);
        }

        Ok(Replicate {
            id,
            mean_rates,
            birth_rates: rates.birth,
            death_rates: rates.death,
            population,
            births,
            deaths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::VitalRateConfig;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn deterministic(initial: f64, birth: f64, death: f64, years: usize) -> SimulationConfig {
        SimulationConfig {
            year_count: years,
            initial_population: initial,
            birth: VitalRateConfig::fixed(birth),
            death: VitalRateConfig::fixed(death),
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_net_growth_is_flat() {
        let sim = TrajectorySimulator::new(&deterministic(500.0, 0.3, 0.3, 50));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        let rep = sim.simulate(0, &mut rng).unwrap();
        assert_eq!(rep.year_count(), 50);
        for &n in rep.population() {
            assert!((n - 500.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_geometric_growth() {
        let sim = TrajectorySimulator::new(&deterministic(500.0, 0.4, 0.3, 50));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        let rep = sim.simulate(0, &mut rng).unwrap();
        for (t, &n) in rep.population().iter().enumerate() {
            let expected = 500.0 * 1.1f64.powi(t as i32);
            assert!((n - expected).abs() / expected < 1e-9, "year {t}: {n} vs {expected}");
        }
        let expected_final = 500.0 * 1.1f64.powi(49);
        assert!((rep.final_size() - expected_final).abs() / expected_final < 1e-9);
    }

    #[test]
    fn test_floor_at_zero_and_absorbing() {
        // Death rate above 1 overshoots; the floor catches it
        let sim = TrajectorySimulator::new(&deterministic(10.0, 0.0, 1.5, 6));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        let rep = sim.simulate(3, &mut rng).unwrap();
        assert_eq!(rep.id(), 3);
        assert_eq!(rep.population(), &[10.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(rep.extinction_year(), Some(2));
        assert_eq!(rep.events(2), Some(VitalEvents::NONE));
    }

    #[test]
    fn test_overflowing_growth_is_an_error_not_extinction() {
        let sim = TrajectorySimulator::new(&deterministic(500.0, 10.0, 0.3, 400));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        let err = sim.simulate(2, &mut rng).unwrap_err();
        assert_eq!(err.replicate, 2);
        assert!(matches!(err.fault, SamplingFault::SizeOverflow(n) if n.is_infinite()));
        // 500 * 10.7^(t-1) passes f64::MAX a little before year 300
        assert!((250..=310).contains(&err.year), "year {}", err.year);
    }

    #[test]
    fn test_single_year_has_no_transitions() {
        let sim = TrajectorySimulator::new(&deterministic(42.0, 0.5, 0.1, 1));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        let rep = sim.simulate(0, &mut rng).unwrap();
        assert_eq!(rep.population(), &[42.0]);
        assert!(rep.births().is_empty());
        assert_eq!(rep.events(1), None);
    }

    #[test]
    fn test_demographic_trajectory_stays_non_negative() {
        let mut config = deterministic(5.0, 0.3, 0.35, 100);
        config.stochasticity.demographic = true;
        let sim = TrajectorySimulator::new(&config);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(17);

        for id in 0..200 {
            let rep = sim.simulate(id, &mut rng).unwrap();
            assert!(rep.population().iter().all(|&n| n >= 0.0));
            if let Some(year) = rep.extinction_year() {
                assert!(rep.population()[year - 1..].iter().all(|&n| n == 0.0));
            }
        }
    }

    #[test]
    fn test_sampling_error_reports_replicate_and_year() {
        let mut config = deterministic(100.0, 0.2, 0.9, 30);
        config.stochasticity.demographic = true;
        config.stochasticity.environmental = true;
        config.death.sd = 5.0;
        let sim = TrajectorySimulator::new(&config);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(23);

        let err = sim.simulate(4, &mut rng).unwrap_err();
        assert_eq!(err.replicate, 4);
        assert!((1..30).contains(&err.year));
    }

    #[test]
    fn test_deserialize_checks_lengths() {
        let sim = TrajectorySimulator::new(&deterministic(20.0, 0.3, 0.2, 4));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let rep = sim.simulate(0, &mut rng).unwrap();

        let json = serde_json::to_string(&rep).unwrap();
        let back: Replicate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rep);

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["birth_rates"] = serde_json::json!([0.3]);
        let err = serde_json::from_value::<Replicate>(value).unwrap_err();
        assert!(err.to_string().contains("inconsistent column lengths"));
    }

    #[test]
    fn test_from_parts_rejects_mismatched_lengths() {
        let rates = RateSequences {
            birth: vec![0.1; 3],
            death: vec![0.1; 3],
        };
        let ok = Replicate::from_parts(
            0,
            VitalRates::new(0.1, 0.1),
            rates.clone(),
            vec![1.0, 1.0, 1.0],
            vec![0.1, 0.1],
            vec![0.1, 0.1],
        );
        assert!(ok.is_some());

        let bad = Replicate::from_parts(
            0,
            VitalRates::new(0.1, 0.1),
            rates,
            vec![1.0, 1.0, 1.0],
            vec![0.1],
            vec![0.1, 0.1],
        );
        assert!(bad.is_none());
    }
}
