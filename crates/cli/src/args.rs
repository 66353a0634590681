use clap::{Args, ValueEnum};
use pva_sim::simulation::TrialRounding;
use std::path::PathBuf;

use crate::defaults;

/// Rounding rule for Binomial death trials.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingArg {
    Floor,
    Nearest,
}

impl From<RoundingArg> for TrialRounding {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::Floor => TrialRounding::Floor,
            RoundingArg::Nearest => TrialRounding::Nearest,
        }
    }
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output database path
    #[arg(short, long, default_value = defaults::OUTPUT_DB)]
    pub output: PathBuf,

    /// Number of independent replicates
    #[arg(short = 'r', long, default_value_t = defaults::REPLICATES)]
    pub replicates: usize,

    /// Number of years per trajectory (including the initial year)
    #[arg(short = 'y', long, default_value_t = defaults::YEARS)]
    pub years: usize,

    /// Population size in year 1
    #[arg(short = 'n', long, default_value_t = defaults::INITIAL_POPULATION)]
    pub initial_population: f64,

    /// Mean per-capita birth rate
    #[arg(long, default_value_t = defaults::BIRTH_RATE)]
    pub birth_rate: f64,

    /// Standard deviation of yearly birth rates (environmental stochasticity)
    #[arg(long, default_value_t = defaults::RATE_SD)]
    pub birth_sd: f64,

    /// Lower bound of the mean birth rate (parametric uncertainty)
    #[arg(long, default_value_t = defaults::RATE_MIN)]
    pub birth_min: f64,

    /// Upper bound of the mean birth rate (parametric uncertainty)
    #[arg(long, default_value_t = defaults::RATE_MAX)]
    pub birth_max: f64,

    /// Mean per-capita death rate
    #[arg(long, default_value_t = defaults::DEATH_RATE)]
    pub death_rate: f64,

    /// Standard deviation of yearly death rates (environmental stochasticity)
    #[arg(long, default_value_t = defaults::RATE_SD)]
    pub death_sd: f64,

    /// Lower bound of the mean death rate (parametric uncertainty)
    #[arg(long, default_value_t = defaults::RATE_MIN)]
    pub death_min: f64,

    /// Upper bound of the mean death rate (parametric uncertainty)
    #[arg(long, default_value_t = defaults::RATE_MAX)]
    pub death_max: f64,

    /// Draw each year's rates around the mean
    #[arg(long)]
    pub environmental: bool,

    /// Draw births and deaths as discrete random events
    #[arg(long)]
    pub demographic: bool,

    /// Draw each replicate's mean rates from their bounds
    #[arg(long)]
    pub parametric: bool,

    /// How a fractional population becomes a death trial count
    #[arg(long, value_enum, default_value_t = RoundingArg::Floor)]
    pub trial_rounding: RoundingArg,

    /// Quasi-extinction threshold
    ///
    /// A replicate counts as quasi-extinct when its final population is below this value.
    #[arg(long, default_value_t = defaults::THRESHOLD)]
    pub threshold: f64,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for InitArgs {
    fn default() -> Self {
        Self {
            output: PathBuf::from(defaults::OUTPUT_DB),
            replicates: defaults::REPLICATES,
            years: defaults::YEARS,
            initial_population: defaults::INITIAL_POPULATION,
            birth_rate: defaults::BIRTH_RATE,
            birth_sd: defaults::RATE_SD,
            birth_min: defaults::RATE_MIN,
            birth_max: defaults::RATE_MAX,
            death_rate: defaults::DEATH_RATE,
            death_sd: defaults::RATE_SD,
            death_min: defaults::RATE_MIN,
            death_max: defaults::RATE_MAX,
            environmental: false,
            demographic: false,
            parametric: false,
            trial_rounding: RoundingArg::Floor,
            threshold: defaults::THRESHOLD,
            seed: None,
        }
    }
}
