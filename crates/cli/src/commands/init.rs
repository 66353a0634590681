use anyhow::{Context, Result};
use pva_sim::simulation::{SimulationBuilder, SimulationConfig, VitalRateConfig};
use pva_sim::storage::Recorder;

use crate::args::InitArgs;
use crate::printing::print_parameters;

pub fn init_simulation(args: &InitArgs) -> Result<()> {
    let output = &args.output;

    println!("🌱 PVA - Population Viability Analysis");
    println!("============================================\n");

    let config = build_config(args)?;
    print_parameters(&config);

    println!("Setting up database...");
    let recorder = Recorder::new(output, &config).context("Failed to create recorder")?;
    recorder.close().context("Failed to close recorder")?;

    println!("✓ Database created: {}", output.display());
    println!("\nProjection initialized successfully!");
    println!("  Replicates: {}", config.replicate_count);
    println!("  Years: {}", config.year_count);
    println!("\n💡 Use 'pva run -d {}' to start the projection", output.display());

    Ok(())
}

/// Translate command-line arguments into a validated configuration.
pub fn build_config(args: &InitArgs) -> Result<SimulationConfig> {
    let mut builder = SimulationBuilder::new()
        .replicates(args.replicates)
        .years(args.years)
        .initial_population(args.initial_population)
        .birth(VitalRateConfig::new(
            args.birth_rate,
            args.birth_sd,
            args.birth_min,
            args.birth_max,
        ))
        .death(VitalRateConfig::new(
            args.death_rate,
            args.death_sd,
            args.death_min,
            args.death_max,
        ))
        .environmental_stochasticity(args.environmental)
        .demographic_stochasticity(args.demographic)
        .parametric_uncertainty(args.parametric)
        .trial_rounding(args.trial_rounding.into())
        .threshold(args.threshold);

    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    builder.build_config().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::RoundingArg;
    use pva_sim::simulation::TrialRounding;

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&InitArgs::default()).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_build_config_flags() {
        let args = InitArgs {
            replicates: 20,
            years: 10,
            environmental: true,
            demographic: true,
            trial_rounding: RoundingArg::Nearest,
            seed: Some(5),
            ..Default::default()
        };

        let config = build_config(&args).unwrap();
        assert_eq!(config.replicate_count, 20);
        assert_eq!(config.year_count, 10);
        assert!(config.stochasticity.environmental);
        assert!(config.stochasticity.demographic);
        assert!(!config.stochasticity.parametric);
        assert_eq!(config.stochasticity.trial_rounding, TrialRounding::Nearest);
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn test_build_config_rejects_inverted_bounds() {
        let args = InitArgs {
            parametric: true,
            birth_min: 0.5,
            birth_max: 0.2,
            ..Default::default()
        };

        let err = build_config(&args).unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration");
        assert!(format!("{err:#}").contains("min 0.5 exceeds max 0.2"));
    }

    #[test]
    fn test_build_config_rejects_zero_replicates() {
        let args = InitArgs {
            replicates: 0,
            ..Default::default()
        };
        assert!(build_config(&args).is_err());
    }
}
