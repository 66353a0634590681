use pva_sim::simulation::{SimulationConfig, VitalRateConfig};

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn print_rate(label: &str, flag: &str, rate: &VitalRateConfig) {
    println!("  • {label}: mean {} [--{flag}-rate]", rate.mean);
    println!("    - Yearly SD: {} [--{flag}-sd]", rate.sd);
    println!(
        "    - Mean bounds: [{}, {}] [--{flag}-min, --{flag}-max]",
        rate.min, rate.max
    );
}

pub fn print_parameters(config: &SimulationConfig) {
    println!("\n📋 Projection Configuration");
    println!(
        "  • Replicates: {} [-r, --replicates]",
        config.replicate_count
    );
    println!("  • Years: {} [-y, --years]", config.year_count);
    println!(
        "  • Initial Population: {} [-n, --initial-population]",
        config.initial_population
    );
    if let Some(seed) = config.seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Random [--seed]");
    }

    println!("\n📈 Vital Rates");
    print_rate("Birth Rate", "birth", &config.birth);
    print_rate("Death Rate", "death", &config.death);

    let s = &config.stochasticity;
    println!("\n🎲 Stochasticity");
    println!(
        "  • Environmental: {} [--environmental]",
        on_off(s.environmental)
    );
    println!("  • Demographic: {} [--demographic]", on_off(s.demographic));
    println!("  • Parametric: {} [--parametric]", on_off(s.parametric));
    if s.demographic {
        println!("  • Trial Rounding: {:?} [--trial-rounding]", s.trial_rounding);
    }

    println!("\n⚠️  Quasi-extinction");
    println!(
        "  • Threshold: {} [--threshold]",
        config.quasi_extinction_threshold
    );
    println!();
}
