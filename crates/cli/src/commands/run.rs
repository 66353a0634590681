use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pva_sim::analysis::{ExtinctionCriterion, QuasiExtinctionResult};
use pva_sim::simulation::Projection;
use pva_sim::storage::{QueryBuilder, Recorder};
use std::path::PathBuf;

use crate::printing::print_parameters;

pub fn run_simulation(
    database: &PathBuf,
    seed_override: Option<u64>,
    threshold_override: Option<f64>,
    show_progress: bool,
) -> Result<()> {
    println!("🌱 PVA - Running Projection");
    println!("============================================\n");

    if !database.exists() {
        anyhow::bail!(
            "Failed to load configuration: {} does not exist. Did you run 'pva init' first?",
            database.display()
        );
    }

    let query = QueryBuilder::new(database).context("Failed to open database")?;
    let mut config = query
        .get_full_config()
        .context("Failed to load configuration. Did you run 'pva init' first?")?;
    query.close().ok();

    if let Some(seed) = seed_override {
        config.seed = Some(seed);
    }
    if let Some(threshold) = threshold_override {
        config.quasi_extinction_threshold = threshold;
    }

    let projection = Projection::new(config.clone()).context("Invalid configuration")?;

    println!("Configuration:");
    print_parameters(&config);

    // Opening the recorder drops any earlier result, so a failed run leaves no stale rows behind
    let mut recorder = Recorder::new(database, &config).context("Failed to create recorder")?;

    println!("Running {} replicates...", config.replicate_count);
    let pb = if show_progress {
        let pb = ProgressBar::new(config.replicate_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}",
                )
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let result = projection
        .run_observed(|| {
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        })
        .context("Projection failed")?;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    recorder
        .record_result(&result)
        .context("Failed to record projection result")?;

    let extinction = QuasiExtinctionResult::evaluate(
        &result,
        config.quasi_extinction_threshold,
        ExtinctionCriterion::FinalYear,
    )
    .context("Failed to evaluate quasi-extinction")?;
    recorder
        .record_extinction(&extinction)
        .context("Failed to record quasi-extinction result")?;

    let stats = recorder.close().context("Failed to close recorder")?;

    println!("\n✓ Projection complete!");
    println!("  Replicates recorded: {}", stats.replicates_recorded);
    println!("  Trajectory rows: {}", stats.rows_written);
    println!(
        "  Quasi-extinction probability (N < {}): {:.4}",
        extinction.threshold, extinction.probability
    );

    println!("\n💡 Use 'pva info -d {}' to view results", database.display());

    Ok(())
}
