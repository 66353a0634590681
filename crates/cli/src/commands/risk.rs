use anyhow::{Context, Result};
use pva_sim::analysis::{risk_curve, ExtinctionCriterion};
use pva_sim::storage::QueryBuilder;
use std::path::PathBuf;

/// Evaluate quasi-extinction probabilities from stored trajectories.
///
/// With no explicit thresholds, the configured threshold is used.
pub fn show_risk(
    database: &PathBuf,
    thresholds: &[f64],
    criterion: ExtinctionCriterion,
    format: &str,
) -> Result<()> {
    if !database.exists() {
        anyhow::bail!("Database file does not exist: {}", database.display());
    }

    let query = QueryBuilder::new(database).context("Failed to open database")?;
    let result = query
        .get_result()
        .context("Failed to load projection result. Did you run 'pva run' first?")?;

    let thresholds = if thresholds.is_empty() {
        vec![result.config().quasi_extinction_threshold]
    } else {
        thresholds.to_vec()
    };

    let curve = risk_curve(&result, &thresholds, criterion).context("Invalid threshold")?;

    match format {
        "pretty" => {
            println!("\n⚠️  Quasi-extinction Risk ({criterion})");
            println!("{}", "=".repeat(50));
            println!("{:>12}  {:>11}", "threshold", "probability");
            for r in &curve {
                println!("{:>12}  {:>11.4}", r.threshold, r.probability);
            }
        }
        "json" => println!("{}", serde_json::to_string_pretty(&curve)?),
        "csv" => {
            println!("threshold,criterion,probability");
            for r in &curve {
                println!("{},{},{}", r.threshold, r.criterion, r.probability);
            }
        }
        _ => anyhow::bail!("Unknown format '{format}'. Use: pretty, csv, or json"),
    }

    Ok(())
}
