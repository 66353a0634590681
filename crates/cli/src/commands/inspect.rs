use anyhow::{Context, Result};
use pva_sim::storage::QueryBuilder;
use std::path::PathBuf;

use crate::printing::print_parameters;

pub fn show_info(database: &PathBuf) -> Result<()> {
    if !database.exists() {
        anyhow::bail!("Database file does not exist: {}", database.display());
    }

    let query = QueryBuilder::new(database).context("Failed to open database")?;
    let config = query
        .get_full_config()
        .context("Failed to get projection info")?;

    println!("\n📊 Projection Information");
    println!("{}", "=".repeat(50));
    print_parameters(&config);

    let status = query
        .get_metadata_value("status")?
        .unwrap_or_else(|| "unknown".to_string());
    println!("Status: {status}");

    let stats = query.database().stats()?;
    println!("Replicates stored: {}", stats.replicate_records);
    println!("Trajectory rows: {}", stats.trajectory_records);

    let extinction = query
        .get_extinction_results()
        .context("Failed to load quasi-extinction results")?;
    if !extinction.is_empty() {
        println!("\n⚠️  Quasi-extinction Results");
        for r in &extinction {
            println!(
                "  • τ = {} ({}): {:.4}",
                r.threshold, r.criterion, r.probability
            );
        }
    }

    Ok(())
}
