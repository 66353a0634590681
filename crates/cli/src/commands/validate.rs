use anyhow::{Context, Result};
use pva_sim::storage::QueryBuilder;
use std::path::PathBuf;

pub fn validate_database(database: &PathBuf) -> Result<()> {
    println!("🔍 Validating database: {}", database.display());

    if !database.exists() {
        anyhow::bail!("Database file does not exist");
    }

    let query = QueryBuilder::new(database).context("Failed to open database")?;
    let mut total_issues = 0;

    let config = match query.get_full_config() {
        Ok(config) => {
            println!("✓ Configuration: OK");
            config
        }
        Err(e) => {
            println!("✗ Configuration: FAILED - {e}");
            anyhow::bail!("Validation failed: no usable configuration");
        }
    };

    if let Err(e) = config.validate() {
        println!("✗ Stored configuration is invalid: {e}");
        total_issues += 1;
    }

    if !query.has_result()? {
        println!("⚠️  No completed projection recorded");
        println!("\n{}", "=".repeat(50));
        println!("✓ Validation complete: configuration only");
        return Ok(());
    }

    let stats = query.database().stats()?;
    let expected_rows = config.replicate_count * config.year_count;
    if stats.replicate_records == config.replicate_count && stats.trajectory_records == expected_rows
    {
        println!(
            "✓ Row counts: OK ({} replicates, {} trajectory rows)",
            stats.replicate_records, stats.trajectory_records
        );
    } else {
        println!(
            "⚠️  Row counts: {} replicates and {} trajectory rows (expected {} and {})",
            stats.replicate_records,
            stats.trajectory_records,
            config.replicate_count,
            expected_rows
        );
        total_issues += 1;
    }

    match query.get_result() {
        Ok(result) => {
            println!("✓ Trajectories: loaded {} replicates", result.replicate_count());

            let negative = result
                .replicates()
                .iter()
                .filter(|r| r.population().iter().any(|&n| n < 0.0 || !n.is_finite()))
                .count();
            if negative == 0 {
                println!("✓ Non-negativity: OK");
            } else {
                println!("✗ Non-negativity: {negative} replicate(s) with invalid sizes");
                total_issues += 1;
            }

            let revived = result
                .replicates()
                .iter()
                .filter(|r| {
                    r.extinction_year()
                        .is_some_and(|y| r.population()[y - 1..].iter().any(|&n| n != 0.0))
                })
                .count();
            if revived == 0 {
                println!("✓ Absorbing zero: OK");
            } else {
                println!("✗ Absorbing zero: {revived} replicate(s) recovered from zero");
                total_issues += 1;
            }

            let wrong_start = result
                .replicates()
                .iter()
                .filter(|r| r.population().first() != Some(&config.initial_population))
                .count();
            if wrong_start == 0 {
                println!("✓ Initial population: OK");
            } else {
                println!("✗ Initial population: {wrong_start} replicate(s) do not start at N0");
                total_issues += 1;
            }
        }
        Err(e) => {
            println!("✗ Failed to load trajectories: {e}");
            total_issues += 1;
        }
    }

    match query.get_extinction_results() {
        Ok(results) => {
            let bad = results
                .iter()
                .filter(|r| !(0.0..=1.0).contains(&r.probability))
                .count();
            if bad == 0 {
                println!("✓ Quasi-extinction results: {} entries", results.len());
            } else {
                println!("✗ Quasi-extinction results: {bad} probabilities outside [0, 1]");
                total_issues += 1;
            }
        }
        Err(e) => {
            println!("⚠️  Quasi-extinction query failed: {e}");
            total_issues += 1;
        }
    }

    println!("\n{}", "=".repeat(50));
    if total_issues == 0 {
        println!("✓ Validation complete: No issues found");
        Ok(())
    } else {
        println!("⚠️  Validation complete: {total_issues} issue(s) found");
        anyhow::bail!("Validation found {total_issues} issue(s)")
    }
}
