use anyhow::{Context, Result};
use pva_sim::analysis::summarize_years;
use pva_sim::storage::QueryBuilder;
use std::path::PathBuf;

pub fn export_data(
    database: &PathBuf,
    format: &str,
    output: Option<&PathBuf>,
    data_type: &str,
) -> Result<()> {
    if !database.exists() {
        anyhow::bail!("Database file does not exist: {}", database.display());
    }

    let query = QueryBuilder::new(database).context("Failed to open database")?;

    let content = match data_type {
        "trajectories" => export_trajectories(&query, format)?,
        "summary" => export_summary(&query, format)?,
        "metadata" => export_metadata(&query, format)?,
        _ => anyhow::bail!(
            "Unknown data type '{data_type}'. Use: trajectories, summary, or metadata"
        ),
    };

    if let Some(path) = output {
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("✓ Data exported to: {}", path.display());
    } else {
        println!("{content}");
    }

    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn export_trajectories(query: &QueryBuilder, format: &str) -> Result<String> {
    let result = query
        .get_result()
        .context("Failed to load projection result")?;

    let content = match format {
        "csv" => {
            let mut csv =
                String::from("replicate,year,population,birth_rate,death_rate,births,deaths\n");
            for row in result.rows() {
                csv.push_str(&format!(
                    "{},{},{},{},{},{},{}\n",
                    row.replicate,
                    row.year,
                    row.population,
                    row.birth_rate,
                    row.death_rate,
                    optional(row.births),
                    optional(row.deaths)
                ));
            }
            csv
        }
        "json" => {
            let rows: Vec<_> = result.rows().collect();
            serde_json::to_string_pretty(&rows)?
        }
        _ => anyhow::bail!("Unknown format '{format}'. Use: csv or json"),
    };
    Ok(content)
}

fn export_summary(query: &QueryBuilder, format: &str) -> Result<String> {
    let result = query
        .get_result()
        .context("Failed to load projection result")?;
    let summary = summarize_years(&result);

    let content = match format {
        "csv" => {
            let mut csv = String::from("year,mean,p05,median,p95,extinct_fraction\n");
            for s in &summary {
                csv.push_str(&format!(
                    "{},{},{},{},{},{}\n",
                    s.year, s.mean, s.p05, s.median, s.p95, s.extinct_fraction
                ));
            }
            csv
        }
        "json" => serde_json::to_string_pretty(&summary)?,
        _ => anyhow::bail!("Format '{format}' not supported for summary. Use: csv or json"),
    };
    Ok(content)
}

fn export_metadata(query: &QueryBuilder, format: &str) -> Result<String> {
    let config = query
        .get_full_config()
        .context("Failed to load configuration")?;
    let mut meta: Vec<_> = query.get_metadata()?.into_iter().collect();
    meta.sort();

    let content = match format {
        "json" => {
            use serde_json::json;
            serde_json::to_string_pretty(&json!({
                "status": query.get_metadata_value("status")?,
                "configuration": config,
                "extinction": query.get_extinction_results()?,
            }))?
        }
        "csv" => {
            let mut csv = String::from("key,value\n");
            for (k, v) in meta {
                // The full configuration is JSON and would need quoting
                if v.contains(',') {
                    csv.push_str(&format!("{k},\"{}\"\n", v.replace('"', "\"\"")));
                } else {
                    csv.push_str(&format!("{k},{v}\n"));
                }
            }
            csv
        }
        _ => anyhow::bail!("Format '{format}' not supported for metadata. Use: json or csv"),
    };
    Ok(content)
}
