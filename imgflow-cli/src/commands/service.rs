//! Service-level command handlers: telemetry and liveness

use anyhow::{Context, Result, bail};
use colored::*;

use crate::config::Config;

/// Print the service-wide processing statistics
pub async fn show_stats(config: &Config, json: bool) -> Result<()> {
    let snapshot = config
        .client()
        .fetch_telemetry()
        .await
        .context("Failed to fetch statistics")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("{}", "Processing Statistics:".bold());
    println!("  Uploaded:        {}", snapshot.total_images_uploaded);
    println!(
        "  Processed:       {}",
        snapshot.total_images_processed.to_string().green()
    );
    println!(
        "  Failed:          {}",
        snapshot.total_images_failed.to_string().red()
    );
    println!(
        "  Data processed:  {:.2} MB",
        snapshot.total_data_processed_mb()
    );
    println!(
        "  Avg. time:       {:.0} ms",
        snapshot.average_processing_time_ms
    );
    if let Some(updated) = snapshot.last_updated {
        println!(
            "  Last updated:    {}",
            updated.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
    }

    if !snapshot.operation_statistics.is_empty() {
        println!("\n{}", "Operations:".bold());
        for stat in &snapshot.operation_statistics {
            let rate = stat
                .success_rate()
                .map(|r| format!("{:.1}%", r))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<10} {:>6} run(s)  {:>6} ok  {:>6} failed  {:>7} success  {:>8.0} ms avg",
                stat.operation_type.cyan(),
                stat.total_count,
                stat.success_count,
                stat.failure_count,
                rate,
                stat.average_processing_time_ms
            );
        }
    }

    Ok(())
}

/// Probe the service and fail when it is unreachable
pub async fn check_health(config: &Config) -> Result<()> {
    let client = config.client();
    if client.health_check().await {
        println!("{} {} is healthy", "✓".green(), client.base_url());
        Ok(())
    } else {
        bail!("{} is not reachable", client.base_url())
    }
}
