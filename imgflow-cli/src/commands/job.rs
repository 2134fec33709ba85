//! Job command handlers
//!
//! Handles the commands that act on a single existing job: status,
//! access URLs, downloads and deletion.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use colored::*;
use imgflow_core::domain::job::Job;
use imgflow_core::domain::operation::ResourceVariant;

use super::colorize_status;
use crate::config::Config;
use crate::id_resolver::resolve_job_id;

/// A job together with the rendition to act on
#[derive(Args)]
pub struct JobArgs {
    /// Job ID or unambiguous prefix
    pub id: String,

    /// Rendition: original, thumbnail, resize or watermark
    #[arg(long, default_value = "original")]
    pub operation: ResourceVariant,
}

/// Get and display the status of a job
pub async fn show_status(config: &Config, id: &str, json: bool) -> Result<()> {
    let client = config.client();
    let job_id = resolve_job_id(&client, id).await?;

    let job = match client.fetch_status(job_id).await {
        Ok(job) => job,
        Err(e) if e.is_not_found() => return Err(anyhow!("Job {} does not exist", job_id)),
        Err(e) => return Err(e).context("Failed to fetch job status"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&job)?);
    } else {
        print_job_details(&job);
    }

    Ok(())
}

/// Print a temporary link to a rendition
pub async fn show_access_url(config: &Config, args: JobArgs, expiry: Option<u64>) -> Result<()> {
    let client = config.client();
    let job_id = resolve_job_id(&client, &args.id).await?;
    let expiry = expiry.unwrap_or(config.session.access_url_expiry);

    let access = client
        .fetch_access_url(job_id, args.operation, expiry)
        .await
        .context("Failed to get access URL")?;

    println!("{}", access.url);
    println!(
        "{}",
        format!("Valid for {} second(s)", access.expiry).dimmed()
    );

    Ok(())
}

/// Download a rendition into `output`
pub async fn download(config: &Config, args: JobArgs, output: &Path) -> Result<()> {
    let client = config.client();
    let job_id = resolve_job_id(&client, &args.id).await?;

    let rendition = client
        .fetch_resource(job_id, args.operation)
        .await
        .with_context(|| format!("Failed to download {} of {}", args.operation, job_id))?;

    tokio::fs::write(output, &rendition.bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} Saved {} ({} bytes, {}) to {}",
        "✓".green(),
        args.operation,
        rendition.bytes.len(),
        rendition.content_type.as_deref().unwrap_or("unknown type"),
        output.display()
    );

    Ok(())
}

/// Delete a job
pub async fn delete(config: &Config, id: &str) -> Result<()> {
    let client = config.client();
    let job_id = resolve_job_id(&client, id).await?;

    let ack = client
        .remove(job_id)
        .await
        .context("Failed to delete job")?;

    if ack.success {
        println!("{} Deleted job {}", "✓".green(), job_id.to_string().cyan());
    } else {
        println!("{} {}", "✗".red(), ack.message);
    }

    Ok(())
}

/// Print detailed job information
fn print_job_details(job: &Job) {
    println!("{}", "Job Details:".bold());
    println!("  ID:         {}", job.id.to_string().cyan());
    println!("  Status:     {}", colorize_status(job.status));
    println!("  Progress:   {}%", job.progress);
    println!(
        "  Operations: {}/{}",
        job.processed_operations, job.total_operations
    );

    if let Some(error) = &job.error_message {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }
}
