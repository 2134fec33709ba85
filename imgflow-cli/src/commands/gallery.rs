//! List command handler
//!
//! Shows one page of the image collection through the listing cache.

use anyhow::{Context, Result, anyhow};
use clap::Args;
use colored::*;
use imgflow_core::domain::job::JobStatus;
use imgflow_core::domain::resource::ResourceRecord;
use imgflow_session::{ListingCache, ListingPage};

use super::colorize_status;
use crate::config::Config;

/// Arguments of `imgflow list`
#[derive(Args)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u64,

    /// Only show jobs with this status
    #[arg(long)]
    pub status: Option<JobStatus>,

    /// Only show filenames containing this text
    #[arg(long)]
    pub search: Option<String>,

    /// Match --search case-sensitively
    #[arg(long)]
    pub case_sensitive: bool,
}

/// Handle `imgflow list`
pub async fn handle_list(args: ListArgs, config: &Config) -> Result<()> {
    if args.page == 0 {
        return Err(anyhow!("Pages are numbered from 1"));
    }

    let cache = ListingCache::with_page_size(config.client(), config.session.page_size);
    let mut page = cache
        .load_page(args.status, args.page - 1)
        .await
        .context("Failed to list images")?;

    if let Some(needle) = &args.search {
        page = cache.apply_search(needle, !args.case_sensitive).await;
    }

    print_page(&page);
    Ok(())
}

fn print_page(page: &ListingPage) {
    if page.records.is_empty() {
        println!("{}", "No images found.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} image(s):", page.records.len()).bold()
        );
        println!();
        for record in &page.records {
            print_record(record);
        }
    }

    println!(
        "{}",
        format!(
            "Page {} of {} ({} image(s) in total)",
            page.page_index + 1,
            page.total_pages.max(1),
            page.total_count
        )
        .dimmed()
    );
}

fn print_record(record: &ResourceRecord) {
    println!("  {} {}", "▸".cyan(), record.filename.bold());
    println!("    ID:      {}", record.id.to_string().dimmed());
    println!("    Status:  {}", colorize_status(record.status));
    println!("    Size:    {}", format_size(record.size_bytes));
    println!(
        "    Created: {}",
        record
            .created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f >= KIB * KIB {
        format!("{:.1} MB", bytes_f / (KIB * KIB))
    } else if bytes_f >= KIB {
        format!("{:.1} KB", bytes_f / KIB)
    } else {
        format!("{} B", bytes)
    }
}
