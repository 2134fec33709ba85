//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod gallery;
mod job;
mod service;
mod submit;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use imgflow_core::domain::job::JobStatus;

use crate::config::Config;

pub use gallery::ListArgs;
pub use job::JobArgs;
pub use submit::SubmitArgs;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Upload an image and follow its job to completion
    Submit(SubmitArgs),
    /// Show the processing status of a job
    Status {
        /// Job ID or unambiguous prefix
        id: String,

        /// Print the raw status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a temporary download link for a rendition
    Url {
        #[command(flatten)]
        job: JobArgs,

        /// Link validity in seconds (defaults to the session setting)
        #[arg(long)]
        expiry: Option<u64>,
    },
    /// Download a rendition to a file
    Download {
        #[command(flatten)]
        job: JobArgs,

        /// Output file
        #[arg(short, long)]
        output: std::path::PathBuf,
    },
    /// Delete a job and all of its renditions
    Delete {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Browse the image collection
    List(ListArgs),
    /// Show service-wide processing statistics
    Stats {
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether the service is reachable
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Submit(args) => submit::handle_submit(args, config).await,
        Commands::Status { id, json } => job::show_status(config, &id, json).await,
        Commands::Url { job: target, expiry } => {
            job::show_access_url(config, target, expiry).await
        }
        Commands::Download { job: target, output } => job::download(config, target, &output).await,
        Commands::Delete { id } => job::delete(config, &id).await,
        Commands::List(args) => gallery::handle_list(args, config).await,
        Commands::Stats { json } => service::show_stats(config, json).await,
        Commands::Health => service::check_health(config).await,
    }
}

/// Colorize job status for display
fn colorize_status(status: JobStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        JobStatus::Queued => label.yellow(),
        JobStatus::Uploading | JobStatus::Processing => label.cyan(),
        JobStatus::Completed => label.green(),
        JobStatus::Failed => label.red(),
    }
}
