//! Submit command handler
//!
//! Drives one image through the submission workflow and prints every
//! snapshot the workflow emits. Ctrl-C requests cancellation; the workflow
//! stops at its next check.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Args};
use colored::*;
use imgflow_core::domain::operation::{Operation, ResourceVariant, WatermarkPosition};
use imgflow_core::domain::upload::ImageUpload;
use imgflow_session::validation::mime_type_for_path;
use imgflow_session::{StatusSnapshot, SubmissionWorkflow, WorkflowError, WorkflowState};
use tracing::info;

use crate::config::Config;

/// Arguments of `imgflow submit`
#[derive(Args)]
pub struct SubmitArgs {
    /// Image file to upload
    pub file: PathBuf,

    /// MIME type (guessed from the file extension when omitted)
    #[arg(long)]
    pub mime: Option<String>,

    /// Create a square thumbnail of this edge length
    #[arg(long)]
    pub thumbnail: Option<u32>,

    /// Crop the thumbnail to fill the square
    #[arg(long)]
    pub crop: bool,

    /// Resize to WIDTHxHEIGHT (e.g. 800x600)
    #[arg(long, value_parser = parse_dimensions)]
    pub resize: Option<(u32, u32)>,

    /// Keep the aspect ratio when resizing
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub keep_aspect: bool,

    /// Stamp this text onto the image
    #[arg(long)]
    pub watermark: Option<String>,

    /// Watermark opacity between 0 and 1
    #[arg(long, default_value_t = 0.5)]
    pub opacity: f32,

    /// Watermark placement (e.g. bottom-right, center)
    #[arg(long, default_value = "bottom-right")]
    pub position: WatermarkPosition,

    /// Milliseconds between status checks
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Number of status checks before giving up
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

impl SubmitArgs {
    /// Operations in the order thumbnail, resize, watermark
    fn operations(&self) -> Vec<Operation> {
        let mut operations = Vec::new();
        if let Some(size) = self.thumbnail {
            operations.push(Operation::Thumbnail {
                size,
                crop_to_fit: self.crop,
            });
        }
        if let Some((width, height)) = self.resize {
            operations.push(Operation::resize(width, height, self.keep_aspect));
        }
        if let Some(text) = &self.watermark {
            operations.push(Operation::watermark(
                text.clone(),
                self.opacity,
                self.position,
            ));
        }
        operations
    }
}

/// Handle `imgflow submit`
pub async fn handle_submit(args: SubmitArgs, config: &Config) -> Result<()> {
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let filename = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} is not a file", args.file.display()))?;

    let mime_type = match &args.mime {
        Some(mime) => mime.clone(),
        None => mime_type_for_path(&args.file)
            .unwrap_or("application/octet-stream")
            .to_string(),
    };

    let mut session = config.session.clone();
    if let Some(ms) = args.interval_ms {
        session.poll_interval = Duration::from_millis(ms);
    }
    if let Some(attempts) = args.max_attempts {
        session.poll_max_attempts = attempts;
    }
    session.validate().context("Invalid polling settings")?;

    let operations = args.operations();
    let client = config.client();
    let mut workflow = SubmissionWorkflow::new(client.clone(), &session);
    workflow.subscribe(print_snapshot);

    let cancel = workflow.cancel_handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Cancellation requested");
            cancel.cancel();
        }
    });

    workflow.select(ImageUpload::new(filename, mime_type, bytes))?;
    let result = workflow.run(&operations).await;
    ctrl_c.abort();

    let job = match result {
        Ok(job) => job,
        Err(e) => {
            if let Some(hint) = failure_hint(&e, &session.api_url) {
                eprintln!("{}", hint.yellow());
            }
            return Err(e).context("Submission failed");
        }
    };

    println!();
    println!("{}", "Renditions:".bold());
    println!(
        "  {:<10} {}",
        "original",
        client.resource_url(job.id, ResourceVariant::Original).dimmed()
    );
    for operation in &job.requested_operations {
        let variant = operation.variant();
        println!(
            "  {:<10} {}",
            variant.as_str(),
            client.resource_url(job.id, variant).dimmed()
        );
    }

    Ok(())
}

/// Print one workflow snapshot as a progress line
fn print_snapshot(snapshot: &StatusSnapshot) {
    let line = format!("[{:>3}%] {}", snapshot.percent, snapshot.phase);
    let line = match snapshot.state {
        WorkflowState::Completed => line.green(),
        WorkflowState::Failed => line.red(),
        WorkflowState::AwaitingCompletion => line.cyan(),
        _ => line.normal(),
    };
    let line = if snapshot.state.is_finished() {
        line.bold()
    } else {
        line
    };

    match (snapshot.state, snapshot.job_id) {
        (WorkflowState::AwaitingCompletion, Some(id)) if snapshot.total_operations > 0 => {
            println!(
                "{} {}",
                line,
                format!(
                    "({}/{} operations, job {})",
                    snapshot.processed_operations, snapshot.total_operations, id
                )
                .dimmed()
            )
        }
        _ => println!("{}", line),
    }
}

/// Follow-up advice for a failed submission
fn failure_hint(err: &WorkflowError, api_url: &str) -> Option<String> {
    let envelope = err.envelope()?;
    if envelope.is_network() {
        Some(format!("Is the service reachable at {}?", api_url))
    } else if envelope.is_validation() {
        Some("Nothing was uploaded; fix the input and try again.".to_string())
    } else {
        None
    }
}

fn parse_dimensions(input: &str) -> Result<(u32, u32), String> {
    let (width, height) = input
        .to_ascii_lowercase()
        .split_once('x')
        .map(|(w, h)| (w.trim().to_string(), h.trim().to_string()))
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", input))?;

    let width = width
        .parse::<u32>()
        .map_err(|e| format!("invalid width '{}': {}", width, e))?;
    let height = height
        .parse::<u32>()
        .map_err(|e| format!("invalid height '{}': {}", height, e))?;

    Ok((width, height))
}
