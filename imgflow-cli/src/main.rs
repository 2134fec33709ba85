//! imgflow CLI
//!
//! Command-line front end for the image-processing service: submit images,
//! follow their jobs, browse the collection and read service telemetry.

mod commands;
mod config;
mod id_resolver;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "imgflow")]
#[command(about = "Image processing service CLI", long_about = None)]
struct Cli {
    /// Service root URL
    #[arg(long, env = "IMGFLOW_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "imgflow=info,imgflow_session=info,imgflow_client=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.api_url)?;

    handle_command(cli.command, &config).await
}
