use std::path::PathBuf;

use clap::{Parser, Subcommand};

use arbiter_core::{ArbiterConfig, LogFormat, LoggingConfig};

mod commands;
mod report;

#[derive(Parser)]
#[command(
    name = "arbiter",
    about = "Arbiter — fair-share resource allocation for batch queues",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to arbiter.toml (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scheduling cycle against a cluster snapshot.
    ///
    /// The snapshot lists nodes (with capacity) and queues (with weights)
    /// as JSON, or TOML when the file ends in `.toml`.
    Allocate {
        /// Snapshot file
        #[arg(short, long)]
        snapshot: PathBuf,
        /// Policy to run (overrides [scheduler].policy)
        #[arg(short, long)]
        policy: Option<String>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// List registered allocation policies
    Policies,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ArbiterConfig::from_file(path)?,
        None => ArbiterConfig::default(),
    };
    init_tracing(&config.logging)?;

    match cli.command {
        Commands::Allocate {
            snapshot,
            policy,
            format,
        } => {
            let policy = policy.unwrap_or(config.scheduler.policy);
            commands::allocate::allocate(&snapshot, &policy, &format)
        }
        Commands::Policies => commands::policies::list(&config.scheduler.policy),
    }
}

/// Install the global subscriber; `RUST_LOG` wins over the config filter.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&logging.filter))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
    Ok(())
}
