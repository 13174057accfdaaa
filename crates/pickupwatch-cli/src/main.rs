mod check;
mod run;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pickupwatch")]
#[command(about = "Retail pickup-availability monitor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Poll the pickup endpoint until interrupted (default).
    Run,
    /// Fetch once, print every store's status, and exit.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = pickupwatch_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "loaded configuration");

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Check) => check::execute(&config).await,
        Some(Commands::Run) | None => run::execute(&config).await,
    }
}
