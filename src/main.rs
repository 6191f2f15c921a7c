use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use simpledash::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simpledash=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            addr,
            port,
            resources,
        } => cli::commands::serve(&cli.config, &addr, port, &resources).await,
        Commands::Init => cli::commands::init(&cli.config).await,
        Commands::HashPassword { password } => cli::commands::hash_password(&password),
        Commands::Check { resources } => cli::commands::check(&cli.config, &resources).await,
    }
}
