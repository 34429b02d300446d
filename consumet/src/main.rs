mod server;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use consumet_core::{
    bootstrap::{init_services, load_config, log_summary},
    logging,
};

use server::ConsumetServer;

/// Anime content API with provider fallback and result caching
#[derive(Debug, Parser)]
#[command(name = "consumet", version, about)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "CONSUMET_CONFIG_PATH")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load and validate configuration
    let config = load_config(args.config.as_deref())?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("Consumet server starting...");
    log_summary(&config);

    // 3. Initialize services (registry, cache, content service)
    let services = init_services(&config).await?;

    // 4. Serve until a shutdown signal arrives
    ConsumetServer::new(config, services).run().await?;

    info!("Consumet server stopped");
    Ok(())
}
