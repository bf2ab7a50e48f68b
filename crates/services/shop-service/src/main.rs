//! Shop Service - HTTP API for users and products.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shop_service_lib::config::ShopServiceConfig;

#[derive(Parser)]
#[command(name = "shop-service")]
#[command(about = "User and product CRUD service with a Redis cache")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Overrides SHOP_SERVICE_HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides SHOP_SERVICE_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create missing tables, then exit
    InitSchema,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ShopServiceConfig::from_env();

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.service.host.clone());
            let port = port.unwrap_or(config.service.port);
            shop_service_lib::run_server(&host, port, config).await?;
        }
        Commands::InitSchema => {
            shop_service_lib::init_schema(config).await?;
        }
    }

    Ok(())
}
