use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exoplanet_explorer::{api, catalog::Catalog, config::ExplorerConfig, source::DatasetLoader};

#[derive(Parser)]
#[command(name = "exo")]
#[command(about = "Filter queries over confirmed exoplanet discoveries")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog and start the HTTP API
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Local snapshot used when the archive is unavailable
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Never query the remote archive
        #[arg(long)]
        offline: bool,

        /// Reload the catalog every N seconds
        #[arg(long)]
        refresh_secs: Option<u64>,
    },
    /// Load the catalog once, print a summary and exit
    Check {
        /// Local snapshot used when the archive is unavailable
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Never query the remote archive
        #[arg(long)]
        offline: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "exoplanet_explorer=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config: ExplorerConfig, host: &str, port: u16) -> anyhow::Result<()> {
    let catalog = Catalog::default();
    let loader = Arc::new(DatasetLoader::new(&config, catalog.clone()));

    // Nothing is served until a dataset exists.
    loader.load().await?;

    if let Some(every) = config.refresh_interval {
        tracing::info!("Reloading the catalog every {}s", every.as_secs());
        Arc::clone(&loader).spawn_refresh(every);
    }

    let app = api::create_router_with_origins(catalog, config.cors_origins.as_deref());

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Exoplanet explorer listening on http://{}:{}", host, port);
    tracing::info!("Try: http://{}:{}/api/health", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ExplorerConfig::from_env();

    match cli.command {
        Some(Commands::Serve {
            port,
            host,
            snapshot,
            offline,
            refresh_secs,
        }) => {
            if let Some(path) = snapshot {
                config.snapshot_path = path;
            }
            config.offline |= offline;
            if let Some(secs) = refresh_secs.filter(|&s| s > 0) {
                config.refresh_interval = Some(Duration::from_secs(secs));
            }

            serve(config, &host, port).await?;
        }
        Some(Commands::Check { snapshot, offline }) => {
            if let Some(path) = snapshot {
                config.snapshot_path = path;
            }
            config.offline |= offline;

            let loader = DatasetLoader::new(&config, Catalog::default());
            let report = loader.load().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        None => {
            serve(config, "127.0.0.1", 3001).await?;
        }
    }

    Ok(())
}
