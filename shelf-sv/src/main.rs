//! shelf-sv - ISBN lookup server
//!
//! Serves the book record API over a SQLite-backed cache, querying external
//! bibliographic sources on cache miss.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use shelf_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use shelf_common::db::{init_database, SqliteStore};
use shelf_sv::services::MetadataResolver;
use shelf_sv::{build_router, AppState};

const DEFAULT_PORT: u16 = 5780;

#[derive(Parser)]
#[clap(name = "shelf-sv")]
#[clap(about = "ISBN lookup server with a local record cache")]
struct Args {
    /// Root folder holding the database (overrides env and config file)
    #[clap(long, value_name = "DIR")]
    root_folder: Option<PathBuf>,

    /// Listen port (overrides config file)
    #[clap(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Shelf lookup server (shelf-sv) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = TomlConfig::load();

    let resolver = RootFolderResolver::with_config("lookup-server", config.clone());
    let root_folder = resolver.resolve_with_cli(args.root_folder.as_deref());

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let metadata = MetadataResolver::new()?;
    let state = AppState::new(SqliteStore::new(pool), Arc::new(metadata));
    let app = build_router(state);

    let host = config
        .listen_host
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = args.port.or(config.listen_port).unwrap_or(DEFAULT_PORT);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("shelf-sv listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
