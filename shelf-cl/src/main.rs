//! shelf-cl - Command-line book shelf
//!
//! Keeps a flat JSON shelf file under the root folder and delegates
//! cache-miss lookups to a running shelf-sv instance.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use shelf_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use shelf_common::store::ShelfFileStore;
use shelf_common::BookFields;

mod commands;
mod server_client;

use server_client::ServerClient;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5780";

#[derive(Parser)]
#[clap(name = "shelf-cl")]
#[clap(about = "Command-line book shelf with ISBN lookup")]
#[clap(version)]
struct Args {
    /// Root folder holding the shelf file (overrides env and config file)
    #[clap(long, value_name = "DIR")]
    root_folder: Option<PathBuf>,

    /// Lookup server base URL (overrides config file)
    #[clap(long, value_name = "URL")]
    server_url: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a book: local shelf first, then the lookup server
    Lookup {
        isbn: String,

        /// Only consult the local shelf
        #[clap(long)]
        offline: bool,
    },

    /// Add or update a book manually (merge-on-write)
    Add {
        isbn: String,

        #[clap(long)]
        title: Option<String>,

        /// Comma-separated author names
        #[clap(long, value_delimiter = ',')]
        authors: Option<Vec<String>>,

        #[clap(long)]
        publisher: Option<String>,

        #[clap(long, value_name = "DATE")]
        published: Option<String>,

        #[clap(long)]
        pages: Option<i64>,

        /// Comma-separated categories
        #[clap(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,

        #[clap(long)]
        language: Option<String>,

        #[clap(long)]
        description: Option<String>,

        #[clap(long, value_name = "URL")]
        cover: Option<String>,
    },

    /// Print one record
    Show { isbn: String },

    /// List the shelf
    Ls,

    /// Remove a book
    Rm { isbn: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; record output owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    debug!(
        "shelf-cl v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = TomlConfig::load();

    let resolver = RootFolderResolver::with_config("shelf-client", config.clone());
    let root_folder = resolver.resolve_with_cli(args.root_folder.as_deref());

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let store = ShelfFileStore::new(initializer.shelf_path());

    match args.command {
        Command::Lookup { isbn, offline } => {
            let server = if offline {
                None
            } else {
                let url = args
                    .server_url
                    .or(config.server_url)
                    .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
                Some(ServerClient::new(url)?)
            };
            commands::lookup(&store, server.as_ref(), &isbn).await
        }
        Command::Add {
            isbn,
            title,
            authors,
            publisher,
            published,
            pages,
            categories,
            language,
            description,
            cover,
        } => {
            let fields = BookFields {
                title,
                authors,
                publisher,
                published_date: published,
                page_count: pages,
                categories,
                language,
                description,
                cover_url: cover,
                source: None,
            };
            commands::add(&store, &isbn, fields).await
        }
        Command::Show { isbn } => commands::show(&store, &isbn).await,
        Command::Ls => commands::ls(&store).await,
        Command::Rm { isbn } => commands::rm(&store, &isbn).await,
    }
}
