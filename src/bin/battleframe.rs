use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use battleframe::{AppState, AssetStore, DEFAULT_CATALOG_URL, HttpCatalog, serve};

#[derive(Parser, Debug)]
#[command(name = "battleframe", version, about = "Battle scene PNG rendering server")]
struct Cli {
    /// Address to bind the HTTP server on.
    #[arg(long, default_value = "0.0.0.0:5000")]
    bind: String,

    /// Directory of static image assets (backgrounds, frames, icons, font).
    #[arg(long, default_value = "images")]
    assets: PathBuf,

    /// Base URL of the remote sprite catalog.
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    catalog_url: String,

    /// Catalog fetch timeout in seconds; a timed-out fetch renders as an
    /// unavailable sprite.
    #[arg(long, default_value_t = 10)]
    catalog_timeout: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    // The blocking catalog client is built (and later dropped) outside the
    // async runtime; renders use it from the blocking pool.
    let catalog = HttpCatalog::new(cli.catalog_url, Duration::from_secs(cli.catalog_timeout))?;
    let state = Arc::new(AppState {
        assets: AssetStore::new(cli.assets),
        source: Box::new(catalog),
    });

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(serve(state, &cli.bind))
}
