//! TileVault CLI - thin command-line wrapper over the tilevault library.
//!
//! All tile logic lives in the library; this binary only parses
//! arguments, opens the shared store, and prints results.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tilevault::store::TileStore;

use crate::commands::{coverage, resolve, store};
use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "tilevault", version, about = "Offline raster tile cache")]
struct Cli {
    /// Path to the tile store database (defaults to the platform data dir)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the total number of stored tiles
    Count,
    /// List stored tiles for a URL template, one JSON object per line
    List {
        /// URL template to enumerate
        template: String,
    },
    /// Print (or write) the blob stored under a cache key
    Get {
        /// Tile cache key
        key: String,
        /// Write the blob to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove one tile by cache key
    Remove {
        /// Tile cache key
        key: String,
    },
    /// Delete every stored tile
    Clear,
    /// Emit GeoJSON coverage polygons for a template's cached tiles
    Coverage(coverage::CoverageArgs),
    /// Resolve the tiles covering a pixel rectangle (no store access)
    Resolve(resolve::ResolveArgs),
}

fn default_store_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("tilevault").join("tiles.db"))
        .ok_or_else(|| CliError::Config("no platform data directory; pass --store".to_string()))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let command = match cli.command {
        // Resolve never opens the store.
        Command::Resolve(args) => return resolve::run(args),
        command => command,
    };

    let path = match cli.store {
        Some(path) => path,
        None => default_store_path()?,
    };
    let store_handle = TileStore::shared(&path).await?;

    match command {
        Command::Count => store::count(store_handle).await,
        Command::List { template } => store::list(store_handle, &template).await,
        Command::Get { key, output } => store::get(store_handle, &key, output).await,
        Command::Remove { key } => store::remove(store_handle, &key).await,
        Command::Clear => store::clear(store_handle).await,
        Command::Coverage(args) => coverage::run(store_handle, args).await,
        Command::Resolve(_) => unreachable!("handled above"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = tilevault::logging::init_logging() {
        eprintln!("failed to initialize logging: {e}");
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
