//! CacheDB CLI
//!
//! Command-line interface for a local CacheDB directory.

use std::process;

use cachedb::{Config, Engine, SyncStrategy};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// CacheDB CLI
#[derive(Parser, Debug)]
#[command(name = "cachedb-cli")]
#[command(about = "CLI for the CacheDB document store")]
#[command(version)]
struct Args {
    /// Database root directory
    #[arg(short, long, default_value = "./cachedb_data")]
    root: String,

    /// fsync every write before and after the rename
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a JSON record
    Write {
        collection: String,
        resource: String,

        /// Record body, as JSON
        json: String,
    },

    /// Print a record
    Read { collection: String, resource: String },

    /// Print every record in a collection
    ReadAll { collection: String },

    /// Delete a record, or the whole collection if no resource is given
    Delete {
        collection: String,
        resource: Option<String>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    println!("{} v{}", cachedb::NAME, cachedb::VERSION);

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> cachedb::Result<()> {
    let sync_strategy = if args.sync {
        SyncStrategy::EveryWrite
    } else {
        SyncStrategy::None
    };

    let config = Config::builder()
        .root_dir(&args.root)
        .sync_strategy(sync_strategy)
        .build();
    let engine = Engine::open(config)?;

    match args.command {
        Commands::Write {
            collection,
            resource,
            json,
        } => {
            let value: serde_json::Value =
                serde_json::from_str(&json).map_err(cachedb::CacheDbError::Decode)?;
            engine.write(&collection, &resource, &value)?;
        }
        Commands::Read {
            collection,
            resource,
        } => {
            let bytes = engine.read_raw(&collection, &resource)?;
            print!("{}", String::from_utf8_lossy(&bytes));
        }
        Commands::ReadAll { collection } => {
            for bytes in engine.read_all(&collection)? {
                print!("{}", String::from_utf8_lossy(&bytes));
            }
        }
        Commands::Delete {
            collection,
            resource,
        } => {
            engine.delete(&collection, resource.as_deref().unwrap_or(""))?;
        }
    }

    Ok(())
}
