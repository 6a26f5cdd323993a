//! bucketkv Server Binary
//!
//! Starts the HTTP front end for bucketkv.

use bucketkv::{server, Config, HashFunction};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// bucketkv Server
#[derive(Parser, Debug)]
#[command(name = "bucketkv-server")]
#[command(about = "HTTP front end for bucketed on-disk key-value storages")]
#[command(version)]
struct Args {
    /// Directory holding the storages
    #[arg(short, long, default_value = "./bucketkv_data")]
    root: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Initial bucket count of new storages
    #[arg(short, long, default_value = "4")]
    capacity: u32,

    /// Hash function of new storages (crc32, identity); structural hash if unset
    #[arg(long)]
    hash: Option<HashFunction>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bucketkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("bucketkv Server v{}", bucketkv::VERSION);
    tracing::info!("Storage root: {}", args.root);

    if let Err(e) = std::fs::create_dir_all(&args.root) {
        tracing::error!("Failed to create storage root {}: {}", args.root, e);
        std::process::exit(1);
    }

    // Build config from args
    let config = Config::builder()
        .storage_root(&args.root)
        .listen_addr(&args.listen)
        .default_capacity(args.capacity)
        .hash_fn(args.hash)
        .build();

    if let Err(e) = server::serve(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
