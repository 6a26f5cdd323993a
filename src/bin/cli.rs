//! bucketkv CLI
//!
//! Command-line access to storages on the local filesystem, without the
//! HTTP server.

use std::path::PathBuf;
use std::process::ExitCode;

use bucketkv::{Engine, HashFunction, Key, KeyType, KvError, Metadata, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// bucketkv CLI
#[derive(Parser, Debug)]
#[command(name = "bucketkv-cli")]
#[command(about = "CLI for bucketkv storages")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new storage
    Create {
        /// Storage directory
        path: PathBuf,

        /// Key type (integer, long, string, bytes)
        key_type: KeyType,

        /// Initial bucket count
        #[arg(short, long, default_value = "4")]
        capacity: u32,

        /// Hash function (crc32, identity); structural hash if unset
        #[arg(long)]
        hash: Option<HashFunction>,
    },

    /// Set a key-value pair
    Put {
        /// Storage directory
        path: PathBuf,

        /// The key, parsed as the storage's key type
        key: String,

        /// The value to store
        value: String,
    },

    /// Get a value by key
    Get {
        /// Storage directory
        path: PathBuf,

        /// The key, parsed as the storage's key type
        key: String,
    },

    /// Show storage metadata and bucket files
    Info {
        /// Storage directory
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(KvError::KeyNotFound) => {
            eprintln!("(nil)");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Create {
            path,
            key_type,
            capacity,
            hash,
        } => {
            let metadata = Metadata::builder(key_type)
                .capacity(capacity)
                .hash_fn(hash)
                .build()?;
            Engine::create_with(&path, metadata)?.close()?;
            println!("OK");
        }
        Commands::Put { path, key, value } => {
            let engine = Engine::open(&path)?;
            let key = Key::parse(&key, engine.key_type())?;
            engine.put(&key, value.into_bytes())?;
            engine.close()?;
            println!("OK");
        }
        Commands::Get { path, key } => {
            let engine = Engine::open(&path)?;
            let key = Key::parse(&key, engine.key_type())?;
            let value = engine.get(&key)?;
            engine.close()?;
            let value = value.ok_or(KvError::KeyNotFound)?;
            println!("{}", String::from_utf8_lossy(&value));
        }
        Commands::Info { path } => {
            let engine = Engine::open(&path)?;
            let metadata = engine.metadata();
            let buckets = engine.buckets().bucket_files()?;
            engine.close()?;

            println!("key type:  {}", metadata.key_type());
            println!("hash:      {}", metadata.hash_fn().map_or("structural", |f| f.name()));
            println!("capacity:  {}", metadata.capacity());
            println!("size:      {}", metadata.size());
            println!("buckets:   {:?}", buckets);
        }
    }
    Ok(())
}
