//! cachelink CLI Client
//!
//! Command-line interface for a cache server, one command per invocation.

use std::process::ExitCode;
use std::time::Duration;

use cachelink::{ClientConfig, Session};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// cachelink CLI
#[derive(Parser, Debug)]
#[command(name = "cachelink-cli")]
#[command(about = "CLI for a remote key-value cache server")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8448")]
    port: u16,

    /// Password, sent only if the server requires authentication
    #[arg(long, default_value = "")]
    password: String,

    /// Cipher key for the password (16, 24 or 32 bytes)
    #[arg(long, default_value = "")]
    key: String,

    /// Socket read/write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        key: String,

        /// Largest value to read, in bytes
        #[arg(long, default_value = "4096")]
        max_size: usize,
    },

    /// Set a key-value pair
    Set {
        key: String,
        value: String,

        /// Expire after this many milliseconds
        #[arg(long)]
        ttl_ms: Option<u64>,

        /// Fail if the key already exists
        #[arg(long, conflicts_with = "ttl_ms")]
        nx: bool,
    },

    /// Delete a key
    Del {
        key: String,

        /// Reclaim in the background on the server
        #[arg(long)]
        unlink: bool,
    },

    /// Increment a numeric value
    Incr {
        key: String,

        #[arg(long, default_value = "1", allow_hyphen_values = true)]
        by: i64,
    },

    /// Remaining time-to-live of a key
    Ttl { key: String },

    /// List keys matching a pattern
    Keys {
        pattern: String,

        #[arg(long, default_value = "65536")]
        max_size: usize,
    },

    /// Number of stored items
    Count,

    /// Remove every entry
    Clear,

    /// Persist the store to a server-side file
    Save { filename: String },

    /// Restore the store from a server-side file
    Load { filename: String },

    /// Ask the server to exit
    Shutdown,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = ClientConfig::builder()
        .host(&args.host)
        .port(args.port)
        .password(&args.password)
        .cipher_key(&args.key)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    let session = match Session::connect_with(&config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", config.addr(), e);
            return ExitCode::FAILURE;
        }
    };

    let shutdown = matches!(args.command, Commands::Shutdown);
    let result = run(&session, args.command);

    if !shutdown {
        if let Err(e) = session.close() {
            tracing::debug!("Error closing session: {}", e);
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(session: &Session, command: Commands) -> cachelink::Result<()> {
    match command {
        Commands::Get { key, max_size } => println!("{}", session.get(&key, max_size)?),
        Commands::Set { key, value, ttl_ms: Some(ms), .. } => {
            session.set_ex(&key, &value, Duration::from_millis(ms))?
        }
        Commands::Set { key, value, nx: true, .. } => session.set_nx(&key, &value)?,
        Commands::Set { key, value, .. } => session.set(&key, &value)?,
        Commands::Del { key, unlink: true } => session.unlink(&key)?,
        Commands::Del { key, .. } => session.del(&key)?,
        Commands::Incr { key, by: 1 } => session.incr(&key)?,
        Commands::Incr { key, by } => session.incr_by(&key, by)?,
        Commands::Ttl { key } => println!("{:?}", session.ttl(&key)?),
        Commands::Keys { pattern, max_size } => {
            for key in session.keys(&pattern, max_size)? {
                println!("{}", key);
            }
        }
        Commands::Count => println!("{}", session.count()?),
        Commands::Clear => session.clear()?,
        Commands::Save { filename } => session.save(&filename)?,
        Commands::Load { filename } => session.load(&filename)?,
        Commands::Shutdown => session.shutdown()?,
    }
    Ok(())
}
