//! gaugebench - verifiable benchmark runs
//!
//! Produces run directories sealed with content-addressable receipts and
//! verifies them offline.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gaugebench::Engine;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

/// gaugebench - verifiable benchmark runs
#[derive(Parser, Debug)]
#[command(name = "gaugebench")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a benchmark run
    #[command(subcommand)]
    Run(RunCommands),

    /// Seal an existing folder of third-party results
    Wrap {
        /// Folder to wrap
        #[arg(long = "in")]
        input: PathBuf,

        /// Output run directory
        #[arg(long)]
        out: PathBuf,

        /// Engine label recorded in the manifest
        #[arg(long)]
        engine: String,

        /// Backend label recorded in the manifest
        #[arg(long)]
        backend: String,

        /// Sign the receipt with this key file
        #[arg(long)]
        key: Option<PathBuf>,
    },

    /// Verify a run directory
    Verify {
        /// Directory containing receipt.json
        dir: PathBuf,

        /// Treat an unsigned receipt as tampered
        #[arg(long)]
        require_signature: bool,
    },

    /// Generate a signing key file
    Keygen {
        /// Where to write the key (never overwritten)
        #[arg(long)]
        key: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum RunCommands {
    /// Gate-based (QIC) benchmark
    Qic {
        /// Backend name (e.g. ibm_brisbane)
        #[arg(long)]
        backend: String,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Number of shots
        #[arg(long, default_value_t = Engine::DEFAULT_SHOTS)]
        shots: u32,

        /// Sign the receipt with this key file
        #[arg(long)]
        key: Option<PathBuf>,
    },

    /// Annealing (Hierarchy) benchmark
    Hierarchy {
        /// Sampler name (e.g. dwave_advantage)
        #[arg(long)]
        sampler: String,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// System size N
        #[arg(long = "N", default_value_t = Engine::DEFAULT_N)]
        n: u32,

        /// Hierarchy depth K
        #[arg(long = "K", default_value_t = Engine::DEFAULT_K)]
        k: u32,

        /// Sign the receipt with this key file
        #[arg(long)]
        key: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Run(RunCommands::Qic {
            backend,
            out,
            shots,
            key,
        }) => commands::run(&out, &Engine::qic(backend, shots), key.as_deref()),
        Commands::Run(RunCommands::Hierarchy {
            sampler,
            out,
            n,
            k,
            key,
        }) => commands::run(&out, &Engine::hierarchy(sampler, n, k), key.as_deref()),
        Commands::Wrap {
            input,
            out,
            engine,
            backend,
            key,
        } => commands::wrap(input, out, engine, backend, key.as_deref()),
        Commands::Verify {
            dir,
            require_signature,
        } => {
            // Verification outcomes map to fixed exit codes:
            // 0=verified, 1=tampered, 2=error, 3=unverifiable
            let code = commands::verify(&dir, require_signature);
            std::process::exit(code);
        },
        Commands::Keygen { key } => commands::keygen(&key),
    }
}
