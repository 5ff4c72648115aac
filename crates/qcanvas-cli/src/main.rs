//! Quantum Canvas Command-Line Interface
//!
//! ```text
//! ============================================================
//!   THE QUANTUM CANVAS
//!   Your Name → Quantum Fingerprint → Unique Universe
//! ============================================================
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{generate, seed, version};

/// Quantum Canvas - turn a name into a quantum fingerprint
#[derive(Parser)]
#[command(name = "qcanvas")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate quantum art from one or more names
    Generate {
        /// Name(s) to generate art for
        #[arg(required = true)]
        names: Vec<String>,

        /// Use IBM Quantum cloud instead of the local simulator
        #[arg(long)]
        cloud: bool,

        /// Run every name in a single backend submission
        #[arg(long)]
        batch: bool,

        /// Output path
        #[arg(short, long, default_value = qcanvas::DEFAULT_RESULT_PATH)]
        output: PathBuf,

        /// Include full metadata in the output file
        #[arg(long)]
        full_meta: bool,

        /// Number of qubits
        #[arg(long)]
        qubits: Option<u32>,

        /// Number of entanglement layers
        #[arg(long)]
        layers: Option<u32>,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// YAML configuration file
        #[arg(short, long, env = "QCANVAS_CONFIG")]
        config: Option<PathBuf>,

        /// Fix the local simulator's sampling seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the seed derived from a name
    Seed {
        /// The name
        name: String,

        /// Number of qubits
        #[arg(long)]
        qubits: Option<u32>,

        /// Number of entanglement layers
        #[arg(long)]
        layers: Option<u32>,
    },

    /// Show version information
    Version,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let json = std::env::var("QCANVAS_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            names,
            cloud,
            batch,
            output,
            full_meta,
            qubits,
            layers,
            shots,
            config,
            seed,
        } => {
            let options = generate::GenerateOptions {
                cloud,
                batch,
                output,
                full_meta,
                overrides: generate::Overrides {
                    qubits,
                    layers,
                    shots,
                },
                config,
                simulator_seed: seed,
            };
            generate::execute(&names, &options).await
        }

        Commands::Seed {
            name,
            qubits,
            layers,
        } => seed::execute(&name, qubits, layers),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
