//! attestgen CLI - generate synthetic attestation batches.

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use attestgen::{logging, GenerateCounts, Generator, GeneratorConfig};

#[derive(Parser)]
#[command(name = "attestgen")]
#[command(version, about = "Generate synthetic signed attestations for the indexer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a batch of attestations
    #[command(alias = "g")]
    Generate {
        /// Wallets count
        wallets: usize,
        /// Snaps count
        snaps: usize,
        /// Peer-to-peer attestations count
        p2p_attestations: usize,
        /// Snap attestations count
        snap_attestations: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_exit_code(&e));
        }
    };

    if let Err(e) = run(cli).await {
        tracing::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Help and version exit cleanly; any other argument error exits 1.
fn parse_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = GeneratorConfig::from_env().context("invalid configuration")?;
    logging::init(config.log_level);

    match cli.command {
        Commands::Generate {
            wallets,
            snaps,
            p2p_attestations,
            snap_attestations,
        } => {
            let counts = GenerateCounts {
                wallets,
                snaps,
                p2p_attestations,
                snap_attestations,
            };
            let path = Generator::new(&config)
                .run(counts)
                .await
                .context("generation failed")?;
            tracing::debug!(path = %path.display(), "done");
        }
    }

    Ok(())
}
