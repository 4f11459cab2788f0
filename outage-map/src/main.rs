//! Point d'entrée CLI pour outage-map

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::Commands;

/// Déterminer les barangays et feeders touchés par une zone d'interruption
#[derive(Parser)]
#[command(name = "outage-map")]
#[command(author, version)]
#[command(about = "Find the barangays and feeders affected by a drawn power-interruption area")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Match {
            regions,
            coverage,
            drawn,
            catalog,
            config,
            strategy,
            output,
            geojson,
            report,
        } => {
            info!(drawn = %drawn.display(), config = %config, "Match drawn area");
            cli::cmd_match(
                &regions,
                &coverage,
                &drawn,
                catalog.as_deref(),
                &config,
                strategy,
                output.as_deref(),
                geojson.as_deref(),
                report.as_deref(),
            )?;
        }
        Commands::Batch {
            regions,
            coverage,
            drawn,
            catalog,
            config,
            strategy,
            output,
            jobs,
            report,
        } => {
            info!(pattern = %drawn, output = %output.display(), "Batch match");
            cli::cmd_batch(
                &regions,
                &coverage,
                &drawn,
                catalog.as_deref(),
                &config,
                strategy,
                &output,
                jobs,
                report.as_deref(),
            )?;
        }
        Commands::Catalog {
            regions,
            config,
            output,
        } => {
            info!(regions = %regions.display(), output = %output.display(), "Extract barangay catalog");
            cli::cmd_catalog(&regions, &config, &output)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
