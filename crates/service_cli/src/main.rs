//! implied-vol - Heston FFT implied volatility from the command line
//!
//! # Commands
//!
//! - `implied-vol iv <price> <S> <K> <T> <r> <q>` - implied volatility of a market price
//! - `implied-vol price <S> <K> <T> <r> <q> [--put]` - Heston FFT option price
//! - `implied-vol check` - print the effective grid configuration
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate only parses arguments,
//! layers configuration and installs the diagnostics sink; all numerical
//! work happens in the pricer crates.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use pricer_models::instruments::OptionType;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::price::HestonArgs;
use commands::ContractArgs;
use config::GridOverrides;

/// Heston FFT implied volatility
#[derive(Parser)]
#[command(name = "implied-vol")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase diagnostics (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable grid adaptation for challenging contracts
    #[arg(long, global = true)]
    no_adapt: bool,

    #[command(flatten)]
    grid: GridOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Implied volatility of a European call market price
    #[command(alias = "implied-vol")]
    Iv {
        /// Observed market price of the call
        market_price: f64,

        #[command(flatten)]
        contract: ContractArgs,
    },

    /// Price a European option under Heston parameters
    Price {
        #[command(flatten)]
        contract: ContractArgs,

        #[command(flatten)]
        heston: HestonArgs,

        /// Price a put (via put-call parity) instead of a call
        #[arg(long)]
        put: bool,
    },

    /// Print the effective grid and session configuration
    Check,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::build_config(cli.config.as_deref(), &cli.grid, cli.no_adapt)
        .context("invalid configuration")?;
    debug!(?config, "effective configuration");

    match cli.command {
        Commands::Iv {
            market_price,
            contract,
        } => commands::implied_vol::run(market_price, &contract, &config)
            .context("implied volatility failed")?,
        Commands::Price {
            contract,
            heston,
            put,
        } => {
            let option_type = if put { OptionType::Put } else { OptionType::Call };
            commands::price::run(&contract, &heston, option_type, &config)
                .context("pricing failed")?
        }
        Commands::Check => commands::check::run(&config)?,
    }
    Ok(())
}
