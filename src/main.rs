//! Osviz - simulated operating-system metrics with an OS theory tutor
//!
//! A terminal dashboard that animates plausible CPU, memory, disk, network
//! and process activity, raises threshold alerts, and answers questions
//! about the live numbers or about operating-system concepts.

mod chat;
mod config;
mod core;
mod responder;
mod simulator;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::core::app::App;
use crate::responder::QueryResponder;
use crate::simulator::MetricsSimulator;

#[derive(Parser)]
#[command(name = "osviz")]
#[command(author = "Osviz Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Simulated OS metrics and an OS theory tutor for your terminal", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed the simulator for a reproducible run
    #[arg(long, env = "OSVIZ_SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulator headless and print the resulting snapshot
    Snapshot {
        /// Number of ticks to run before printing
        #[arg(short, long, default_value = "1")]
        ticks: u32,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Ask the tutor a question against a simulated snapshot
    Ask {
        /// The question, e.g. "what is my cpu usage"
        query: Vec<String>,

        /// Number of ticks to run before answering
        #[arg(short, long, default_value = "1")]
        ticks: u32,

        /// Answer immediately instead of pausing to "think"
        #[arg(long)]
        no_delay: bool,
    },

    /// Write a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

fn setup_logging(verbosity: u8) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // The dashboard owns the terminal, so logs always go to a file
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("osviz")
        .join("logs");

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "osviz.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}

/// Resolve the config: explicit path, then the default location, then defaults.
fn load_config(path: Option<PathBuf>, seed: Option<u64>) -> Result<Config> {
    let config_path = path.or_else(|| Config::default_path().filter(|p| p.exists()));

    let mut config = match &config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if seed.is_some() {
        config.simulator.seed = seed;
    }
    config.validate()?;

    tracing::info!(
        path = ?config_path,
        seed = ?config.simulator.seed,
        "configuration loaded"
    );
    Ok(config)
}

fn run_headless(config: &Config, ticks: u32) -> Result<MetricsSimulator> {
    let mut simulator = MetricsSimulator::new(config)?;
    for _ in 0..ticks {
        simulator.tick();
    }
    Ok(simulator)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive for the duration of the program
    let _logging_guard = setup_logging(cli.verbose)?;

    match cli.command {
        Some(Commands::Init { force }) => {
            let path = match cli.config {
                Some(path) => path,
                None => Config::default_path()
                    .context("no configuration directory on this system")?,
            };
            config::init_config(&path, force)?;
        }
        Some(Commands::Snapshot { ticks, json }) => {
            let config = load_config(cli.config, cli.seed)?;
            let simulator = run_headless(&config, ticks)?;
            simulator::report::print_report(&simulator, json)?;
        }
        Some(Commands::Ask {
            query,
            ticks,
            no_delay,
        }) => {
            let config = load_config(cli.config, cli.seed)?;
            let query = query.join(" ");
            let simulator = run_headless(&config, ticks)?;

            if !no_delay {
                let delay = chat::typing_delay(&config.chat, &mut rand::thread_rng());
                tokio::time::sleep(delay).await;
            }
            println!("{}", QueryResponder::respond(&query, simulator.snapshot()));
        }
        None => {
            let config = load_config(cli.config, cli.seed)?;
            let mut app = App::new(config)?;
            app.run().await?;
        }
    }

    Ok(())
}
