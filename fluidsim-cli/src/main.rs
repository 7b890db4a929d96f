mod view_app;

use clap::{Parser, Subcommand};
use fluidsim_core::diagnostics::format_config_error;
use fluidsim_core::{SimConfig, Simulation};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fluidsim")]
#[command(about = "fluidsim - 2-D SPH particle fluid simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation headless and print statistics
    Run {
        /// JSON simulation config; defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of fixed ticks to run
        #[arg(short, long, default_value_t = 600)]
        steps: u64,
        /// Tick length in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
        /// Print statistics every N ticks
        #[arg(long, default_value_t = 60)]
        report_every: u64,
    },
    /// Open the interactive viewer
    View {
        /// JSON simulation config, reloaded whenever the file changes
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as JSON
    DumpConfig,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            steps,
            dt,
            report_every,
        } => run_headless(config.as_deref(), steps, dt, report_every),
        Commands::View { config } => view_app::run(config),
        Commands::DumpConfig => dump_config(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Read a config file, or fall back to the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let source = fs::read_to_string(path)?;
    let config: SimConfig = serde_json::from_str(&source)
        .map_err(|e| format_config_error(&e, Some(&path.display().to_string())))?;
    config
        .validate()
        .map_err(|e| format_config_error(&e, Some(&path.display().to_string())))?;
    Ok(config)
}

fn run_headless(
    config_path: Option<&Path>,
    steps: u64,
    dt: f32,
    report_every: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let mut sim = Simulation::new(config)?;
    let report_every = report_every.max(1);

    let mut total_hits = 0usize;
    for step in 1..=steps {
        total_hits += sim.step(dt).boundary_hits;
        if step % report_every == 0 || step == steps {
            println!("step={} {}", step, sim.stats());
        }
    }

    info!(steps, boundary_hits = total_hits, "run complete");
    Ok(())
}

fn dump_config() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&SimConfig::default())?);
    Ok(())
}
