use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use runway::report::{render_monte_carlo_summary, render_yearly_summary, write_json};
use runway::{example_config, init_logging, storage};
use runway_core::SimConfig;
use runway_core::simulation::{run_monte_carlo, simulate};

#[derive(Parser, Debug)]
#[command(name = "runway")]
#[command(about = "Monte Carlo runway simulator for a household portfolio")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Write logs to runway.log in the data directory instead of stderr
    #[arg(long, global = true)]
    log_file: bool,

    /// Data directory for the log file (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an example plan
    Init {
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Check a plan for configuration errors
    Validate { path: PathBuf },
    /// Run one trial and print a yearly summary
    Simulate {
        path: PathBuf,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Write the full monthly table as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a Monte Carlo batch and print the percentile envelope
    MonteCarlo {
        path: PathBuf,
        #[arg(short, long, default_value_t = 1_000)]
        n: usize,
        /// Seed for a reproducible batch (OS entropy when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Write the aggregated result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("runway")
}

/// Load and validate a plan, logging the legal-but-suspicious parts.
fn load_plan(path: &Path) -> color_eyre::Result<SimConfig> {
    let config = storage::load_config(path)?;
    config
        .validate()
        .wrap_err_with(|| format!("Invalid plan {}", path.display()))?;

    for (bucket, standby) in config.unresolved_standby_links() {
        tracing::warn!(
            bucket,
            standby,
            "standby bucket not found; skimmed proceeds will be dropped"
        );
    }
    for code in config.unpriced_currencies() {
        tracing::warn!(currency = code, "no FX settings; converting at 1.0");
    }
    tracing::debug!(
        years = config.period_years,
        buckets = config.buckets.len(),
        "plan loaded"
    );
    Ok(config)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args
        .log_file
        .then(|| args.data_dir.clone().unwrap_or_else(default_data_dir));
    init_logging(data_dir.as_deref(), &args.log_level)?;

    match args.command {
        Command::Init { path, force } => {
            if path.exists() && !force {
                return Err(eyre!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ));
            }
            storage::save_config(&path, &example_config())?;
            println!("wrote example plan to {}", path.display());
        }
        Command::Validate { path } => {
            let config = load_plan(&path)?;
            println!(
                "{} is valid: {} buckets over {} years",
                path.display(),
                config.buckets.len(),
                config.period_years
            );
        }
        Command::Simulate { path, seed, output } => {
            let config = load_plan(&path)?;
            let table = simulate(&config, seed);
            print!("{}", render_yearly_summary(&table));
            if let Some(output) = output {
                write_json(&output, &table)?;
            }
        }
        Command::MonteCarlo {
            path,
            n,
            seed,
            output,
        } => {
            let config = load_plan(&path)?;
            let last_percent = AtomicUsize::new(0);
            let progress = |done: usize, total: usize| {
                let percent = done * 100 / total.max(1);
                if percent > last_percent.fetch_max(percent, Ordering::Relaxed) {
                    eprint!("\rsimulating... {percent:>3}%");
                    let _ = std::io::stderr().flush();
                }
            };

            let result = run_monte_carlo(&config, n, seed, Some(&progress))?;
            eprintln!();
            tracing::info!(
                n_simulations = result.n_simulations,
                success_rate = result.success_rate,
                "batch finished"
            );
            print!("{}", render_monte_carlo_summary(&result));
            if let Some(output) = output {
                write_json(&output, &result)?;
            }
        }
    }

    Ok(())
}
