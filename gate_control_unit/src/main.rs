//! # Gate Control Unit
//!
//! Tick-driven controller for a motorized gate.
//!
//! Loads the control unit TOML, builds the simulation driver (optionally
//! replaying an operator script), performs RT setup, and runs the cycle
//! loop until Ctrl-C or the requested number of ticks.

use clap::Parser;
use gate_common::config::LogLevel;
use gate_common::consts::DEFAULT_CONFIG_PATH;
use gate_control_unit::config::{ControlUnitConfig, load_config};
use gate_control_unit::controller::GateController;
use gate_control_unit::cycle::{CycleRunner, rt_setup};
use gate_hal::OperatorScript;
use gate_hal::drivers::simulation::create_driver;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Gate Control Unit: gate access controller
#[derive(Parser, Debug)]
#[command(name = "gate_control_unit")]
#[command(version)]
#[command(about = "Tick-driven motorized gate controller")]
struct Args {
    /// Path to the control unit configuration TOML.
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Operator script replayed by the simulation driver.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Stop after this many ticks (default: run until Ctrl-C).
    #[arg(long)]
    ticks: Option<u64>,

    /// CPU core to pin the cycle thread to (default: 1).
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority (default: 80).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let config = load_config(&args.config);
    let level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    info!("Gate Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = match config {
        Ok(config) => run(&args, config),
        Err(e) => Err(Box::new(e) as Box<dyn std::error::Error>),
    };
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Gate Control Unit shutdown complete");
}

fn run(args: &Args, config: ControlUnitConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        service = %config.shared.service_name,
        tick_ms = config.gate.tick_period_ms,
        run_timeout_ticks = config.gate.run_timeout_ticks,
        open_dwell_ticks = config.gate.open_dwell_ticks,
        "Config OK from {}",
        args.config.display()
    );

    let script = match &args.script {
        Some(path) => {
            let script = OperatorScript::from_file(path)?;
            info!(
                last_tick = script.last_tick(),
                "Loaded operator script {} ({} steps)",
                path.display(),
                script.steps().len()
            );
            script
        }
        None => OperatorScript::default(),
    };

    rt_setup(args.cpu_core, args.rt_priority)?;
    info!(
        "RT setup complete (cpu_core={}, priority={})",
        args.cpu_core, args.rt_priority
    );

    let driver = create_driver(&config.simulation, script)?;
    let controller = GateController::new(config.gate);
    let mut runner = CycleRunner::new(controller, driver);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    runner.run(&running, args.ticks)?;

    let diag = runner.controller().diagnostics();
    info!(
        state = %runner.controller().state(),
        ticks = diag.ticks,
        transitions = diag.transitions,
        timeouts = diag.timeouts,
        sensor_conflicts = diag.sensor_conflicts,
        emergencies = diag.emergencies,
        "final controller status"
    );
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
///
/// `RUST_LOG` wins when set; `--verbose` forces DEBUG otherwise.
fn setup_tracing(args: &Args, level: LogLevel) {
    let level = if args.verbose { LogLevel::Debug } else { level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
