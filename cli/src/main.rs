use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Duration;
use std::{fs, process};

use airport_simulator_core_rs::dispatch::{DispatchMode, RunwayChoice, RunwaySelector};
use airport_simulator_core_rs::models::{Flight, Runway};
use airport_simulator_core_rs::orchestrator::{
    AirportConfig, AirportObserver, Notification, Orchestrator,
};
use airport_simulator_core_rs::{ClockHandle, SimulationClock};
use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Tick-driven airport operations simulator", long_about = None)]
struct Args {
    /// Path to an airport configuration JSON file (defaults apply otherwise)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many ticks (runs until game over when omitted)
    #[arg(long)]
    ticks: Option<usize>,

    /// Real-time length of one tick at speed 1.0 (milliseconds)
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,

    /// Speed multiplier applied to the tick interval
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Override the configured RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Ask on stdin which runway each due flight should use
    #[arg(long)]
    manual: bool,

    /// Write the final snapshot JSON here instead of stdout
    #[arg(long)]
    snapshot_out: Option<PathBuf>,
}

/// Interactive runway prompt; the clock is paused while waiting for input
struct StdinSelector {
    clock: ClockHandle,
}

impl RunwaySelector for StdinSelector {
    fn choose_runway(&mut self, flight: &Flight, candidates: &[&Runway]) -> RunwayChoice {
        self.clock.pause();

        let ids: Vec<String> = candidates.iter().map(|r| r.id().to_string()).collect();
        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{} {} ({}, {} pax) is due. Available runways:",
            flight.category(),
            flight.flight_number(),
            flight.aircraft().type_code(),
            flight.passengers()
        );
        for (index, runway) in candidates.iter().enumerate() {
            let _ = writeln!(
                stderr,
                "  {}) {} {:?} {}m wear {}",
                index + 1,
                runway.id(),
                runway.tier(),
                runway.length(),
                runway.wear()
            );
        }
        let _ = write!(stderr, "runway [number/id, empty to hold]: ");
        let _ = stderr.flush();

        let mut line = String::new();
        let choice = match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => RunwayChoice::Delay,
            Ok(_) => RunwayChoice::parse(&line, &ids),
        };

        self.clock.resume();
        choice
    }
}

/// Prints notifications as they happen
struct ConsoleObserver;

impl AirportObserver for ConsoleObserver {
    fn on_notification(&mut self, notification: &Notification) {
        match notification {
            Notification::FlightLanded {
                tick,
                flight_number,
                runway_id,
                on_time,
                revenue,
                ..
            } => eprintln!(
                "[t{}] {} landed on {}{} (+{})",
                tick,
                flight_number,
                runway_id,
                if *on_time { "" } else { " late" },
                revenue
            ),
            Notification::LevelUp { tick, level } => {
                eprintln!("[t{}] level up: {}", tick, level)
            }
            Notification::AchievementUnlocked { tick, name, .. } => {
                eprintln!("[t{}] achievement unlocked: {}", tick, name)
            }
            Notification::GameOver { tick, reason, .. } => {
                eprintln!("[t{}] GAME OVER: {}", tick, reason)
            }
        }
    }
}

fn load_config(args: &Args) -> Result<AirportConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            AirportConfig::from_json(&json)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        }
        None => AirportConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    if args.manual {
        config.dispatch_mode = DispatchMode::Manual;
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut orchestrator = Orchestrator::new(config).context("Invalid airport configuration")?;

    let mut clock = SimulationClock::new(Duration::from_millis(args.interval_ms));
    clock
        .set_speed_multiplier(args.speed)
        .context("Invalid --speed")?;

    if orchestrator.dispatch_mode() == DispatchMode::Manual {
        orchestrator.set_selector(Box::new(StdinSelector {
            clock: clock.handle(),
        }));
    }
    orchestrator.subscribe(Box::new(ConsoleObserver));

    tracing::info!(
        airport = %orchestrator.config().name,
        config_hash = %orchestrator.config_hash(),
        "starting simulation"
    );

    let mut failure = None;
    clock.start();
    let executed = clock.run(args.ticks, |_| match orchestrator.tick() {
        Ok(result) if result.game_over => ControlFlow::Break(()),
        Ok(_) => ControlFlow::Continue(()),
        Err(error) => {
            failure = Some(error);
            ControlFlow::Break(())
        }
    });
    if let Some(error) = failure {
        return Err(anyhow::Error::new(error).context("Simulation tick failed"));
    }
    tracing::info!(executed, tick = orchestrator.current_tick(), "simulation stopped");

    let json = orchestrator.snapshot().to_json()?;
    match &args.snapshot_out {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?,
        None => println!("{}", json),
    }

    if orchestrator.is_game_over() {
        process::exit(2);
    }
    Ok(())
}
