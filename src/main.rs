//! Line Rider headless replay
//!
//! Loads a built-in map or a track file, runs the rider until it crashes or
//! the tick budget runs out, and prints what happened.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::Parser;

use line_rider::consts::SIM_DT;
use line_rider::persistence;
use line_rider::sim::{SimEvent, Simulation, Track};
use line_rider::view::{SpeedTier, status_line};
use line_rider::{Map, PhysicsConfig};

#[derive(Parser)]
#[command(name = "line-rider")]
#[command(about = "Replay a line-rider track without a terminal UI", long_about = None)]
struct Cli {
    /// Built-in map: beginner_hill, death_drop, loop_de_loop
    #[arg(short, long, conflicts_with = "track")]
    map: Option<String>,
    /// Track file ({"points": [...], "lines": [...]})
    #[arg(short, long)]
    track: Option<PathBuf>,
    /// Physics config JSON (missing keys use defaults)
    #[arg(short, long, env = "LINE_RIDER_CONFIG")]
    config: Option<PathBuf>,
    /// Maximum ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Timestep per tick
    #[arg(long, default_value_t = SIM_DT)]
    dt: f64,
    /// Print the stats line every tick
    #[arg(long)]
    trace: bool,
    /// Also save the loaded track into this directory
    #[arg(long)]
    save_dir: Option<PathBuf>,
}

fn load_track(cli: &Cli) -> Result<(String, Track)> {
    if let Some(path) = &cli.track {
        let track = persistence::load_track(path)
            .with_context(|| format!("loading track {}", path.display()))?;
        return Ok((path.display().to_string(), track));
    }
    let name = cli.map.as_deref().unwrap_or("beginner_hill");
    let Some(map) = Map::from_name(name) else {
        let known: Vec<_> = Map::all().iter().map(Map::name).collect();
        bail!("unknown map `{name}` (expected one of: {})", known.join(", "));
    };
    Ok((map.title().to_string(), map.track()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if !(cli.dt.is_finite() && cli.dt > 0.0) {
        bail!("--dt must be a positive number, got {}", cli.dt);
    }

    let config = match &cli.config {
        Some(path) => PhysicsConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PhysicsConfig::default(),
    };

    let (label, track) = load_track(&cli)?;
    if track.is_empty() {
        bail!("track `{label}` has no points");
    }

    if let Some(dir) = &cli.save_dir {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is before the Unix epoch")?
            .as_secs();
        let path = persistence::save_track_in(dir, &track, now)
            .with_context(|| format!("saving track into {}", dir.display()))?;
        println!("Saved {}", path.display());
    }

    log::info!(
        "Riding {label}: {} points, {} lines",
        track.points().len(),
        track.segments().len()
    );
    let mut sim = Simulation::new(track, config);

    let summary = sim.run_observed(cli.ticks, cli.dt, |tick, rider, event| {
        if cli.trace {
            println!("{tick:>5} {}", status_line(rider));
        }
        match event {
            Some(SimEvent::Landed) => log::debug!("tick {tick}: landed"),
            Some(SimEvent::LeftTrack) => log::debug!("tick {tick}: airborne"),
            Some(SimEvent::Crashed(cause)) => println!("tick {tick}: crashed ({cause:?})"),
            None => {}
        }
    });

    if let Some(rider) = sim.rider() {
        println!("{}", status_line(rider));
    }
    println!(
        "Ticks: {} | Top speed: {:.1} ({:?}) | On track: {} ticks",
        summary.ticks,
        summary.top_speed,
        SpeedTier::from_speed(summary.top_speed),
        summary.ground_ticks
    );
    match summary.crash {
        Some(cause) => println!(
            "Crashed ({cause:?}) at ({:.1}, {:.1})",
            summary.final_pos.x, summary.final_pos.y
        ),
        None => println!("Survived {} ticks", summary.ticks),
    }
    Ok(())
}
