#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Turf War session headlessly.
//!
//! The session advances in fixed animation-frame steps, optionally paced in
//! real time. A selected faction can attack on a fixed cadence, and the final
//! influence field can be written to a PNG.

mod png_sink;
mod report;

use std::{path::PathBuf, thread, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use turf_war_core::{FactionId, TerritoryId};
use turf_war_rendering::FrameSink;
use turf_war_session::{Session, SessionConfig};

use crate::png_sink::PngSink;

/// Faction names accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum FactionArg {
    Base,
    Hyperliquid,
    Monad,
}

impl From<FactionArg> for FactionId {
    fn from(value: FactionArg) -> Self {
        match value {
            FactionArg::Base => FactionId::Base,
            FactionArg::Hyperliquid => FactionId::Hyperliquid,
            FactionArg::Monad => FactionId::Monad,
        }
    }
}

/// Command-line options.
#[derive(Parser, Debug)]
#[command(name = "turf-war")]
#[command(about = "Simulate a three-faction fight for city territories")]
struct Args {
    /// TOML file with session settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for background skirmishes (overrides the config)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Delay between background skirmishes in milliseconds (overrides the config)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Disable background skirmishes
    #[arg(long)]
    no_simulation: bool,

    /// Simulated time to run for, in seconds
    #[arg(short, long, default_value = "30")]
    duration_secs: f64,

    /// Faction that attacks on a fixed cadence
    #[arg(long, value_enum)]
    attack_as: Option<FactionArg>,

    /// Territory id the attacks target (defaults to the first contested one)
    #[arg(long)]
    target: Option<u32>,

    /// Seconds between attacks
    #[arg(long, default_value = "5")]
    attack_every_secs: f64,

    /// Write the final influence field to this PNG file
    #[arg(long)]
    frame: Option<PathBuf>,

    /// Base side length of the rendered field (overrides the config)
    #[arg(long)]
    quality: Option<u32>,

    /// Sleep between steps so the run takes wall-clock time
    #[arg(long)]
    realtime: bool,
}

impl Args {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SessionConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_period_ms = tick_ms;
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        if self.no_simulation {
            config.simulating = false;
        }
        config.validate().context("invalid session settings")?;
        Ok(config)
    }
}

/// Entry point for the Turf War command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.session_config()?;
    let mut session = Session::new(&config).context("failed to start session")?;
    println!("{}", session.welcome_banner());

    if let Some(faction) = args.attack_as {
        session.select_faction(Some(faction.into()));
    }
    session
        .select_territory(args.target.map(TerritoryId::new))
        .context("invalid attack target")?;

    let step = config.frame_interval().context("invalid frame interval")?;
    run(&mut session, &args, step)?;

    println!("\nBoard after {:.1}s", session.clock().as_secs_f64());
    print!("{}", report::board(&session.territories()));
    println!("\nStandings");
    print!("{}", report::standings(&session.standings()));
    println!("\nRecent activity");
    print!("{}", report::activity(&session.activity_log()));

    if let Some(path) = args.frame.clone() {
        let frame = session.rasterize(config.resolution());
        PngSink::new(path).present(&frame)?;
    }

    Ok(())
}

fn run(session: &mut Session, args: &Args, step: Duration) -> Result<()> {
    let duration = seconds(args.duration_secs).context("--duration-secs must be non-negative")?;
    let attack_every =
        seconds(args.attack_every_secs).context("--attack-every-secs must be non-negative")?;

    let mut elapsed = Duration::ZERO;
    let mut since_attack = Duration::ZERO;
    while elapsed < duration {
        let dt = step.min(duration - elapsed);
        let _ = session.advance(dt)?;
        elapsed += dt;
        since_attack += dt;

        if !attack_every.is_zero() && since_attack >= attack_every {
            since_attack = Duration::ZERO;
            if let Some(target) = session.attack()? {
                tracing::info!(target = %target, "attack launched");
            }
        }

        if args.realtime {
            thread::sleep(dt);
        }
    }
    Ok(())
}

fn seconds(value: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(value).ok()
}
