//! Headless pest defense runner.
//!
//! Plays one seeded match with a greedy scripted build order, either as fast as
//! possible or paced at `--tick-hz`, and prints a summary (or the final
//! observation as JSON).

use anyhow::{Context, Result};
use clap::Parser;
use pest_types::EmplacementKind;
use sim_core::{ActionEnvelope, Tick};
use sim_host::MatchHost;
use sim_pest::{IncomeSource, MatchEvent, PestAction, PestConfig, PestMatch, RemovalCause, Spawned};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "headless-runner")]
#[command(about = "Run a seeded pest defense match without a renderer")]
struct Args {
    /// Seed for the wave director
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Stop after this many ticks even if the match is still running
    #[arg(long, default_value = "60000")]
    max_ticks: Tick,

    /// JSON file overriding any subset of the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pace ticks in wall-clock time instead of running flat out
    #[arg(short, long)]
    realtime: bool,

    /// Ticks per second in realtime mode
    #[arg(long, default_value = "60")]
    tick_hz: u32,

    /// Print the final observation as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

/// Lane-by-lane defense: a lamp line for income, misters behind, walls in front.
fn build_order(rows: u32) -> Vec<(u32, u32, EmplacementKind)> {
    let mut order = Vec::new();
    for row in 0..rows {
        order.push((row, 1, EmplacementKind::Mister));
    }
    for row in 0..rows {
        order.push((row, 0, EmplacementKind::UvLamp));
    }
    for row in 0..rows {
        order.push((row, 2, EmplacementKind::Mister));
    }
    for row in 0..rows {
        order.push((row, 4, EmplacementKind::StickyTrap));
    }
    for row in 0..rows {
        order.push((row, 3, EmplacementKind::Flytrap));
    }
    order
}

/// Submits the next build whenever the current light covers it.
struct BuildScript {
    order: Vec<(u32, u32, EmplacementKind)>,
    next: usize,
}

impl BuildScript {
    fn new(rows: u32) -> Self {
        Self {
            order: build_order(rows),
            next: 0,
        }
    }

    fn maybe_submit(&mut self, host: &mut MatchHost<PestMatch>) {
        let Some(&(row, col, kind)) = self.order.get(self.next) else {
            return;
        };
        let cost = host.game().config().emplacement(kind).cost;
        if host.game().light() < cost || host.pending_len() > 0 {
            return;
        }
        let action = PestAction::Place { row, col, kind };
        let tick = host.submit(ActionEnvelope::from_policy(
            self.next as u64,
            host.current_tick() + 1,
            action,
        ));
        debug!(tick, row, col, ?kind, "build submitted");
        self.next += 1;
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<PestConfig> {
    let Some(path) = path else {
        return Ok(PestConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    PestConfig::from_json_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let rows = config.rows;

    info!(seed = args.seed, max_ticks = args.max_ticks, "starting match");
    let mut host = MatchHost::<PestMatch>::new(config, args.seed);
    let mut script = BuildScript::new(rows);

    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(args.tick_hz.max(1)));
    let mut last_status = Instant::now();
    let mut all_events = Vec::new();

    while host.current_tick() < args.max_ticks {
        let tick_start = Instant::now();
        script.maybe_submit(&mut host);

        let Some(events) = host.step_one_tick() else {
            break;
        };
        if args.realtime {
            for event in &events {
                print_event(host.current_tick(), event);
            }
        }
        all_events.extend(events);

        if args.realtime {
            if last_status.elapsed() >= Duration::from_secs(1) {
                print_status(&host);
                last_status = Instant::now();
            }
            let elapsed = tick_start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            }
        }
    }

    if args.json {
        let observation = host.game().observe();
        println!("{}", serde_json::to_string_pretty(&observation)?);
        return Ok(());
    }

    println!("=== Pest Defense Simulation Complete ===");
    println!("Outcome: {:?}", host.is_terminal());
    println!("State: {:?}", host.game().match_state());
    println!("Final tick: {}", host.current_tick());
    print_status(&host);
    print_event_summary(&all_events);
    Ok(())
}

fn print_event(tick: Tick, event: &MatchEvent) {
    match event {
        MatchEvent::EmplacementPlaced { row, col, kind, .. } => {
            println!("[{:>6}] {:?} placed at ({}, {})", tick, kind, row, col)
        }
        MatchEvent::PlacementRejected { row, col, kind, reason } => {
            println!("[{:>6}] {:?} at ({}, {}) rejected: {}", tick, kind, row, col, reason)
        }
        MatchEvent::Spawned(Spawned::Invader { kind, row, .. }) => {
            println!("[{:>6}] {:?} entered lane {}", tick, kind, row)
        }
        MatchEvent::Removed(removal) if removal.is_boss_kill() => {
            println!("[{:>6}] *** Boss slug defeated ***", tick)
        }
        MatchEvent::Removed(removal) if removal.cause == RemovalCause::Sieged => {
            println!("[{:>6}] Emplacement lost to siege", tick)
        }
        MatchEvent::WaveCleared { wave } => println!("[{:>6}] === Wave {} cleared ===", tick, wave),
        MatchEvent::MatchEnded { state } => println!("[{:>6}] Match ended: {:?}", tick, state),
        MatchEvent::MatchReset => println!("[{:>6}] Match reset", tick),
        _ => {}
    }
}

fn print_status(host: &MatchHost<PestMatch>) {
    let game = host.game();
    let store = game.store();
    println!(
        "  [tick {:>6}] Wave {}/{}, Light: {}, Emplacements: {}, Invaders: {}, Projectiles: {}",
        host.current_tick(),
        game.wave(),
        game.config().max_waves,
        game.light(),
        store.emplacements().len(),
        store.invaders().len(),
        store.projectiles().len(),
    );
}

fn print_event_summary(events: &[MatchEvent]) {
    let mut placed = 0;
    let mut rejected = 0;
    let mut invaders_spawned = 0;
    let mut shots_fired = 0;
    let mut crits = 0;
    let mut kills = 0;
    let mut sieged = 0;
    let mut feedings = 0;
    let mut lamp_income = 0;
    let mut waves_cleared = 0;

    for event in events {
        match event {
            MatchEvent::EmplacementPlaced { .. } => placed += 1,
            MatchEvent::PlacementRejected { .. } => rejected += 1,
            MatchEvent::Spawned(Spawned::Invader { .. }) => invaders_spawned += 1,
            MatchEvent::Spawned(Spawned::Projectile { .. }) => shots_fired += 1,
            MatchEvent::Removed(removal) => match removal.cause {
                RemovalCause::Killed => kills += 1,
                RemovalCause::Sieged => sieged += 1,
                RemovalCause::Expired | RemovalCause::Breached => {}
            },
            MatchEvent::ProjectileImpact { crit: true, .. } => crits += 1,
            MatchEvent::FlytrapFed { .. } => feedings += 1,
            MatchEvent::LightCredited {
                amount,
                source: IncomeSource::LampIncome,
            } => lamp_income += amount,
            MatchEvent::WaveCleared { .. } => waves_cleared += 1,
            _ => {}
        }
    }

    println!("\n=== Event Summary ===");
    println!("Emplacements placed: {}", placed);
    println!("Placements rejected: {}", rejected);
    println!("Invaders spawned: {}", invaders_spawned);
    println!("Shots fired: {}", shots_fired);
    println!("Critical hits: {}", crits);
    println!("Invaders killed: {}", kills);
    println!("Flytrap feedings: {}", feedings);
    println!("Emplacements sieged: {}", sieged);
    println!("Lamp income: {}", lamp_income);
    println!("Waves cleared: {}", waves_cleared);
}
