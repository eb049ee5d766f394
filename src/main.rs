//! Tubestorm entry point
//!
//! Runs the simulation headless with the autopilot at the controls and
//! prints a session report. Useful for soak-testing determinism and
//! balance without a renderer attached: the same seed always produces
//! the same report.

use clap::Parser;

use tubestorm::sim::{GameEvent, GameState, TickInput, tick};
use tubestorm::{Difficulty, Settings};

#[derive(Parser)]
#[command(name = "tubestorm")]
#[command(about = "Tube shooter simulation core, headless demo mode")]
struct Args {
    /// RNG seed for the session
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Ticks to simulate, 60 per second of play
    #[arg(long, default_value = "36000")]
    ticks: u64,

    /// Difficulty preset: easy, medium, hard or insane
    #[arg(long)]
    difficulty: Option<String>,

    /// Swap the left/right movement keys
    #[arg(long)]
    invert_controls: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut settings = Settings::load();
    let mut changed = false;
    if let Some(name) = args.difficulty.as_deref() {
        match Difficulty::from_str(name) {
            Some(difficulty) => {
                settings.difficulty = difficulty;
                changed = true;
            }
            None => {
                eprintln!("unknown difficulty {name:?}, expected easy, medium, hard or insane");
                std::process::exit(2);
            }
        }
    }
    if args.invert_controls && !settings.invert_controls {
        settings.invert_controls = true;
        changed = true;
    }
    if changed {
        if let Err(err) = settings.save() {
            log::warn!("could not save settings: {err}");
        }
    }

    log::info!(
        "headless session: seed={} ticks={} difficulty={}",
        args.seed,
        args.ticks,
        settings.difficulty.as_str()
    );

    let mut state = GameState::new(args.seed, settings.difficulty);
    state.invert_controls = settings.invert_controls;

    let input = TickInput {
        autopilot: true,
        ..TickInput::default()
    };

    let mut events = 0usize;
    let mut shots = 0u64;
    let mut kills = 0u64;
    let mut spawns = 0u64;
    let mut runs_ended = 0u64;
    let mut best_score = 0;
    let mut deepest_level = 1;

    for _ in 0..args.ticks {
        tick(&mut state, input);
        events += state.events.len();
        for event in &state.events {
            match event {
                GameEvent::ShotFired { .. } => shots += 1,
                GameEvent::Explosion => kills += 1,
                GameEvent::EnemySpawned => spawns += 1,
                GameEvent::GameOver => runs_ended += 1,
                _ => {}
            }
        }
        best_score = best_score.max(state.score);
        deepest_level = deepest_level.max(state.level);
    }

    println!(
        "simulated {} ticks ({:.1} minutes of play) on {}",
        args.ticks,
        args.ticks as f64 / 3600.0,
        settings.difficulty.as_str()
    );
    println!("  phase at exit   {:?}", state.phase);
    println!("  best score      {best_score}");
    println!("  deepest level   {deepest_level}");
    println!("  enemies spawned {spawns}");
    println!("  enemies killed  {kills}");
    println!("  shots fired     {shots}");
    println!("  runs ended      {runs_ended}");
    println!("  events emitted  {events}");
}
