//! Tubestorm - a tube shooter with a deterministic core
//!
//! The player rides the rim of a tube whose cross-section changes every
//! level, shooting down enemies and falling blocks that climb toward the
//! rim from the tunnel depths.
//!
//! Core modules:
//! - `sim`: Deterministic game simulation (geometry, entities, tick loop)
//! - `tuning`: Data-driven balance tables (difficulty, enemies, level shapes)
//! - `settings`: Player preferences with JSON persistence

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Difficulty;

/// Game constants
pub mod consts {
    /// Simulation timing (one tick per host frame at 60 Hz)
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;
    /// Milliseconds per tick, for the derived session clock
    pub const TICK_MS: f64 = 1000.0 / TICK_RATE as f64;

    /// View plane the tube projects onto
    pub const VIEW_CENTER_X: f32 = 700.0;
    pub const VIEW_CENTER_Y: f32 = 350.0;
    /// Horizontal rim radius for elliptical (circle) cross-sections
    pub const OUTER_RADIUS_X: f32 = 300.0;
    /// Vertical rim radius for elliptical (circle) cross-sections
    pub const OUTER_RADIUS_Y: f32 = 280.0;
    /// Nominal rim radius for polygonal cross-sections
    pub const OUTER_RADIUS: f32 = 280.0;
    /// Radius of the dark tunnel mouth at the vanishing point
    pub const TUNNEL_HOLE_RADIUS: f32 = 50.0;

    /// Player claw half-width in segment units
    pub const PLAYER_WIDTH: f32 = 0.05;
    /// Ticks between debounced player moves (100 ms at 60 Hz)
    pub const MOVE_COOLDOWN_TICKS: u64 = 6;

    /// Radial distance a bullet travels per tick
    pub const BULLET_SPEED: f32 = 0.04;
    /// Ticks between shots while the fire input is held
    pub const FIRE_COOLDOWN_TICKS: u64 = 6;

    /// Radial speed of a dying enemy sinking back down the tube
    pub const ENEMY_DEATH_SPEED: f32 = 0.003;
    /// Radial distance a falling block climbs per tick, before scaling
    pub const BLOCK_SPEED: f32 = 0.004;
    /// Rhythm drum pacing: base interval, floor, and per-enemy speedup
    pub const ENEMY_DRUM_BASE_MS: f64 = 600.0;
    pub const ENEMY_DRUM_MIN_MS: f64 = 150.0;
    pub const ENEMY_DRUM_STEP_MS: f64 = 40.0;
    /// Interval between an enemy's idle pulse tones
    pub const ENEMY_PULSE_MS: f64 = 800.0;

    /// Spikes never grow past this radial length
    pub const MAX_SPIKE_LENGTH: f32 = 0.8;
    /// Radial growth per tick while a spike extends
    pub const SPIKE_GROW_RATE: f32 = 0.01;
    /// Radial shrink per tick while a spike retracts
    pub const SPIKE_RETRACT_RATE: f32 = 0.02;

    /// Radial thickness of one landed block layer
    pub const RIM_BLOCK_THICKNESS: f32 = 0.06;
    /// Bullet speed multiplier while passing through a landed block
    pub const RIM_BLOCK_SLOW_FACTOR: f32 = 0.3;
    /// A stack this tall on any segment costs a life
    pub const RIM_OVERFLOW_HEIGHT: u32 = 5;

    /// Ticks between a zapper blast and the removal of what it killed
    pub const ZAP_SWEEP_TICKS: u32 = 6;

    /// A level cannot complete before this many gameplay frames
    pub const LEVEL_COMPLETE_MIN_FRAMES: u32 = 600;
    /// The enemy spawner must have idled this long before a level completes
    pub const LEVEL_COMPLETE_IDLE_TICKS: u32 = 200;
}

/// Circular distance between two segment coordinates on an `n`-segment tube
#[inline]
pub fn segment_distance(a: f32, b: f32, n: u32) -> f32 {
    let n = n as f32;
    let d = (a - b).abs() % n;
    d.min(n - d)
}
