//! Session state and core entity types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::geometry::LevelGeometry;
use super::tick::TickInput;
use super::transition;
use crate::consts::{PLAYER_WIDTH, TICK_MS};
use crate::tuning::{self, Difficulty};

/// Top-level game flow state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for the start input
    Start,
    /// Active gameplay (pausing is a flag on the session, not a phase)
    Playing,
    /// Threats are parked near the player, transition held until they pass
    TransitionWarning,
    /// Scripted level transition animation
    LevelComplete,
    /// New level built, frozen until the player acts
    LevelReady,
    /// Player destruction animation
    PlayerDying,
    /// Run over, waiting for the start input
    GameOver,
}

/// Stages of the level transition, derived from the frame counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStage {
    Lightning,
    Intro,
    Descent,
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Flipper,
    Tanker,
    Spiker,
    SpikeWeak,
    SpikeMedium,
    SpikeStrong,
    SpikeBoss,
}

impl EnemyKind {
    /// Spike-class enemies end the run outright if they reach the rim.
    pub fn is_spike_class(self) -> bool {
        !matches!(self, EnemyKind::Flipper | EnemyKind::Tanker)
    }
}

/// Rendered body of an enemy, which also grants extra health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyShape {
    Square,
    Triangle,
    Octagon,
    Pentagon,
    RotatingCube,
}

/// Notifications emitted during a tick for the presentation layer
///
/// Cleared at the start of every tick. Hosts drain them afterward to drive
/// audio and one-shot visual effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A bullet left the player's claw
    ShotFired { id: u32, position: f32 },
    /// A bullet moved, shifting its flight tone
    ShotPitch { id: u32, position: f32 },
    /// A bullet's flight tone should stop
    ShotEnded { id: u32 },
    /// Every flight tone should stop
    AllShotsEnded,
    /// A bullet reached the tunnel mouth without hitting anything
    MissedShot,
    PlayerMoved { segment: u32, segment_count: u32 },
    EnemySpawned,
    /// Rhythm drum, paced by the live enemy count
    EnemyDrum { shape: EnemyShape, intensity: f32 },
    /// Idle pulse an enemy makes while climbing
    EnemyPulse { shape: EnemyShape },
    /// An enemy was destroyed
    Explosion,
    /// Something took a non-lethal hit
    Hit,
    BlockSpawned,
    BlockHit,
    BlockLanded,
    /// Every rim segment was capped and the stacks cleared
    RimCleared,
    ZapperFired,
    LightningFlash { fade: bool },
    /// The transition fanfare begins
    TransitionIntro,
    DescentWhoosh { progress: f32 },
    PlayerExploded,
    GameOver,
    MusicStarted,
    MusicStopped,
    /// Music dips under explosions and transitions
    MusicDucked { ducked: bool },
}

/// The player's claw on the tube rim
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// Integer segment the claw sits on
    pub segment: u32,
    /// Radial depth, 1.0 on the rim
    pub position: f32,
    pub color: u32,
    /// Half-width in segment units, for presentation
    pub width: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            segment: 0,
            position: 1.0,
            color: tuning::PLAYER_COLOR,
            width: PLAYER_WIDTH,
        }
    }
}

/// A shot travelling down the tube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    /// Session-unique id, used to address the bullet's flight tone
    pub id: u32,
    /// Fractional segment lane, fixed at launch
    pub segment: f32,
    /// Radial depth, decreasing toward the tunnel mouth
    pub position: f32,
    /// Current speed after landed-block drag
    pub speed: f32,
    pub base_speed: f32,
    /// Set on any hit so a clean miss can be penalized at exit
    pub hit_something: bool,
}

impl Bullet {
    pub fn new(id: u32, segment: f32, position: f32) -> Self {
        Self {
            id,
            segment,
            position,
            speed: crate::consts::BULLET_SPEED,
            base_speed: crate::consts::BULLET_SPEED,
            hit_something: false,
        }
    }
}

/// An enemy climbing the tube toward the rim
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    /// Fractional segment lane (spawns centered, at .5)
    pub segment: f32,
    /// Radial depth, increasing toward the rim
    pub position: f32,
    /// Climb per tick after difficulty, level, and shape scaling
    pub speed: f32,
    pub color: u32,
    /// Score for a kill
    pub points: u32,
    pub kind: EnemyKind,
    pub shape: EnemyShape,
    /// Hits remaining
    pub health: u32,
    pub max_health: u32,
    /// Killed by the zapper, waiting for the sweep
    pub dead: bool,
    /// Shot down, sinking back toward the tunnel mouth
    pub dying: bool,
    /// Sink rate while dying
    pub death_speed: f32,
    /// Session clock time of the last rhythm drum, in ms
    pub last_drum_ms: f64,
    /// Session clock time of the last idle pulse, in ms
    pub last_pulse_ms: f64,
}

/// A hazard growing inward from the rim along a segment wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spike {
    pub segment: u32,
    /// Current radial length, measured from the rim
    pub length: f32,
    pub target_length: f32,
    pub growing: bool,
    /// Bullet hits since the last forced retraction
    pub hit_count: u32,
}

/// A block tumbling up the tube toward the rim
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingBlock {
    pub segment: u32,
    /// Radial depth, increasing toward the rim
    pub position: f32,
    pub speed: f32,
    pub color: u32,
    /// Fraction of the segment the block spans
    pub width: f32,
    /// Killed by the zapper, waiting for the sweep
    pub dead: bool,
}

/// A block that reached the rim and stacked there
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RimBlock {
    pub segment: u32,
    pub color: u32,
    /// Stack layer, 0 at the rim surface
    pub height: u32,
}

/// Cosmetic damage painted on the tube during a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleScar {
    pub segment: u32,
    /// Radial depth of the scar
    pub position: f32,
    pub kind: ScarKind,
    pub angle: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScarKind {
    Crack,
    Burn,
}

/// Short-lived particle thrown off the rim during the descent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    /// View-plane position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks remaining
    pub life: u32,
    pub max_life: u32,
    pub color: u32,
}

/// Piece of the player's claw after a fatal hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerFragment {
    /// View-plane position
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Ticks remaining
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// RNG seed this session started from
    pub seed: u64,
    /// Deterministic RNG, the only randomness source in the simulation
    pub rng: Pcg32,
    /// Difficulty preset applied when a run starts
    pub difficulty: Difficulty,
    /// Swap the left/right movement inputs
    pub invert_controls: bool,

    pub phase: GamePhase,
    pub paused: bool,
    pub score: u32,
    /// 1-based level number
    pub level: u32,
    pub lives: u32,
    /// Screen-clearing charges
    pub zappers: u32,

    /// Gameplay frames this level, reset when a level starts
    pub frame_count: u32,
    /// Ticks since the session began, advances every tick
    pub time_ticks: u64,

    pub enemy_spawn_timer: u32,
    /// Ticks between enemy spawns
    pub enemy_spawn_rate: u32,
    pub block_spawn_timer: u32,
    /// Ticks between falling block spawns
    pub block_spawn_rate: u32,

    pub geometry: LevelGeometry,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub falling_blocks: Vec<FallingBlock>,
    pub rim_blocks: Vec<RimBlock>,
    pub spikes: Vec<Spike>,

    /// Segments flagged dangerous when a level tried to end
    pub danger_segments: Vec<u32>,
    /// Frames spent in the pre-transition warning
    pub warning_frame: u32,
    /// Frames into the level transition animation
    pub transition_frame: u32,
    /// Cosmetic damage shown on the outgoing tube
    pub battle_scars: Vec<BattleScar>,
    pub sparks: Vec<Spark>,

    pub player_fragments: Vec<PlayerFragment>,
    /// Frames into the player destruction animation
    pub dying_frame: u32,

    /// Ticks until zapper kills are swept from the collections
    pub zap_sweep_ticks: u32,

    /// Tick of the last accepted move input
    pub last_move_tick: Option<u64>,
    /// Tick of the last shot
    pub last_fire_tick: Option<u64>,

    /// Events emitted this tick, cleared when the next tick starts
    pub events: Vec<GameEvent>,
    /// Input sampled last tick, for edge detection
    pub prev_input: TickInput,

    next_bullet_id: u32,
}

impl GameState {
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        let preset = tuning::preset(difficulty);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            invert_controls: false,
            phase: GamePhase::Start,
            paused: false,
            score: 0,
            level: 1,
            lives: preset.lives,
            zappers: 1,
            frame_count: 0,
            time_ticks: 0,
            enemy_spawn_timer: 0,
            enemy_spawn_rate: preset.enemy_spawn_rate,
            block_spawn_timer: 0,
            block_spawn_rate: preset.block_spawn_rate,
            geometry: LevelGeometry::new(tuning::level_shape(1)),
            player: Player::default(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            falling_blocks: Vec::new(),
            rim_blocks: Vec::new(),
            spikes: Vec::new(),
            danger_segments: Vec::new(),
            warning_frame: 0,
            transition_frame: 0,
            battle_scars: Vec::new(),
            sparks: Vec::new(),
            player_fragments: Vec::new(),
            dying_frame: 0,
            zap_sweep_ticks: 0,
            last_move_tick: None,
            last_fire_tick: None,
            events: Vec::new(),
            prev_input: TickInput::default(),
            next_bullet_id: 1,
        }
    }

    /// Allocate a session-unique bullet id.
    pub fn next_bullet_id(&mut self) -> u32 {
        let id = self.next_bullet_id;
        self.next_bullet_id += 1;
        id
    }

    /// Session clock in milliseconds, derived from the tick counter.
    pub fn clock_ms(&self) -> f64 {
        self.time_ticks as f64 * TICK_MS
    }

    /// Current transition stage, if a transition is running.
    pub fn transition_stage(&self) -> Option<TransitionStage> {
        if self.phase == GamePhase::LevelComplete {
            Some(transition::stage_for_frame(self.transition_frame))
        } else {
            None
        }
    }

    /// Take a life. Respawns the player with a cleared rim approach, or
    /// ends the run when no lives remain.
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::Hit);
        if self.lives == 0 {
            self.game_over();
        } else {
            self.player.position = 1.0;
            // Grace: anything already near the rim is removed
            self.enemies.retain(|e| e.position <= 0.8);
        }
    }

    /// End the run. Bullets stay in flight but their tones stop.
    pub fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        for bullet in &self.bullets {
            self.events.push(GameEvent::ShotEnded { id: bullet.id });
        }
        self.events.push(GameEvent::MusicStopped);
        self.events.push(GameEvent::GameOver);
        log::info!(
            "game over: score={} level={} on {}",
            self.score,
            self.level,
            self.difficulty.as_str()
        );
    }
}
