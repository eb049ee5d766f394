//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order within each collection)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod transition;

pub use geometry::{LevelGeometry, ShapeKind, ShapeSpec};
pub use state::{
    BattleScar, Bullet, Enemy, EnemyKind, EnemyShape, FallingBlock, GameEvent, GamePhase,
    GameState, Player, PlayerFragment, RimBlock, ScarKind, Spark, Spike, TransitionStage,
};
pub use tick::{TickInput, start_game, tick};
