//! Enemy, spike, and falling block spawning

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Enemy, EnemyKind, EnemyShape, FallingBlock, GameEvent, GameState, Spike};
use crate::consts::{BLOCK_SPEED, MAX_SPIKE_LENGTH};
use crate::tuning;

/// Pick an enemy kind for the level.
///
/// Level 1 sends only flippers. Each level after that widens the pool,
/// and from level 8 the spike bosses join the rotation.
pub fn roll_enemy_kind(level: u32, rng: &mut Pcg32) -> EnemyKind {
    match level {
        0 | 1 => EnemyKind::Flipper,
        2 => {
            if rng.random::<f32>() < 0.7 {
                EnemyKind::Flipper
            } else {
                EnemyKind::Spiker
            }
        }
        3 => {
            let roll = rng.random::<f32>();
            if roll < 0.5 {
                EnemyKind::Flipper
            } else if roll < 0.8 {
                EnemyKind::Spiker
            } else {
                EnemyKind::SpikeWeak
            }
        }
        4 => {
            let roll = rng.random::<f32>();
            if roll < 0.4 {
                EnemyKind::Flipper
            } else if roll < 0.6 {
                EnemyKind::Spiker
            } else if roll < 0.85 {
                EnemyKind::SpikeWeak
            } else {
                EnemyKind::SpikeMedium
            }
        }
        5..=7 => {
            let roll = rng.random::<f32>();
            if roll < 0.25 {
                EnemyKind::Flipper
            } else if roll < 0.4 {
                EnemyKind::Spiker
            } else if roll < 0.6 {
                EnemyKind::SpikeWeak
            } else if roll < 0.85 {
                EnemyKind::SpikeMedium
            } else {
                EnemyKind::SpikeStrong
            }
        }
        _ => {
            let roll = rng.random::<f32>();
            if roll < 0.2 {
                EnemyKind::Flipper
            } else if roll < 0.35 {
                EnemyKind::Spiker
            } else if roll < 0.5 {
                EnemyKind::SpikeWeak
            } else if roll < 0.7 {
                EnemyKind::SpikeMedium
            } else if roll < 0.9 {
                EnemyKind::SpikeStrong
            } else {
                EnemyKind::SpikeBoss
            }
        }
    }
}

/// Spawn one enemy at the tunnel mouth, centered on a random lane.
pub fn spawn_enemy(state: &mut GameState) {
    let kind = roll_enemy_kind(state.level, &mut state.rng);
    let lane = state.rng.random_range(0..state.geometry.segments) as f32 + 0.5;
    let shape = tuning::ENEMY_SHAPES[state.rng.random_range(0..tuning::ENEMY_SHAPES.len())];
    let color = tuning::ENEMY_COLORS[state.rng.random_range(0..tuning::ENEMY_COLORS.len())];

    let stats = tuning::enemy_stats(kind);
    let shape_bonus = tuning::shape_health(shape);
    let health = if kind.is_spike_class() {
        stats.base_health.max(1) + shape_bonus
    } else {
        shape_bonus
    };

    // Tougher shapes climb slower
    let shape_slow = 1.0 - (shape_bonus - 1) as f32 * 0.15;
    let preset = tuning::preset(state.difficulty);
    let speed =
        stats.base_speed * (1.0 + state.level as f32 * 0.1) * preset.enemy_speed * shape_slow;

    state.enemies.push(Enemy {
        segment: lane,
        position: 0.0,
        speed,
        color,
        points: stats.points,
        kind,
        shape,
        health,
        max_health: health,
        dead: false,
        dying: false,
        death_speed: 0.0,
        last_drum_ms: 0.0,
        last_pulse_ms: 0.0,
    });

    if shape == EnemyShape::RotatingCube {
        grow_spikes(state);
    }
    log::debug!("spawned {kind:?} ({shape:?}) lane {lane:.1} speed {speed:.4}");
    state.events.push(GameEvent::EnemySpawned);
}

/// Seed new spikes on random walls, or extend ones already there.
pub fn grow_spikes(state: &mut GameState) {
    let count = state.rng.random_range(1..=3);
    for _ in 0..count {
        let segment = state.rng.random_range(0..state.geometry.segments);
        if let Some(spike) = state.spikes.iter_mut().find(|s| s.segment == segment) {
            spike.target_length = (spike.target_length + 0.2).min(MAX_SPIKE_LENGTH);
            spike.growing = true;
        } else {
            state.spikes.push(Spike {
                segment,
                length: 0.0,
                target_length: state.rng.random_range(0.3..0.6),
                growing: true,
                hit_count: 0,
            });
        }
    }
}

/// Spawn one falling block at the tunnel mouth on a random segment.
pub fn spawn_block(state: &mut GameState) {
    let segment = state.rng.random_range(0..state.geometry.segments);
    let color = tuning::BLOCK_COLORS[state.rng.random_range(0..tuning::BLOCK_COLORS.len())];

    // Level 1 blocks crawl at quarter speed
    let level_scale = if state.level == 1 {
        0.25
    } else {
        1.0 + (state.level - 1) as f32 * 0.08
    };
    let preset = tuning::preset(state.difficulty);
    let speed = BLOCK_SPEED * level_scale * preset.block_speed;

    state.falling_blocks.push(FallingBlock {
        segment,
        position: 0.0,
        speed,
        color,
        width: 1.0,
        dead: false,
    });
    log::debug!("spawned block at segment {segment} speed {speed:.4}");
    state.events.push(GameEvent::BlockSpawned);
}
