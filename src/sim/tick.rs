//! Fixed timestep simulation tick
//!
//! `tick` advances a session by exactly one step: read input edges,
//! dispatch on the current phase, move everything, spawn, collide, and
//! check for level completion. All randomness goes through the state's
//! seeded generator, so the same seed and input sequence always produce
//! the same run.

use std::cmp::Ordering;

use crate::consts::{
    ENEMY_DRUM_BASE_MS, ENEMY_DRUM_MIN_MS, ENEMY_DRUM_STEP_MS, ENEMY_PULSE_MS,
    FIRE_COOLDOWN_TICKS, LEVEL_COMPLETE_IDLE_TICKS, LEVEL_COMPLETE_MIN_FRAMES,
    MOVE_COOLDOWN_TICKS, RIM_BLOCK_SLOW_FACTOR, RIM_BLOCK_THICKNESS, SPIKE_GROW_RATE,
    SPIKE_RETRACT_RATE, ZAP_SWEEP_TICKS,
};
use crate::segment_distance;
use crate::sim::collision;
use crate::sim::geometry::LevelGeometry;
use crate::sim::spawn;
use crate::sim::state::{Bullet, GameEvent, GamePhase, GameState, RimBlock};
use crate::sim::transition;
use crate::tuning;

/// Input commands for a single tick (deterministic)
///
/// Fields are held-state, not edges. The tick compares against the
/// previous tick's input to detect presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInput {
    /// Move the claw counterclockwise
    pub left: bool,
    /// Move the claw clockwise
    pub right: bool,
    /// Fire down the current lane
    pub fire: bool,
    /// Trigger the screen-clearing zapper
    pub zap: bool,
    /// Begin a run from the title or game over screen
    pub start: bool,
    /// Toggle pause
    pub pause: bool,
    /// Abandon the run
    pub escape: bool,
    /// When set, the autopilot rewrites the other fields
    pub autopilot: bool,
}

/// Advance the simulation by one fixed step.
///
/// Clears the event queue, bumps the tick clock, then runs whatever the
/// current phase calls for. Callers drain `state.events` afterwards.
pub fn tick(state: &mut GameState, input: TickInput) {
    state.events.clear();
    state.time_ticks += 1;

    let mut input = input;
    if input.autopilot {
        drive_autopilot(state, &mut input);
    }

    let prev = state.prev_input;
    state.prev_input = input;
    let start_pressed = input.start && !prev.start;
    let pause_pressed = input.pause && !prev.pause;
    let escape_pressed = input.escape && !prev.escape;
    let zap_pressed = input.zap && !prev.zap;
    let action_pressed = (input.fire && !prev.fire)
        || (input.left && !prev.left)
        || (input.right && !prev.right)
        || zap_pressed;

    match state.phase {
        GamePhase::Start | GamePhase::GameOver => {
            if start_pressed {
                start_game(state);
            }
        }
        GamePhase::LevelReady => {
            // The claw still steers while the level holds; any action key
            // releases the hold and the level goes live
            update_player(state, input);
            if action_pressed {
                state.phase = GamePhase::Playing;
                state.frame_count = 0;
                state.events.push(GameEvent::MusicStarted);
            }
        }
        GamePhase::TransitionWarning => {
            update_player(state, input);
            transition::advance_warning(state);
        }
        GamePhase::LevelComplete => {
            transition::advance_transition(state);
        }
        GamePhase::PlayerDying => {
            transition::advance_player_dying(state);
        }
        GamePhase::Playing => {
            if escape_pressed {
                state.game_over();
                return;
            }
            if pause_pressed {
                state.paused = !state.paused;
                if state.paused {
                    for bullet in &state.bullets {
                        state.events.push(GameEvent::ShotEnded { id: bullet.id });
                    }
                }
            }
            if state.paused {
                return;
            }
            if zap_pressed {
                use_zapper(state);
            }
            playing_tick(state, input);
        }
    }
}

/// One step of live play: movement, physics, collisions, spawning.
fn playing_tick(state: &mut GameState, input: TickInput) {
    state.frame_count += 1;
    state.enemy_spawn_timer += 1;
    state.block_spawn_timer += 1;

    // Zapper kills stay on the field briefly, then get swept
    if state.zap_sweep_ticks > 0 {
        state.zap_sweep_ticks -= 1;
        if state.zap_sweep_ticks == 0 {
            state.enemies.retain(|e| !e.dead);
            state.falling_blocks.retain(|b| !b.dead);
        }
    }

    update_player(state, input);
    update_bullets(state);
    update_enemies(state);
    if state.phase != GamePhase::Playing {
        return;
    }
    update_blocks(state);
    if state.phase != GamePhase::Playing {
        return;
    }
    update_spikes(state);
    if state.phase != GamePhase::Playing {
        return;
    }
    collision::resolve_collisions(state);

    // Holding fire keeps shooting at the cooldown cadence
    if input.fire
        && state
            .last_fire_tick
            .is_none_or(|t| state.time_ticks - t >= FIRE_COOLDOWN_TICKS)
    {
        fire_bullet(state);
        state.last_fire_tick = Some(state.time_ticks);
    }

    if state.enemy_spawn_timer > state.enemy_spawn_rate {
        spawn::spawn_enemy(state);
        state.enemy_spawn_timer = 0;
    }
    if state.block_spawn_timer > state.block_spawn_rate {
        spawn::spawn_block(state);
        state.block_spawn_timer = 0;
    }

    check_level_complete(state);
}

fn update_player(state: &mut GameState, input: TickInput) {
    let (left, right) = if state.invert_controls {
        (input.right, input.left)
    } else {
        (input.left, input.right)
    };
    if left == right {
        return;
    }
    let ready = state
        .last_move_tick
        .is_none_or(|t| state.time_ticks - t >= MOVE_COOLDOWN_TICKS);
    if !ready {
        return;
    }
    let segments = state.geometry.segments;
    state.player.segment = if left {
        (state.player.segment + segments - 1) % segments
    } else {
        (state.player.segment + 1) % segments
    };
    state.last_move_tick = Some(state.time_ticks);
    state.events.push(GameEvent::PlayerMoved {
        segment: state.player.segment,
        segment_count: segments,
    });
}

fn update_bullets(state: &mut GameState) {
    let mut i = 0;
    while i < state.bullets.len() {
        let lane = state.bullets[i].segment.floor() as u32;
        let position = state.bullets[i].position;

        // Landed rim blocks drag bullets passing through their band
        let mut modifier = 1.0;
        for block in &state.rim_blocks {
            if block.segment != lane {
                continue;
            }
            let outer = 1.0 - block.height as f32 * RIM_BLOCK_THICKNESS;
            if position <= outer && position >= outer - RIM_BLOCK_THICKNESS {
                modifier = RIM_BLOCK_SLOW_FACTOR;
            }
        }

        let bullet = &mut state.bullets[i];
        bullet.speed = bullet.base_speed * modifier;
        bullet.position -= bullet.speed;
        let id = bullet.id;
        let new_position = bullet.position;
        let missed = !bullet.hit_something;
        state.events.push(GameEvent::ShotPitch {
            id,
            position: new_position,
        });

        if new_position < 0.0 {
            state.events.push(GameEvent::ShotEnded { id });
            if missed {
                state.score = state.score.saturating_sub(1);
                state.events.push(GameEvent::MissedShot);
            }
            state.bullets.remove(i);
        } else {
            i += 1;
        }
    }
}

fn update_enemies(state: &mut GameState) {
    let live_count = state.enemies.iter().filter(|e| !e.dead).count() as u32;
    let drum_interval =
        (ENEMY_DRUM_BASE_MS - f64::from(live_count) * ENEMY_DRUM_STEP_MS).max(ENEMY_DRUM_MIN_MS);
    let drum_intensity = (0.5 + live_count as f32 * 0.1).min(1.5);
    let now = state.clock_ms();
    let player_center = state.player.segment as f32 + 0.5;
    let segments = state.geometry.segments;

    let mut i = 0;
    while i < state.enemies.len() {
        if state.enemies[i].dead {
            i += 1;
            continue;
        }
        if state.enemies[i].dying {
            // Death slide back toward the vanishing point
            state.enemies[i].position -= state.enemies[i].death_speed;
            if state.enemies[i].position <= 0.0 {
                state.enemies.remove(i);
            } else {
                i += 1;
            }
            continue;
        }

        let enemy = &mut state.enemies[i];
        enemy.position += enemy.speed;
        let shape = enemy.shape;
        let kind = enemy.kind;
        let lane = enemy.segment;
        let reached_rim = enemy.position >= 1.0;
        let drum_due = now - enemy.last_drum_ms > drum_interval;
        if drum_due {
            enemy.last_drum_ms = now;
        }
        let pulse_due = now - enemy.last_pulse_ms > ENEMY_PULSE_MS;
        if pulse_due {
            enemy.last_pulse_ms = now;
        }

        if drum_due {
            state.events.push(GameEvent::EnemyDrum {
                shape,
                intensity: drum_intensity,
            });
        }
        if pulse_due {
            state.events.push(GameEvent::EnemyPulse { shape });
        }

        if reached_rim {
            if kind.is_spike_class() {
                // A spike carrier on the rim ends the run outright
                state.events.push(GameEvent::Hit);
                state.game_over();
                return;
            }
            if segment_distance(lane, player_center, segments) < 0.7 {
                state.enemies.remove(i);
                transition::destroy_player(state);
                return;
            }
            // Out of reach: camp the rim and recheck as the player moves
            state.enemies[i].position = 1.0;
        }
        i += 1;
    }
}

fn update_blocks(state: &mut GameState) {
    let mut i = 0;
    while i < state.falling_blocks.len() {
        if state.falling_blocks[i].dead {
            i += 1;
            continue;
        }
        let block = &mut state.falling_blocks[i];
        block.position += block.speed;
        if block.position < 1.0 {
            i += 1;
            continue;
        }
        let segment = block.segment;
        let color = block.color;
        let height = state
            .rim_blocks
            .iter()
            .filter(|b| b.segment == segment)
            .count() as u32;
        state.rim_blocks.push(RimBlock {
            segment,
            color,
            height,
        });
        state.falling_blocks.remove(i);
        state.events.push(GameEvent::BlockLanded);
        collision::check_rim_complete(state);
        collision::check_block_overflow(state);
        if state.phase != GamePhase::Playing {
            return;
        }
    }
}

fn update_spikes(state: &mut GameState) {
    let player_center = state.player.segment as f32 + 0.5;
    let segments = state.geometry.segments;
    for i in 0..state.spikes.len() {
        let spike = &mut state.spikes[i];
        if spike.growing {
            spike.length += SPIKE_GROW_RATE;
            if spike.length >= spike.target_length {
                spike.length = spike.target_length;
                spike.growing = false;
            }
        } else if spike.length > spike.target_length {
            spike.length -= SPIKE_RETRACT_RATE;
            if spike.length < spike.target_length {
                spike.length = spike.target_length;
            }
        }

        let length = spike.length;
        let lane = spike.segment as f32;
        if length > 0.5
            && segment_distance(lane, player_center, segments) < 0.6
            && state.player.position < length + 0.1
        {
            state.lose_life();
            if state.phase != GamePhase::Playing {
                return;
            }
        }
    }
}

/// Detonate the zapper: everything on the field dies at double value.
fn use_zapper(state: &mut GameState) {
    if state.zappers == 0 {
        return;
    }
    state.zappers -= 1;
    state.events.push(GameEvent::ZapperFired);

    // Kills are marked dead and swept a few ticks later
    for enemy in state.enemies.iter_mut() {
        if !enemy.dead {
            enemy.dead = true;
            state.score += enemy.points * 2;
        }
    }
    for block in state.falling_blocks.iter_mut() {
        if !block.dead {
            block.dead = true;
            state.score += 100;
        }
    }
    state.score += state.rim_blocks.len() as u32 * 50;
    state.rim_blocks.clear();
    state.spikes.clear();
    state.zap_sweep_ticks = ZAP_SWEEP_TICKS;
}

fn fire_bullet(state: &mut GameState) {
    let id = state.next_bullet_id();
    let bullet = Bullet::new(id, state.player.segment as f32 + 0.5, state.player.position);
    state.events.push(GameEvent::ShotFired {
        id,
        position: bullet.position,
    });
    state.bullets.push(bullet);
}

fn check_level_complete(state: &mut GameState) {
    if state.frame_count > LEVEL_COMPLETE_MIN_FRAMES
        && state.enemies.is_empty()
        && state.falling_blocks.is_empty()
        && state.rim_blocks.is_empty()
        && state.enemy_spawn_timer > LEVEL_COMPLETE_IDLE_TICKS
    {
        transition::next_level(state);
    }
}

/// Reset the session and begin a fresh run on level 1.
pub fn start_game(state: &mut GameState) {
    let preset = tuning::preset(state.difficulty);
    state.score = 0;
    state.level = 1;
    state.lives = preset.lives;
    state.zappers = 1;
    state.paused = false;
    state.frame_count = 0;
    state.enemy_spawn_rate = preset.enemy_spawn_rate;
    state.block_spawn_rate = preset.block_spawn_rate;
    state.enemy_spawn_timer = 0;
    state.block_spawn_timer = 0;
    state.player.segment = 0;
    state.player.position = 1.0;
    state.bullets.clear();
    state.enemies.clear();
    state.falling_blocks.clear();
    state.rim_blocks.clear();
    state.spikes.clear();
    state.player_fragments.clear();
    state.danger_segments.clear();
    state.zap_sweep_ticks = 0;
    state.last_move_tick = None;
    state.last_fire_tick = None;
    state.geometry = LevelGeometry::new(tuning::level_shape(1));
    state.events.push(GameEvent::AllShotsEnded);
    state.events.push(GameEvent::MusicStarted);
    state.phase = GamePhase::Playing;
    log::info!(
        "run started: difficulty={} seed={}",
        state.difficulty.as_str(),
        state.seed
    );
}

/// Demo pilot: chases the deepest live threat and holds the trigger.
fn drive_autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Start | GamePhase::GameOver => {
            // Alternate so the press registers as an edge
            input.start = state.time_ticks % 2 == 0;
        }
        GamePhase::LevelReady => {
            input.fire = state.time_ticks % 2 == 0;
        }
        GamePhase::Playing if !state.paused => {
            let target = state
                .enemies
                .iter()
                .filter(|e| !e.dead && !e.dying)
                .max_by(|a, b| {
                    a.position
                        .partial_cmp(&b.position)
                        .unwrap_or(Ordering::Equal)
                })
                .map(|e| e.segment)
                .or_else(|| {
                    state
                        .falling_blocks
                        .iter()
                        .filter(|b| !b.dead)
                        .max_by(|a, b| {
                            a.position
                                .partial_cmp(&b.position)
                                .unwrap_or(Ordering::Equal)
                        })
                        .map(|b| b.segment as f32 + 0.5)
                });

            input.left = false;
            input.right = false;
            if let Some(target) = target {
                let segments = state.geometry.segments;
                let player_center = state.player.segment as f32 + 0.5;
                if segment_distance(target, player_center, segments) > 0.5 {
                    // Step around whichever way is shorter
                    let forward = (target - player_center).rem_euclid(segments as f32);
                    if forward < segments as f32 / 2.0 {
                        input.right = true;
                    } else {
                        input.left = true;
                    }
                }
            }
            input.fire = true;

            let threats = state.enemies.iter().filter(|e| !e.dead && !e.dying).count()
                + state.falling_blocks.iter().filter(|b| !b.dead).count();
            input.zap = state.zappers > 0 && threats >= 6;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::consts::{BULLET_SPEED, MAX_SPIKE_LENGTH};
    use crate::tuning::Difficulty;
    use crate::sim::state::{Enemy, EnemyKind, EnemyShape, FallingBlock, Spike};

    fn playing_state() -> GameState {
        let mut state = GameState::new(7, Difficulty::Medium);
        start_game(&mut state);
        state.events.clear();
        state
    }

    fn held(f: impl Fn(&mut TickInput)) -> TickInput {
        let mut input = TickInput::default();
        f(&mut input);
        input
    }

    fn flipper(segment: f32, position: f32, speed: f32) -> Enemy {
        Enemy {
            segment,
            position,
            speed,
            color: 0xff0000,
            points: 150,
            kind: EnemyKind::Flipper,
            shape: EnemyShape::Square,
            health: 1,
            max_health: 1,
            dead: false,
            dying: false,
            death_speed: 0.0,
            last_drum_ms: 0.0,
            last_pulse_ms: 0.0,
        }
    }

    #[test]
    fn test_start_press_begins_run() {
        let mut state = GameState::new(1, Difficulty::Easy);
        assert_eq!(state.phase, GamePhase::Start);

        tick(&mut state, held(|i| i.start = true));

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 5);
        assert_eq!(state.level, 1);
        assert_eq!(state.geometry.segments, 12);
        assert!(state.events.contains(&GameEvent::MusicStarted));
        assert!(state.events.contains(&GameEvent::AllShotsEnded));
    }

    #[test]
    fn test_start_requires_press_edge() {
        let mut state = GameState::new(1, Difficulty::Easy);
        state.prev_input.start = true;

        tick(&mut state, held(|i| i.start = true));

        assert_eq!(state.phase, GamePhase::Start);
    }

    #[test]
    fn test_held_fire_shoots_on_cooldown_cadence() {
        let mut state = playing_state();
        let mut shots = 0;
        for _ in 0..13 {
            tick(&mut state, held(|i| i.fire = true));
            shots += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::ShotFired { .. }))
                .count();
        }
        // First press fires at once, then every sixth tick
        assert_eq!(shots, 3);
        assert_eq!(state.bullets.len(), 3);
    }

    #[test]
    fn test_held_move_steps_on_cooldown_cadence() {
        let mut state = playing_state();
        for _ in 0..13 {
            tick(&mut state, held(|i| i.left = true));
        }
        // Three steps counterclockwise from lane 0 on a 12 lane web
        assert_eq!(state.player.segment, 9);
    }

    #[test]
    fn test_inverted_controls_swap_direction() {
        let mut state = playing_state();
        state.invert_controls = true;
        tick(&mut state, held(|i| i.left = true));
        assert_eq!(state.player.segment, 1);
    }

    #[test]
    fn test_opposed_keys_cancel() {
        let mut state = playing_state();
        tick(
            &mut state,
            held(|i| {
                i.left = true;
                i.right = true;
            }),
        );
        assert_eq!(state.player.segment, 0);
    }

    #[test]
    fn test_missed_shot_costs_a_point_and_clamps() {
        let mut state = playing_state();
        state.score = 1;
        state.bullets.push(Bullet::new(900, 0.5, 0.02));
        tick(&mut state, TickInput::default());
        assert_eq!(state.score, 0);
        assert!(state.events.contains(&GameEvent::MissedShot));
        assert!(state.bullets.is_empty());

        state.bullets.push(Bullet::new(901, 0.5, 0.02));
        tick(&mut state, TickInput::default());
        // Already at zero, the penalty saturates
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_rim_block_band_slows_bullets() {
        let mut state = playing_state();
        state.rim_blocks.push(RimBlock {
            segment: 0,
            color: 0xff00ff,
            height: 0,
        });
        // Inside the band at the rim
        state.bullets.push(Bullet::new(910, 0.5, 0.97));
        tick(&mut state, TickInput::default());
        let slowed = state.bullets[0].position;
        assert!((0.97 - slowed - BULLET_SPEED * RIM_BLOCK_SLOW_FACTOR).abs() < 1e-6);

        // Below the band the bullet flies at full speed
        state.bullets[0].position = 0.5;
        tick(&mut state, TickInput::default());
        assert!((0.5 - state.bullets[0].position - BULLET_SPEED).abs() < 1e-6);
    }

    #[test]
    fn test_pause_freezes_the_field() {
        let mut state = playing_state();
        state.enemies.push(flipper(3.5, 0.3, 0.005));
        state.bullets.push(Bullet::new(920, 0.5, 0.5));

        tick(&mut state, held(|i| i.pause = true));
        assert!(state.paused);
        assert!(state.events.contains(&GameEvent::ShotEnded { id: 920 }));

        // Held pause is not a new edge, the world stays frozen
        tick(&mut state, held(|i| i.pause = true));
        assert!(state.paused);
        assert!((state.enemies[0].position - 0.3).abs() < 1e-6);
        assert!((state.bullets[0].position - 0.5).abs() < 1e-6);

        // Release then press again to resume
        tick(&mut state, TickInput::default());
        tick(&mut state, held(|i| i.pause = true));
        assert!(!state.paused);
        assert!(state.enemies[0].position > 0.3);
    }

    #[test]
    fn test_escape_abandons_the_run() {
        let mut state = playing_state();
        tick(&mut state, held(|i| i.escape = true));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_zapper_sweeps_the_field_at_double_value() {
        let mut state = playing_state();
        state.enemies.push(flipper(2.5, 0.4, 0.005));
        state.enemies.push(flipper(7.5, 0.6, 0.005));
        state.falling_blocks.push(FallingBlock {
            segment: 4,
            position: 0.5,
            speed: 0.004,
            width: 1.0,
            color: 0x00ffff,
            dead: false,
        });
        state.rim_blocks.push(RimBlock {
            segment: 1,
            color: 0x00ffff,
            height: 0,
        });
        state.rim_blocks.push(RimBlock {
            segment: 2,
            color: 0x00ffff,
            height: 0,
        });
        state.spikes.push(Spike {
            segment: 6,
            length: 0.4,
            target_length: 0.4,
            growing: false,
            hit_count: 0,
        });

        tick(&mut state, held(|i| i.zap = true));

        // Two flippers at 300 each, block at 100, two rim blocks at 50
        assert_eq!(state.score, 800);
        assert_eq!(state.zappers, 0);
        assert!(state.events.contains(&GameEvent::ZapperFired));
        assert!(state.rim_blocks.is_empty());
        assert!(state.spikes.is_empty());
        assert!(state.enemies.iter().all(|e| e.dead));
        assert_eq!(state.enemies.len(), 2);

        // Corpses sweep out a few ticks later
        for _ in 0..ZAP_SWEEP_TICKS {
            tick(&mut state, TickInput::default());
        }
        assert!(state.enemies.is_empty());
        assert!(state.falling_blocks.is_empty());
    }

    #[test]
    fn test_second_zap_without_charge_does_nothing() {
        let mut state = playing_state();
        state.zappers = 0;
        state.enemies.push(flipper(2.5, 0.4, 0.005));
        tick(&mut state, held(|i| i.zap = true));
        assert_eq!(state.score, 0);
        assert!(!state.events.contains(&GameEvent::ZapperFired));
        assert!(!state.enemies[0].dead);
    }

    #[test]
    fn test_flipper_far_from_player_camps_the_rim() {
        let mut state = playing_state();
        state.enemies.push(flipper(6.5, 0.999, 0.005));
        tick(&mut state, TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.enemies.len(), 1);
        assert!((state.enemies[0].position - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_enemy_drum_and_pulse_cadence() {
        // Easy spawn rates keep the field quiet for the whole window
        let mut state = GameState::new(7, Difficulty::Easy);
        start_game(&mut state);
        for lane in 0..5 {
            state.enemies.push(flipper(lane as f32 + 0.5, 0.3, 0.0));
        }

        let mut beat_ticks = Vec::new();
        let mut pulse_ticks = Vec::new();
        for t in 1..=80u64 {
            tick(&mut state, TickInput::default());
            let drums: Vec<f32> = state
                .events
                .iter()
                .filter_map(|e| match e {
                    GameEvent::EnemyDrum { intensity, .. } => Some(*intensity),
                    _ => None,
                })
                .collect();
            if !drums.is_empty() {
                // Five parked flippers beat on the same tick at crowd intensity
                assert_eq!(drums.len(), 5);
                for intensity in drums {
                    assert!((intensity - 1.0).abs() < 1e-6);
                }
                beat_ticks.push(t);
            }
            let pulses = state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyPulse { .. }))
                .count();
            if pulses > 0 {
                assert_eq!(pulses, 5);
                pulse_ticks.push(t);
            }
        }

        // Five live enemies put the drum interval at 400 ms, 24 ticks
        assert_eq!(beat_ticks.len(), 3);
        assert!(
            (23..=25).contains(&beat_ticks[0]),
            "first beat at tick {}",
            beat_ticks[0]
        );
        for pair in beat_ticks.windows(2) {
            let gap = pair[1] - pair[0];
            assert!((23..=25).contains(&gap), "beat gap {gap} ticks");
        }
        // The 800 ms idle pulse lands once inside the window
        assert_eq!(pulse_ticks.len(), 1);
        assert!(
            (47..=49).contains(&pulse_ticks[0]),
            "pulse at tick {}",
            pulse_ticks[0]
        );
    }

    #[test]
    fn test_flipper_reaching_player_lane_destroys_the_claw() {
        let mut state = playing_state();
        state.enemies.push(flipper(0.5, 0.999, 0.005));
        tick(&mut state, TickInput::default());
        assert_eq!(state.phase, GamePhase::PlayerDying);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player_fragments.len(), 12);
        assert!(state.events.contains(&GameEvent::PlayerExploded));
    }

    #[test]
    fn test_spike_carrier_on_the_rim_ends_the_run() {
        let mut state = playing_state();
        let mut carrier = flipper(6.5, 0.999, 0.005);
        carrier.kind = EnemyKind::SpikeWeak;
        state.enemies.push(carrier);
        tick(&mut state, TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_long_spike_catches_a_low_claw() {
        let mut state = playing_state();
        state.spikes.push(Spike {
            segment: 0,
            length: 0.6,
            target_length: 0.6,
            growing: false,
            hit_count: 0,
        });

        // On the rim the claw clears the spike tip
        tick(&mut state, TickInput::default());
        assert_eq!(state.lives, 3);

        state.player.position = 0.6;
        tick(&mut state, TickInput::default());
        assert_eq!(state.lives, 2);
        assert!((state.player.position - 1.0).abs() < 1e-6);
        // The spike survives the hit
        assert_eq!(state.spikes.len(), 1);
    }

    #[test]
    fn test_spikes_grow_then_hold_at_target() {
        let mut state = playing_state();
        state.spikes.push(Spike {
            segment: 8,
            length: 0.0,
            target_length: 0.05,
            growing: true,
            hit_count: 0,
        });
        for _ in 0..10 {
            tick(&mut state, TickInput::default());
        }
        let spike = &state.spikes[0];
        assert!(!spike.growing);
        assert!((spike.length - 0.05).abs() < 1e-6);
        assert!(spike.length <= MAX_SPIKE_LENGTH);
    }

    #[test]
    fn test_landed_block_stacks_on_the_rim() {
        let mut state = playing_state();
        state.falling_blocks.push(FallingBlock {
            segment: 3,
            position: 0.999,
            speed: 0.004,
            width: 1.0,
            color: 0x00ffff,
            dead: false,
        });
        tick(&mut state, TickInput::default());
        assert!(state.falling_blocks.is_empty());
        assert_eq!(state.rim_blocks.len(), 1);
        assert_eq!(state.rim_blocks[0].segment, 3);
        assert_eq!(state.rim_blocks[0].height, 0);
        assert!(state.events.contains(&GameEvent::BlockLanded));

        // A second landing in the same lane stacks one band higher
        state.falling_blocks.push(FallingBlock {
            segment: 3,
            position: 0.999,
            speed: 0.004,
            width: 1.0,
            color: 0x00ffff,
            dead: false,
        });
        tick(&mut state, TickInput::default());
        assert_eq!(state.rim_blocks.len(), 2);
        assert_eq!(state.rim_blocks[1].height, 1);
    }

    #[test]
    fn test_quiet_field_completes_the_level() {
        // Easy spawns are slow enough for the idle window to open
        let mut state = GameState::new(7, Difficulty::Easy);
        start_game(&mut state);
        state.frame_count = 700;
        state.enemy_spawn_timer = 220;

        tick(&mut state, TickInput::default());

        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.level, 2);
        assert_eq!(state.zappers, 2);

        // Ride the transition out, then a fire press goes live
        let mut guard = 0;
        while state.phase == GamePhase::LevelComplete {
            tick(&mut state, TickInput::default());
            guard += 1;
            assert!(guard < 500, "transition never finished");
        }
        assert_eq!(state.phase, GamePhase::LevelReady);
        assert_eq!(state.geometry.segments, 4);

        tick(&mut state, held(|i| i.fire = true));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.frame_count, 0);
        assert!(state.events.contains(&GameEvent::MusicStarted));
    }

    #[test]
    fn test_claw_steers_during_level_ready() {
        let mut state = playing_state();
        state.phase = GamePhase::LevelReady;
        tick(&mut state, held(|i| i.left = true));
        // The step lands and the same press releases the hold
        assert_eq!(state.player.segment, 11);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.contains(&GameEvent::MusicStarted));
    }

    #[test]
    fn test_active_field_holds_the_level_open() {
        let mut state = GameState::new(7, Difficulty::Easy);
        start_game(&mut state);
        state.frame_count = 700;
        state.enemy_spawn_timer = 220;
        state.rim_blocks.push(RimBlock {
            segment: 5,
            color: 0x00ffff,
            height: 0,
        });
        tick(&mut state, TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_autopilot_runs_are_deterministic() {
        let mut a = GameState::new(42, Difficulty::Medium);
        let mut b = GameState::new(42, Difficulty::Medium);
        let input = held(|i| i.autopilot = true);
        for _ in 0..3000 {
            tick(&mut a, input);
            tick(&mut b, input);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.level, b.level);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player.segment, b.player.segment);
        assert_eq!(a.enemies, b.enemies);
        assert_eq!(a.bullets, b.bullets);
    }

    #[test]
    fn test_autopilot_leaves_the_title_screen() {
        let mut state = GameState::new(5, Difficulty::Medium);
        let input = held(|i| i.autopilot = true);
        for _ in 0..4 {
            tick(&mut state, input);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    proptest! {
        #[test]
        fn prop_misses_never_underflow_score(start in 0u32..4, misses in 1usize..12) {
            let mut state = GameState::new(3, Difficulty::Medium);
            start_game(&mut state);
            state.score = start;
            for i in 0..misses {
                state.bullets.push(Bullet::new(1000 + i as u32, 0.5, 0.01));
                tick(&mut state, TickInput::default());
            }
            prop_assert_eq!(state.score, start.saturating_sub(misses as u32));
        }
    }
}
