//! Level transitions, the pre-transition warning, and player destruction
//!
//! The transition is a fixed 378-frame script: lightning flashes, an intro
//! fanfare, then a cubic-eased descent into the next tube. Everything here
//! advances one frame per tick off `GameState::transition_frame`, with pure
//! accessors for the animation curves so hosts can draw any frame.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, TAU};

use glam::Vec2;
use rand::Rng;

use super::geometry::LevelGeometry;
use super::state::{
    BattleScar, GameEvent, GamePhase, GameState, PlayerFragment, ScarKind, Spark, TransitionStage,
};
use crate::segment_distance;
use crate::tuning;

/// Frames of lightning flashes at the front of the transition
pub const LIGHTNING_FRAMES: u32 = 18;
/// Frames of the intro fanfare
pub const INTRO_FRAMES: u32 = 120;
/// Frames of the descent into the next tube
pub const DESCENT_FRAMES: u32 = 240;
/// Full length of the transition script
pub const TRANSITION_FRAMES: u32 = LIGHTNING_FRAMES + INTRO_FRAMES + DESCENT_FRAMES;

/// Frames the pre-transition warning holds before the transition forces through
pub const WARNING_FRAMES: u32 = 120;
/// Frames of the player destruction animation
pub const PLAYER_DYING_FRAMES: u32 = 80;
/// Fragments the claw shatters into
pub const PLAYER_FRAGMENT_COUNT: u32 = 12;
/// Ticks a descent spark lives
pub const SPARK_LIFE: u32 = 30;

/// Advance to the next level.
///
/// Spawn pressure ratchets up first. If an enemy or spike is parked next
/// to the player the session holds in a warning phase instead of cutting
/// straight to the animation.
pub fn next_level(state: &mut GameState) {
    state.level += 1;
    state.zappers += 1;
    state.enemy_spawn_rate = state.enemy_spawn_rate.saturating_sub(20).max(90);
    state.block_spawn_rate = state.block_spawn_rate.saturating_sub(10).max(50);

    let danger = scan_danger_segments(state);
    if danger.is_empty() {
        start_transition(state);
    } else {
        state.danger_segments = danger;
        state.phase = GamePhase::TransitionWarning;
        state.warning_frame = 0;
    }
}

fn scan_danger_segments(state: &GameState) -> Vec<u32> {
    let segments = state.geometry.segments;
    let player = state.player.segment as f32;
    let mut danger = Vec::new();
    for enemy in &state.enemies {
        if enemy.dead || enemy.dying {
            continue;
        }
        if segment_distance(enemy.segment, player, segments) <= 1.0 && enemy.position >= 0.7 {
            danger.push(enemy.segment.floor() as u32);
        }
    }
    for spike in &state.spikes {
        if segment_distance(spike.segment as f32, player, segments) <= 1.0 {
            danger.push(spike.segment);
        }
    }
    danger
}

/// One frame of the pre-transition warning.
pub fn advance_warning(state: &mut GameState) {
    state.warning_frame += 1;
    if state.warning_frame >= WARNING_FRAMES {
        start_transition(state);
    }
}

/// Begin the scripted transition. Battle scars are rolled up front so the
/// descent has a worn tube to show.
pub fn start_transition(state: &mut GameState) {
    state.phase = GamePhase::LevelComplete;
    state.transition_frame = 0;
    state.danger_segments.clear();
    state.sparks.clear();
    state.battle_scars.clear();

    let scar_count = state.rng.random_range(10..=20);
    for _ in 0..scar_count {
        state.battle_scars.push(BattleScar {
            segment: state.rng.random_range(0..state.geometry.segments),
            position: state.rng.random_range(0.0..0.3),
            kind: if state.rng.random::<f32>() < 0.6 {
                ScarKind::Crack
            } else {
                ScarKind::Burn
            },
            angle: state.rng.random_range(FRAC_PI_6..FRAC_PI_2),
            size: state.rng.random_range(0.05..0.15),
        });
    }
}

/// Stage of the transition for a frame counter.
pub fn stage_for_frame(frame: u32) -> TransitionStage {
    if frame <= LIGHTNING_FRAMES {
        TransitionStage::Lightning
    } else if frame <= LIGHTNING_FRAMES + INTRO_FRAMES {
        TransitionStage::Intro
    } else {
        TransitionStage::Descent
    }
}

/// One frame of the transition animation.
pub fn advance_transition(state: &mut GameState) {
    state.transition_frame += 1;
    let frame = state.transition_frame;

    match stage_for_frame(frame) {
        TransitionStage::Lightning => {
            if frame == 1 || frame == 6 {
                state.events.push(GameEvent::LightningFlash { fade: false });
            } else if frame == 12 {
                state.events.push(GameEvent::LightningFlash { fade: true });
            }
        }
        TransitionStage::Intro => {
            if frame == LIGHTNING_FRAMES + 1 {
                state.events.push(GameEvent::TransitionIntro);
                state.events.push(GameEvent::MusicDucked { ducked: true });
            }
        }
        TransitionStage::Descent => {
            let descent_frame = frame - LIGHTNING_FRAMES - INTRO_FRAMES;
            if descent_frame % 10 == 0 {
                state.events.push(GameEvent::DescentWhoosh {
                    progress: descent_eased(descent_frame),
                });
            }
            // Sparks shower off the player's rim through the middle of the drop
            if (60..=200).contains(&descent_frame) && state.rng.random::<f32>() < 0.3 {
                spawn_descent_spark(state);
            }
            update_sparks(state);
        }
    }

    if frame >= TRANSITION_FRAMES {
        finish_transition(state);
    }
}

fn spawn_descent_spark(state: &mut GameState) {
    let origin = state
        .geometry
        .get_point(state.player.segment as f32 + 0.5, 1.0);
    let angle = state.rng.random::<f32>() * TAU;
    let speed = state.rng.random_range(2.0..4.0);
    let color = if state.rng.random::<f32>() < 0.5 {
        0xffffff
    } else {
        0xffff00
    };
    state.sparks.push(Spark {
        pos: origin,
        vel: Vec2::new(angle.cos(), angle.sin()) * speed,
        life: SPARK_LIFE,
        max_life: SPARK_LIFE,
        color,
    });
}

fn update_sparks(state: &mut GameState) {
    for spark in state.sparks.iter_mut() {
        spark.pos += spark.vel;
        spark.life = spark.life.saturating_sub(1);
    }
    state.sparks.retain(|s| s.life > 0);
}

/// Rebuild the tube for the new level and hand control back to the player.
fn finish_transition(state: &mut GameState) {
    state.geometry = LevelGeometry::new(tuning::level_shape(state.level));

    state.bullets.clear();
    state.events.push(GameEvent::AllShotsEnded);
    state.enemies.clear();
    state.falling_blocks.clear();
    state.rim_blocks.clear();
    state.spikes.clear();
    state.battle_scars.clear();
    state.sparks.clear();
    state.enemy_spawn_timer = 0;
    state.block_spawn_timer = 0;
    state.zap_sweep_ticks = 0;

    state.events.push(GameEvent::MusicDucked { ducked: false });
    state.phase = GamePhase::LevelReady;
    log::info!(
        "level {} ready: {} ({} segments)",
        state.level,
        state.geometry.name,
        state.geometry.segments
    );
}

/// Shatter the claw and start the death animation.
pub fn destroy_player(state: &mut GameState) {
    state.phase = GamePhase::PlayerDying;
    state.dying_frame = 0;

    let origin = state
        .geometry
        .get_point(state.player.segment as f32 + 0.5, 1.0);
    for i in 0..PLAYER_FRAGMENT_COUNT {
        let angle = i as f32 / PLAYER_FRAGMENT_COUNT as f32 * TAU;
        let speed = state.rng.random_range(2.0..5.0);
        state.player_fragments.push(PlayerFragment {
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            rotation: state.rng.random::<f32>() * TAU,
            rotation_speed: state.rng.random_range(-0.15..0.15),
            life: PLAYER_DYING_FRAMES,
            max_life: PLAYER_DYING_FRAMES,
            size: 8.0,
        });
    }
    state.events.push(GameEvent::PlayerExploded);
    state.events.push(GameEvent::MusicDucked { ducked: true });
}

/// One frame of the death animation. Ends in a respawn or the game over.
pub fn advance_player_dying(state: &mut GameState) {
    state.dying_frame += 1;
    for frag in state.player_fragments.iter_mut() {
        frag.pos += frag.vel;
        frag.rotation += frag.rotation_speed;
        frag.life = frag.life.saturating_sub(1);
    }
    state.player_fragments.retain(|f| f.life > 0);

    if state.dying_frame >= PLAYER_DYING_FRAMES {
        state.player_fragments.clear();
        state.lose_life();
        if state.phase != GamePhase::GameOver {
            state.phase = GamePhase::Playing;
            state.events.push(GameEvent::MusicDucked { ducked: false });
        }
    }
}

/// Overlay alpha of the lightning stage, 0 when no flash is showing.
pub fn lightning_alpha(frame: u32) -> f32 {
    match frame {
        1..=2 | 6..=7 => 0.95,
        12..=18 => {
            let fade = (frame - 12) as f32 / 11.0;
            0.95 * (1.0 - fade * fade)
        }
        _ => 0.0,
    }
}

/// Pulse of the danger-segment warning overlay, roughly 4 Hz.
pub fn warning_pulse(frame: u32) -> f32 {
    (frame as f32 / 7.5).sin() * 0.5 + 0.5
}

/// Brightness pulse of the intro fanfare.
pub fn intro_pulse(frame: u32) -> f32 {
    let intro_frame = frame.saturating_sub(LIGHTNING_FRAMES) as f32;
    (intro_frame / 5.0).sin() * 0.5 + 0.5
}

/// Zoom of the intro tunnel rays.
pub fn intro_zoom(frame: u32) -> f32 {
    let intro_frame = frame.saturating_sub(LIGHTNING_FRAMES) as f32;
    1.0 + (intro_frame / INTRO_FRAMES as f32) * 0.3
}

/// Cubic-eased progress of the descent, 0.0 at the top of the drop.
pub fn descent_eased(descent_frame: u32) -> f32 {
    let progress = (descent_frame as f32 / DESCENT_FRAMES as f32).clamp(0.0, 1.0);
    progress * progress * progress
}

/// How far the tube is pulled apart on a descent frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescentStretch {
    pub top: f32,
    pub bottom: f32,
    pub side: f32,
    /// Vertical shift of the whole tube, in view units
    pub fall_shift: f32,
}

/// Asymmetric stretch of the tube for a descent frame.
pub fn descent_stretch(descent_frame: u32) -> DescentStretch {
    let eased = descent_eased(descent_frame);
    DescentStretch {
        top: 1.0 + eased * 2.5,
        bottom: 1.0 + eased * 1.0,
        side: 1.0 + eased * 1.2,
        fall_shift: eased * 200.0,
    }
}
