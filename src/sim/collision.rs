//! Bullet collision resolution and rim bookkeeping

use super::state::{GameEvent, GameState};
use crate::consts::{ENEMY_DEATH_SPEED, RIM_OVERFLOW_HEIGHT};
use crate::segment_distance;

/// Resolve all bullet collisions for this tick.
///
/// Three passes in a fixed order: enemies, then falling blocks, then
/// spikes. A bullet is spent on the first enemy or block it strikes. A
/// spike hit chips the spike and lets the bullet fly on.
pub fn resolve_collisions(state: &mut GameState) {
    bullets_vs_enemies(state);
    bullets_vs_blocks(state);
    bullets_vs_spikes(state);
}

fn bullets_vs_enemies(state: &mut GameState) {
    let segments = state.geometry.segments;
    let mut i = 0;
    while i < state.bullets.len() {
        let bullet = state.bullets[i];
        let mut consumed = false;
        for enemy in state.enemies.iter_mut() {
            if enemy.dead || enemy.dying {
                continue;
            }
            if segment_distance(bullet.segment, enemy.segment, segments) >= 0.6 {
                continue;
            }
            if (bullet.position - enemy.position).abs() >= 0.05 {
                continue;
            }
            enemy.health = enemy.health.saturating_sub(1);
            if enemy.health == 0 {
                enemy.dying = true;
                enemy.death_speed = ENEMY_DEATH_SPEED;
                state.score += enemy.points;
                state.events.push(GameEvent::Explosion);
            } else {
                state.score += enemy.points / 5;
                state.events.push(GameEvent::Hit);
            }
            state.events.push(GameEvent::ShotEnded { id: bullet.id });
            consumed = true;
            break;
        }
        if consumed {
            state.bullets.remove(i);
        } else {
            i += 1;
        }
    }
}

fn bullets_vs_blocks(state: &mut GameState) {
    let mut i = 0;
    while i < state.bullets.len() {
        let bullet = state.bullets[i];
        let lane = bullet.segment.floor() as u32;
        let mut consumed = false;
        for j in 0..state.falling_blocks.len() {
            let block = state.falling_blocks[j];
            if block.dead || block.segment != lane {
                continue;
            }
            if (bullet.position - block.position).abs() >= 0.08 {
                continue;
            }
            state.falling_blocks.remove(j);
            state.score += 50;
            state.events.push(GameEvent::ShotEnded { id: bullet.id });
            state.events.push(GameEvent::BlockHit);
            consumed = true;
            break;
        }
        if consumed {
            state.bullets.remove(i);
        } else {
            i += 1;
        }
    }
}

fn bullets_vs_spikes(state: &mut GameState) {
    for bullet in state.bullets.iter_mut() {
        let lane = bullet.segment.floor() as u32;
        for j in 0..state.spikes.len() {
            let spike = &mut state.spikes[j];
            if spike.segment != lane {
                continue;
            }
            if bullet.position > 1.0 || bullet.position < 1.0 - spike.length {
                continue;
            }
            bullet.hit_something = true;
            spike.hit_count += 1;
            // Every tenth hit forces a retraction
            if spike.hit_count >= 10 {
                spike.target_length = (spike.target_length - 0.15).max(0.0);
                spike.length = spike.length.min(spike.target_length);
                spike.hit_count = 0;
                let collapsed = spike.target_length <= 0.05;
                state.score += 25;
                state.events.push(GameEvent::Hit);
                if collapsed {
                    state.spikes.remove(j);
                    state.score += 50;
                }
            }
            break;
        }
    }
}

/// A fully capped rim clears like a finished line, paying out per block.
pub fn check_rim_complete(state: &mut GameState) {
    let mut counts = vec![0u32; state.geometry.segments as usize];
    for block in &state.rim_blocks {
        counts[block.segment as usize] += 1;
    }
    if counts.iter().all(|&c| c > 0) {
        state.score += state.rim_blocks.len() as u32 * 100;
        state.rim_blocks.clear();
        state.events.push(GameEvent::RimCleared);
    }
}

/// A stack at the overflow height costs a life and knocks out the oldest
/// third of the landed blocks.
pub fn check_block_overflow(state: &mut GameState) {
    let mut counts = vec![0u32; state.geometry.segments as usize];
    for block in &state.rim_blocks {
        counts[block.segment as usize] += 1;
    }
    if counts.iter().any(|&c| c >= RIM_OVERFLOW_HEIGHT) {
        state.lose_life();
        let drop = state.rim_blocks.len() / 3;
        state.rim_blocks.drain(0..drop);
        state.events.push(GameEvent::Hit);
    }
}
