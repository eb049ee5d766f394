//! Data-driven balance tables
//!
//! Difficulty presets, enemy stats, the level shape rotation, and the
//! color palettes. Gameplay code reads everything through the lookup
//! functions here so balance changes never touch the simulation.

use std::f32::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::sim::geometry::{ShapeKind, ShapeSpec};
use crate::sim::state::{EnemyKind, EnemyShape};

/// Difficulty preset selected in the settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Insane,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "insane" => Some(Difficulty::Insane),
            _ => None,
        }
    }
}

/// Spawn pacing and speed scaling for one difficulty preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyPreset {
    /// Ticks between enemy spawns
    pub enemy_spawn_rate: u32,
    /// Ticks between falling block spawns
    pub block_spawn_rate: u32,
    /// Multiplier on every enemy's climb speed
    pub enemy_speed: f32,
    /// Multiplier on every falling block's speed
    pub block_speed: f32,
    /// Lives at the start of a run
    pub lives: u32,
}

pub const fn preset(difficulty: Difficulty) -> DifficultyPreset {
    match difficulty {
        Difficulty::Easy => DifficultyPreset {
            enemy_spawn_rate: 240,
            block_spawn_rate: 90,
            enemy_speed: 1.0,
            block_speed: 1.0,
            lives: 5,
        },
        Difficulty::Medium => DifficultyPreset {
            enemy_spawn_rate: 180,
            block_spawn_rate: 75,
            enemy_speed: 1.3,
            block_speed: 1.2,
            lives: 3,
        },
        Difficulty::Hard => DifficultyPreset {
            enemy_spawn_rate: 120,
            block_spawn_rate: 60,
            enemy_speed: 1.6,
            block_speed: 1.5,
            lives: 3,
        },
        Difficulty::Insane => DifficultyPreset {
            enemy_spawn_rate: 80,
            block_spawn_rate: 40,
            enemy_speed: 2.0,
            block_speed: 1.8,
            lives: 2,
        },
    }
}

/// Per-kind base stats, before level and shape scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    /// Radial climb per tick
    pub base_speed: f32,
    /// Score for a kill
    pub points: u32,
    /// Kind health bonus, 0 for kinds that rely on shape health alone
    pub base_health: u32,
}

pub const fn enemy_stats(kind: EnemyKind) -> EnemyStats {
    match kind {
        EnemyKind::Flipper => EnemyStats {
            base_speed: 0.005,
            points: 150,
            base_health: 0,
        },
        EnemyKind::Tanker => EnemyStats {
            base_speed: 0.003,
            points: 250,
            base_health: 0,
        },
        EnemyKind::Spiker => EnemyStats {
            base_speed: 0.007,
            points: 100,
            base_health: 0,
        },
        EnemyKind::SpikeWeak => EnemyStats {
            base_speed: 0.004,
            points: 200,
            base_health: 2,
        },
        EnemyKind::SpikeMedium => EnemyStats {
            base_speed: 0.003,
            points: 400,
            base_health: 3,
        },
        EnemyKind::SpikeStrong => EnemyStats {
            base_speed: 0.002,
            points: 600,
            base_health: 4,
        },
        EnemyKind::SpikeBoss => EnemyStats {
            base_speed: 0.0015,
            points: 1000,
            base_health: 6,
        },
    }
}

/// Extra hits granted by an enemy's rendered shape
pub const fn shape_health(shape: EnemyShape) -> u32 {
    match shape {
        EnemyShape::Square => 1,
        EnemyShape::Triangle => 2,
        EnemyShape::Octagon => 3,
        EnemyShape::Pentagon => 4,
        EnemyShape::RotatingCube => 5,
    }
}

/// All shapes an enemy can spawn with, picked uniformly
pub const ENEMY_SHAPES: [EnemyShape; 5] = [
    EnemyShape::Square,
    EnemyShape::Triangle,
    EnemyShape::Octagon,
    EnemyShape::Pentagon,
    EnemyShape::RotatingCube,
];

/// Enemy palette as 0xRRGGBB
pub const ENEMY_COLORS: [u32; 9] = [
    0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff, 0xff8800, 0xff0088, 0x8800ff,
];

/// Falling block palette as 0xRRGGBB
pub const BLOCK_COLORS: [u32; 7] = [
    0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff, 0xff8800,
];

pub const PLAYER_COLOR: u32 = 0xffff00;

/// Tube cross-sections, cycled as levels advance
pub static LEVEL_SHAPES: [ShapeSpec; 10] = [
    ShapeSpec {
        kind: ShapeKind::WideRectangle,
        segments: 12,
        name: "Wide Rectangle",
        rotation: FRAC_PI_4,
    },
    ShapeSpec {
        kind: ShapeKind::Square,
        segments: 4,
        name: "Square",
        rotation: 0.0,
    },
    ShapeSpec {
        kind: ShapeKind::Circle,
        segments: 6,
        name: "Circle",
        rotation: 0.0,
    },
    ShapeSpec {
        kind: ShapeKind::Hexagon,
        segments: 6,
        name: "Hexagon",
        rotation: 0.0,
    },
    ShapeSpec {
        kind: ShapeKind::Octagon,
        segments: 8,
        name: "Octagon",
        rotation: 0.0,
    },
    ShapeSpec {
        kind: ShapeKind::Circle,
        segments: 8,
        name: "Circle",
        rotation: 0.0,
    },
    ShapeSpec {
        kind: ShapeKind::Star,
        segments: 10,
        name: "Star",
        rotation: 0.0,
    },
    ShapeSpec {
        kind: ShapeKind::Circle,
        segments: 12,
        name: "Circle",
        rotation: 0.0,
    },
    ShapeSpec {
        kind: ShapeKind::Figure8,
        segments: 12,
        name: "Figure 8",
        rotation: 0.0,
    },
    ShapeSpec {
        kind: ShapeKind::Plus,
        segments: 16,
        name: "Plus",
        rotation: 0.0,
    },
];

/// Tube shape for a 1-based level number, cycling past level 10
pub fn level_shape(level: u32) -> &'static ShapeSpec {
    let index = level.saturating_sub(1) as usize % LEVEL_SHAPES.len();
    &LEVEL_SHAPES[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_round_trip() {
        for d in [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Insane,
        ] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_presets_get_harder() {
        let easy = preset(Difficulty::Easy);
        let insane = preset(Difficulty::Insane);
        assert!(insane.enemy_spawn_rate < easy.enemy_spawn_rate);
        assert!(insane.block_spawn_rate < easy.block_spawn_rate);
        assert!(insane.enemy_speed > easy.enemy_speed);
        assert!(insane.lives < easy.lives);
    }

    #[test]
    fn test_level_shapes_cycle() {
        assert_eq!(level_shape(1).kind, ShapeKind::WideRectangle);
        assert_eq!(level_shape(1).segments, 12);
        assert_eq!(level_shape(10).kind, ShapeKind::Plus);
        // Level 11 wraps back to the first shape
        assert_eq!(level_shape(11).kind, ShapeKind::WideRectangle);
        assert_eq!(level_shape(23).kind, level_shape(3).kind);
    }

    #[test]
    fn test_spike_boss_is_toughest() {
        let boss = enemy_stats(EnemyKind::SpikeBoss);
        for kind in [
            EnemyKind::Flipper,
            EnemyKind::Tanker,
            EnemyKind::Spiker,
            EnemyKind::SpikeWeak,
            EnemyKind::SpikeMedium,
            EnemyKind::SpikeStrong,
        ] {
            let stats = enemy_stats(kind);
            assert!(boss.points > stats.points);
            assert!(boss.base_speed <= stats.base_speed);
            assert!(boss.base_health >= stats.base_health);
        }
    }
}
