//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be replayed or rebalanced
//! from a JSON blob. Missing fields fall back to the shipped defaults.

use serde::{Deserialize, Serialize};

use crate::sim::ShapeKind;

/// Relative odds of each randomly spawned shape kind.
///
/// Weights are consumed as cumulative buckets over a uniform roll in [0, 1),
/// so they should sum to 1.0. Boss has no weight: it only arrives on its timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    pub cube: f32,
    pub spike: f32,
    pub disc: f32,
    pub cross: f32,
    pub splitter: f32,
    pub bonus: f32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            cube: 0.30,
            spike: 0.20,
            disc: 0.15,
            cross: 0.15,
            splitter: 0.15,
            bonus: 0.05,
        }
    }
}

impl SpawnWeights {
    /// Buckets in roll order
    pub fn buckets(&self) -> [(ShapeKind, f32); 6] {
        [
            (ShapeKind::Cube, self.cube),
            (ShapeKind::Spike, self.spike),
            (ShapeKind::Disc, self.disc),
            (ShapeKind::Cross, self.cross),
            (ShapeKind::Splitter, self.splitter),
            (ShapeKind::Bonus, self.bonus),
        ]
    }
}

/// How a Splitter breaks apart at the playfield midpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterTuning {
    pub fragments: u32,
    pub fragment_size: f32,
    /// Horizontal distance between neighbouring fragments
    pub spacing: f32,
    /// Fragment fall speed relative to the parent
    pub speed_factor: f32,
}

impl Default for SplitterTuning {
    fn default() -> Self {
        Self {
            fragments: 5,
            fragment_size: 20.0,
            spacing: 25.0,
            speed_factor: 1.8,
        }
    }
}

/// Burst emitted on pickups and on the fatal hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub count: u32,
    /// Velocity components are drawn from [-max_speed, max_speed)
    pub max_speed: f32,
    /// Life lost per frame (life starts at 1.0)
    pub life_decay: f32,
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            count: 15,
            max_speed: 4.0,
            life_decay: 0.02,
            min_size: 2.0,
            max_size: 6.0,
        }
    }
}

/// Complete gameplay tuning. Distances are pixels, durations are frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_size: f32,
    /// Pixels per frame while a direction is held
    pub player_speed: f32,
    /// Distance from the player's top edge to the playfield bottom
    pub player_bottom_offset: f32,

    // === Shapes ===
    pub shape_size: f32,
    pub bonus_size: f32,
    pub boss_size: f32,
    pub base_fall_speed: f32,
    /// Extra fall speed per unit of game speed
    pub fall_speed_per_game_speed: f32,
    pub boss_speed_factor: f32,
    /// Radians per frame
    pub rotation_speed: f32,
    pub cross_rotation_speed: f32,
    pub spawn_weights: SpawnWeights,
    pub splitter: SplitterTuning,

    // === Difficulty ===
    pub initial_game_speed: f32,
    pub game_speed_step: f32,
    pub initial_spawn_interval: u32,
    pub spawn_interval_step: u32,
    pub min_spawn_interval: u32,
    pub difficulty_period: u32,
    pub boss_period: u32,

    // === Scoring ===
    pub survival_period: u32,
    pub survival_points: f64,
    pub bonus_points: f64,
    /// A dodge within this many frames of the previous one extends the combo
    pub combo_window_frames: u64,

    // === Effects ===
    pub particles: ParticleTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 40.0,
            player_speed: 7.0,
            player_bottom_offset: 60.0,

            shape_size: 40.0,
            bonus_size: 25.0,
            boss_size: 80.0,
            base_fall_speed: 3.5,
            fall_speed_per_game_speed: 0.8,
            boss_speed_factor: 0.8,
            rotation_speed: 0.03,
            cross_rotation_speed: 0.08,
            spawn_weights: SpawnWeights::default(),
            splitter: SplitterTuning::default(),

            initial_game_speed: 1.5,
            game_speed_step: 0.15,
            initial_spawn_interval: 45,
            spawn_interval_step: 3,
            min_spawn_interval: 20,
            difficulty_period: 240,
            boss_period: 720,

            survival_period: 60,
            survival_points: 1.0,
            bonus_points: 50.0,
            combo_window_frames: 120,

            particles: ParticleTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Edge length of a freshly spawned shape of `kind`
    pub fn size_of(&self, kind: ShapeKind) -> f32 {
        match kind {
            ShapeKind::Boss => self.boss_size,
            ShapeKind::Bonus => self.bonus_size,
            _ => self.shape_size,
        }
    }

    /// Rotation increment per frame for `kind`
    pub fn rotation_speed_of(&self, kind: ShapeKind) -> f32 {
        match kind {
            ShapeKind::Cross => self.cross_rotation_speed,
            _ => self.rotation_speed,
        }
    }

    /// Fall speed for a shape spawned at the given game speed
    pub fn fall_speed(&self, kind: ShapeKind, game_speed: f32) -> f32 {
        let base = self.base_fall_speed + game_speed * self.fall_speed_per_game_speed;
        match kind {
            ShapeKind::Boss => base * self.boss_speed_factor,
            _ => base,
        }
    }
}
