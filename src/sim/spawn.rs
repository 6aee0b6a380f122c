//! Shape factory
//!
//! Picks what falls next and builds it from the current difficulty.

use rand::Rng;

use super::state::{Playfield, Shape, ShapeKind};
use crate::tuning::{SpawnWeights, SplitterTuning, Tuning};

impl ShapeKind {
    /// Map a uniform roll in [0, 1) onto the weighted spawn buckets.
    /// Never yields Boss; rolls past the last bucket land on Bonus.
    pub fn from_roll(roll: f32, weights: &SpawnWeights) -> ShapeKind {
        let mut upper = 0.0;
        for (kind, weight) in weights.buckets() {
            upper += weight;
            if roll < upper {
                return kind;
            }
        }
        ShapeKind::Bonus
    }
}

/// Build a shape just above the top edge.
///
/// With `kind == None` the kind is drawn from the spawn weights. The RNG is
/// consumed in a fixed order (kind roll, then x) so seeded runs replay exactly.
pub fn spawn_shape<R: Rng + ?Sized>(
    kind: Option<ShapeKind>,
    game_speed: f32,
    playfield: &Playfield,
    tuning: &Tuning,
    rng: &mut R,
) -> Shape {
    let kind = kind.unwrap_or_else(|| ShapeKind::from_roll(rng.random(), &tuning.spawn_weights));
    let size = tuning.size_of(kind);
    let x = rng.random::<f32>() * (playfield.width - size).max(0.0);

    Shape {
        kind,
        x,
        y: -size,
        size,
        speed: tuning.fall_speed(kind, game_speed),
        rotation: 0.0,
        rotation_speed: tuning.rotation_speed_of(kind),
        has_split: false,
        color: kind.color(),
    }
}

/// Break a Splitter into a row of Cube fragments centered on its x.
///
/// Fragments keep the parent's y, rotation and spin, fall faster, and are
/// flagged as already split.
pub fn split_fragments(parent: &Shape, splitter: &SplitterTuning) -> Vec<Shape> {
    let count = splitter.fragments;
    let middle = count.saturating_sub(1) as f32 / 2.0;

    (0..count)
        .map(|j| Shape {
            kind: ShapeKind::Cube,
            x: parent.x + (j as f32 - middle) * splitter.spacing,
            y: parent.y,
            size: splitter.fragment_size,
            speed: parent.speed * splitter.speed_factor,
            rotation: parent.rotation,
            rotation_speed: parent.rotation_speed,
            has_split: true,
            color: parent.color,
        })
        .collect()
}
