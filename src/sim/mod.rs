//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame, timers counted in frames
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod particles;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, overlaps};
pub use spawn::{spawn_shape, split_fragments};
pub use state::{
    FrameTimers, GameEvent, GamePhase, GameState, MAX_PARTICLES, Particle, Player, Playfield,
    Shape, ShapeKind, Snapshot, palette,
};
pub use tick::{TickInput, tick};
