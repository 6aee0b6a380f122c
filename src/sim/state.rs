//! Game state and core simulation types
//!
//! Everything a frame step reads or writes lives in [`GameState`]. Renderers
//! and the session layer look at it through [`Snapshot`] and [`GameEvent`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// Maximum live particles; older ones are dropped first
pub const MAX_PARTICLES: usize = 256;

/// Packed 0xRRGGBB colors
pub mod palette {
    pub const CYAN: u32 = 0x00ffff;
    pub const MAGENTA: u32 = 0xff00ff;
    pub const YELLOW: u32 = 0xffff00;
    pub const HOT_PINK: u32 = 0xff0088;
    pub const MINT: u32 = 0x00ff88;
    pub const WHITE: u32 = 0xffffff;
    pub const RED: u32 = 0xff0000;
    pub const PLAYER: u32 = CYAN;
}

/// Size of the drawing surface, fixed for the duration of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    /// Callers must pass positive dimensions
    pub fn new(width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0, "playfield must be non-empty");
        Self { width, height }
    }

    #[inline]
    pub fn midpoint_y(&self) -> f32 {
        self.height / 2.0
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(crate::consts::DESKTOP_WIDTH, crate::consts::DESKTOP_HEIGHT)
    }
}

/// Simulation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created but never started
    #[default]
    Idle,
    /// Frame steps advance the simulation
    Active,
    /// Player was hit; frozen until the next reset
    Over,
}

/// Falling shape variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Cube,
    Spike,
    Disc,
    Cross,
    /// Bursts into Cube fragments at the playfield midpoint
    Splitter,
    /// Harmless star worth points
    Bonus,
    /// Big slow block from the boss timer
    Boss,
}

impl ShapeKind {
    /// Display color (presentation only)
    pub fn color(self) -> u32 {
        use palette::*;
        match self {
            ShapeKind::Cube => CYAN,
            ShapeKind::Spike => MAGENTA,
            ShapeKind::Disc => YELLOW,
            ShapeKind::Cross => HOT_PINK,
            ShapeKind::Splitter => MINT,
            ShapeKind::Bonus => WHITE,
            ShapeKind::Boss => RED,
        }
    }

    /// Touching this kind ends the run
    pub fn is_hazard(self) -> bool {
        self != ShapeKind::Bonus
    }
}

/// The player's block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per frame
    pub speed: f32,
    pub color: u32,
}

impl Player {
    /// Centered horizontally, resting just above the bottom edge
    pub fn spawn(playfield: &Playfield, tuning: &Tuning) -> Self {
        let size = tuning.player_size;
        Self {
            x: (playfield.width - size) / 2.0,
            y: playfield.height - tuning.player_bottom_offset,
            width: size,
            height: size,
            speed: tuning.player_speed,
            color: palette::PLAYER,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Rightmost legal x for this playfield
    pub fn max_x(&self, playfield: &Playfield) -> f32 {
        (playfield.width - self.width).max(0.0)
    }
}

/// A falling obstacle or pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub x: f32,
    pub y: f32,
    /// Width and height (shapes are square)
    pub size: f32,
    /// Pixels per frame
    pub speed: f32,
    /// Radians
    pub rotation: f32,
    /// Radians per frame
    pub rotation_speed: f32,
    /// Set once a Splitter has burst (fragments inherit it)
    pub has_split: bool,
    pub color: u32,
}

impl Shape {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Fall and spin one frame
    pub fn advance(&mut self) {
        self.y += self.speed;
        self.rotation += self.rotation_speed;
    }

    /// Splitter that has not burst yet and is past the midpoint
    pub fn ready_to_split(&self, playfield: &Playfield) -> bool {
        self.kind == ShapeKind::Splitter && !self.has_split && self.y > playfield.midpoint_y()
    }
}

/// A particle for visual feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 0-1, decreases every frame
    pub size: f32,
    pub color: u32,
}

/// Frame counters driving the periodic rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameTimers {
    pub spawn: u32,
    pub boss: u32,
    pub survival: u32,
    pub difficulty: u32,
}

/// Things that happened during a frame step, for sound, HUD and session code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BossSpawned,
    SplitterBurst { x: f32, y: f32 },
    BonusCollected { points: u64, combo: u32 },
    ShapeDodged { kind: ShapeKind, combo: u32 },
    /// Floored score changed
    ScoreChanged(u64),
    /// Fired once per run with the final floored score
    GameOver { score: u64 },
}

fn unseeded_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed of the current RNG stream
    pub seed: u64,
    #[serde(skip, default = "unseeded_rng")]
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub playfield: Playfield,
    pub phase: GamePhase,
    pub player: Player,
    /// In spawn order
    pub shapes: Vec<Shape>,
    pub particles: Vec<Particle>,
    /// Raw accumulator; everything outside the sim sees it floored
    pub score: f64,
    /// Multiplier, never below 1
    pub combo: u32,
    pub timers: FrameTimers,
    pub game_speed: f32,
    /// Frames between random spawns
    pub spawn_interval: u32,
    /// Frames stepped since the last reset
    pub frame: u64,
    pub last_dodge_frame: Option<u64>,
    published_score: u64,
}

impl GameState {
    /// Create an idle game; call [`GameState::reset`] to start playing
    pub fn new(playfield: Playfield, tuning: Tuning, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::spawn(&playfield, &tuning),
            game_speed: tuning.initial_game_speed,
            spawn_interval: tuning.initial_spawn_interval,
            tuning,
            playfield,
            phase: GamePhase::Idle,
            shapes: Vec::new(),
            particles: Vec::new(),
            score: 0.0,
            combo: 1,
            timers: FrameTimers::default(),
            frame: 0,
            last_dodge_frame: None,
            published_score: 0,
        }
    }

    /// Restart the RNG stream from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Start a fresh run. The only way out of `Idle` or `Over`.
    pub fn reset(&mut self) {
        self.player = Player::spawn(&self.playfield, &self.tuning);
        self.shapes.clear();
        self.particles.clear();
        self.score = 0.0;
        self.combo = 1;
        self.timers = FrameTimers::default();
        self.game_speed = self.tuning.initial_game_speed;
        self.spawn_interval = self.tuning.initial_spawn_interval;
        self.frame = 0;
        self.last_dodge_frame = None;
        self.published_score = 0;
        self.phase = GamePhase::Active;
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Score as shown to the player
    #[inline]
    pub fn floored_score(&self) -> u64 {
        self.score.floor() as u64
    }

    /// Returns the floored score if it moved since the last call
    pub(crate) fn take_score_change(&mut self) -> Option<u64> {
        let score = self.floored_score();
        if score != self.published_score {
            self.published_score = score;
            Some(score)
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            player: self.player.rect(),
            player_color: self.player.color,
            shapes: &self.shapes,
            particles: &self.particles,
            score: self.floored_score(),
            combo: self.combo,
            game_speed: self.game_speed,
            spawn_interval: self.spawn_interval,
            phase: self.phase,
        }
    }
}

/// Read-only view of a frame for presentation and session code
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub player: Rect,
    pub player_color: u32,
    pub shapes: &'a [Shape],
    pub particles: &'a [Particle],
    pub score: u64,
    pub combo: u32,
    pub game_speed: f32,
    pub spawn_interval: u32,
    pub phase: GamePhase,
}

impl Snapshot<'_> {
    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::Over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Playfield::new(800.0, 600.0), Tuning::default(), 7)
    }

    #[test]
    fn test_new_state_is_idle() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Idle);
        assert_eq!(s.combo, 1);
        assert!(s.shapes.is_empty());
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut s = state();
        s.reset();
        s.score = 321.7;
        s.combo = 6;
        s.game_speed = 4.0;
        s.spawn_interval = 20;
        s.timers = FrameTimers {
            spawn: 3,
            boss: 500,
            survival: 12,
            difficulty: 100,
        };
        s.player.x = 0.0;
        s.phase = GamePhase::Over;
        s.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ONE,
            life: 0.5,
            size: 3.0,
            color: palette::WHITE,
        });

        s.reset();
        assert_eq!(s.phase, GamePhase::Active);
        assert_eq!(s.game_speed, 1.5);
        assert_eq!(s.spawn_interval, 45);
        assert_eq!(s.timers, FrameTimers::default());
        assert!(s.shapes.is_empty());
        assert!(s.particles.is_empty());
        assert_eq!(s.score, 0.0);
        assert_eq!(s.combo, 1);
        assert_eq!(s.player.x, 380.0);
        assert_eq!(s.player.y, 540.0);
    }

    #[test]
    fn test_snapshot_floors_score() {
        let mut s = state();
        s.reset();
        s.score = 12.9;
        let snap = s.snapshot();
        assert_eq!(snap.score, 12);
        assert!(!snap.game_over());
        assert_eq!(snap.player, Rect::new(380.0, 540.0, 40.0, 40.0));
    }

    #[test]
    fn test_score_change_reported_once() {
        let mut s = state();
        s.reset();
        assert_eq!(s.take_score_change(), None);
        s.score = 3.5;
        assert_eq!(s.take_score_change(), Some(3));
        assert_eq!(s.take_score_change(), None);
    }

    #[test]
    fn test_only_bonus_is_harmless() {
        for kind in [
            ShapeKind::Cube,
            ShapeKind::Spike,
            ShapeKind::Disc,
            ShapeKind::Cross,
            ShapeKind::Splitter,
            ShapeKind::Boss,
        ] {
            assert!(kind.is_hazard(), "{:?}", kind);
        }
        assert!(!ShapeKind::Bonus.is_hazard());
        assert_eq!(ShapeKind::Bonus.color(), palette::WHITE);
    }

    #[test]
    fn test_splitter_ready_only_past_midpoint() {
        let pf = Playfield::new(800.0, 600.0);
        let mut shape = Shape {
            kind: ShapeKind::Splitter,
            x: 100.0,
            y: 300.0,
            size: 40.0,
            speed: 5.0,
            rotation: 0.0,
            rotation_speed: 0.03,
            has_split: false,
            color: ShapeKind::Splitter.color(),
        };
        assert!(!shape.ready_to_split(&pf));
        shape.advance();
        assert!(shape.ready_to_split(&pf));
        shape.has_split = true;
        assert!(!shape.ready_to_split(&pf));
    }

    #[test]
    fn test_state_serializes_without_rng() {
        let mut s = state();
        s.reset();
        let json = serde_json::to_string(&s).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::Active);
        assert_eq!(back.spawn_interval, s.spawn_interval);
    }
}
