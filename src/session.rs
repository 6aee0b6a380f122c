//! Session / UI controller
//!
//! Owns the simulation and decides when it runs: menu, playing, game over.
//! Talks to the simulation only through `reset`, `tick`, snapshots and events.

use crate::highscores::{HighScores, RunRecord};
use crate::sim::{GameEvent, GameState, Playfield, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Playing,
    GameOver,
}

/// One player's stay at the cabinet
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    mode: Mode,
    high_scores: HighScores,
    /// Final score of the most recent run
    last_score: u64,
    /// Rank the most recent run earned, if any
    last_rank: Option<usize>,
}

impl Session {
    pub fn new(playfield: Playfield, tuning: Tuning, seed: u64) -> Self {
        Self {
            state: GameState::new(playfield, tuning, seed),
            mode: Mode::Menu,
            high_scores: HighScores::new(),
            last_score: 0,
            last_rank: None,
        }
    }

    /// Start a fresh run from the menu or the game-over screen
    pub fn start(&mut self, seed: u64) {
        if self.mode == Mode::Playing {
            log::warn!("start() ignored: a run is already in progress");
            return;
        }
        self.state.reseed(seed);
        self.state.reset();
        self.mode = Mode::Playing;
        self.last_rank = None;
        log::info!("Run started (seed {})", seed);
    }

    /// Back to the title screen after a game over
    pub fn to_menu(&mut self) {
        if self.mode == Mode::GameOver {
            self.mode = Mode::Menu;
            log::info!("Returned to menu");
        }
    }

    /// Run one frame. The simulation only advances while playing.
    pub fn frame(&mut self, input: &TickInput) -> Vec<GameEvent> {
        if self.mode != Mode::Playing {
            return Vec::new();
        }

        let events = tick(&mut self.state, input);
        for event in &events {
            if let GameEvent::GameOver { score } = *event {
                self.finish_run(score);
            }
        }
        events
    }

    fn finish_run(&mut self, score: u64) {
        self.mode = Mode::GameOver;
        self.last_score = score;
        self.last_rank = self.high_scores.record(RunRecord {
            score,
            game_speed: self.state.game_speed,
            frames: self.state.frame,
        });
        match self.last_rank {
            Some(1) => log::info!("New high score: {}", score),
            Some(rank) => log::info!("Score {} ranked #{}", score, rank),
            None => log::info!("Score {}", score),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    pub fn playfield(&self) -> Playfield {
        self.state.playfield
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Best score across every run in this session
    pub fn best_score(&self) -> u64 {
        self.high_scores.best()
    }

    pub fn last_score(&self) -> u64 {
        self.last_score
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }
}
