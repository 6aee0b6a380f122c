//! Stack Attack - A neon reflex arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, scoring, game state)
//! - `session`: Menu / playing / game-over flow around the simulation
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences

pub mod highscores;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use session::{Mode, Session};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frames per second the simulation is tuned for (one tick per frame)
    pub const FRAME_RATE: u32 = 60;

    /// Desktop playfield
    pub const DESKTOP_WIDTH: f32 = 800.0;
    pub const DESKTOP_HEIGHT: f32 = 600.0;

    /// Viewports narrower than this get the mobile layout
    pub const MOBILE_BREAKPOINT: f64 = 768.0;
    /// Mobile playfield width cap
    pub const MOBILE_MAX_WIDTH: f64 = 600.0;
    /// Horizontal and vertical room left for page chrome on mobile
    pub const MOBILE_SIDE_MARGIN: f64 = 20.0;
    pub const MOBILE_HUD_MARGIN: f64 = 100.0;

    /// Background grid spacing (pixels)
    pub const GRID_SIZE: f32 = 40.0;
}

/// Playfield size for a browser viewport of the given inner size
pub fn playfield_for_viewport(inner_width: f64, inner_height: f64) -> sim::Playfield {
    use consts::*;

    if inner_width < MOBILE_BREAKPOINT {
        let width = (inner_width - MOBILE_SIDE_MARGIN).min(MOBILE_MAX_WIDTH);
        let height = inner_height - MOBILE_HUD_MARGIN;
        // Tiny or bogus viewports still get a usable field
        sim::Playfield::new(width.max(1.0) as f32, height.max(1.0) as f32)
    } else {
        sim::Playfield::new(DESKTOP_WIDTH, DESKTOP_HEIGHT)
    }
}

/// Full `class` attribute for a DOM element that keeps `base` while toggling `hidden`
pub fn hud_class(base: &str, visible: bool) -> String {
    match (base.is_empty(), visible) {
        (true, true) => String::new(),
        (true, false) => "hidden".to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{} hidden", base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hud_class_keeps_base() {
        assert_eq!(hud_class("overlay", true), "overlay");
        assert_eq!(hud_class("overlay", false), "overlay hidden");
        assert_eq!(hud_class("", true), "");
        assert_eq!(hud_class("", false), "hidden");
    }

    #[test]
    fn test_desktop_viewport() {
        let pf = playfield_for_viewport(1920.0, 1080.0);
        assert_eq!((pf.width, pf.height), (800.0, 600.0));
    }

    #[test]
    fn test_mobile_viewport() {
        let pf = playfield_for_viewport(390.0, 844.0);
        assert_eq!((pf.width, pf.height), (370.0, 744.0));

        // Width capped at 600 just under the breakpoint
        let pf = playfield_for_viewport(767.0, 1024.0);
        assert_eq!(pf.width, 600.0);
    }
}
