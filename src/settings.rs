//! Presentation settings
//!
//! Only affect how a frame is drawn, never the simulation.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles drawn for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 150,
            QualityPreset::High => 256,
        }
    }

    /// Triangle count for round shapes
    pub fn disc_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::Medium => 24,
            QualityPreset::High => 48,
        }
    }
}

/// Display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Pickup and crash bursts
    pub particles: bool,
    /// Neon background grid
    pub grid: bool,
    /// CRT scanline overlay
    pub scanlines: bool,
    /// White outlines around shapes and the player
    pub outlines: bool,
    pub show_fps: bool,

    // === Accessibility ===
    /// Keep particles and shape spin off screen
    pub reduced_motion: bool,
    /// Flat black background, no grid or scanlines
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            grid: true,
            scanlines: true,
            outlines: true,
            show_fps: false,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset; Low drops the overlay effects
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        if preset == QualityPreset::Low {
            self.scanlines = false;
            self.outlines = false;
        }
    }

    /// Parse settings from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build settings from a URL query such as `?quality=low&fps&reduced-motion`.
    /// Unknown keys and bad values are skipped with a warning.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            // A bare flag means on
            let flag = !matches!(value, "0" | "false" | "off");
            match key {
                "quality" => match QualityPreset::parse(value) {
                    Some(preset) => settings.apply_preset(preset),
                    None => log::warn!("Unknown quality preset {:?}", value),
                },
                "particles" => settings.particles = flag,
                "grid" => settings.grid = flag,
                "scanlines" => settings.scanlines = flag,
                "outlines" => settings.outlines = flag,
                "fps" => settings.show_fps = flag,
                "reduced-motion" => settings.reduced_motion = flag,
                "high-contrast" => settings.high_contrast = flag,
                _ => log::warn!("Ignoring unknown setting {:?}", key),
            }
        }
        settings
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles || self.reduced_motion {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn show_grid(&self) -> bool {
        self.grid && !self.high_contrast
    }

    pub fn show_scanlines(&self) -> bool {
        self.scanlines && !self.high_contrast
    }

    /// Draw shapes at their simulated rotation, or upright
    pub fn show_rotation(&self) -> bool {
        !self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::Low.as_str(), "Low");
    }

    #[test]
    fn test_low_preset_drops_overlays() {
        let s = Settings::from_preset(QualityPreset::Low);
        assert!(!s.show_scanlines());
        assert!(!s.outlines);
        assert_eq!(s.max_particles(), 60);
    }

    #[test]
    fn test_accessibility_overrides() {
        let mut s = Settings::default();
        assert!(s.show_grid() && s.show_scanlines() && s.show_rotation());
        s.high_contrast = true;
        assert!(!s.show_grid());
        assert!(!s.show_scanlines());
        s.reduced_motion = true;
        assert_eq!(s.max_particles(), 0);
        assert!(!s.show_rotation());
    }

    #[test]
    fn test_query_string() {
        let s = Settings::from_query("?quality=low&fps&reduced-motion=1&grid=0&bogus=3");
        assert_eq!(s.quality, QualityPreset::Low);
        assert!(!s.scanlines);
        assert!(s.show_fps);
        assert!(s.reduced_motion);
        assert!(!s.grid);
        assert!(s.particles);

        // Order matters: an explicit flag after the preset wins
        let s = Settings::from_query("quality=low&scanlines");
        assert!(s.show_scanlines());

        assert_eq!(Settings::from_query(""), Settings::default());
        assert_eq!(Settings::from_query("?quality=ultra").quality, QualityPreset::Medium);
    }

    #[test]
    fn test_json_partial() {
        let s = Settings::from_json(r#"{ "quality": "High", "scanlines": false }"#).unwrap();
        assert_eq!(s.quality, QualityPreset::High);
        assert!(!s.scanlines);
        assert!(s.grid);
    }
}
