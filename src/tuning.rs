//! Physics and damage tuning
//!
//! Loaded from a JSON file when one is given, otherwise the shipped defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics and damage constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Vertical motion ===
    /// Downward acceleration (negative)
    pub gravity: f32,
    /// Upward velocity given by a jump
    pub jump_force: f32,
    /// Half the egg's vertical extent
    pub half_height: f32,
    /// Horizontal radius used for hazard contact
    pub body_radius: f32,

    // === Movement ===
    /// Walking and climbing speed (units/s)
    pub walk_speed: f32,
    /// Multiplier applied to `walk_speed` while sprinting
    pub sprint_multiplier: f32,

    // === Fall damage ===
    /// Falls at least this long add a crack
    pub crack_threshold: f32,
    /// Falls at least this long crash immediately
    pub crash_threshold: f32,
    /// Cracks that add up to a crash
    pub max_cracks: u8,

    // === Crash ===
    /// Shatter animation length (seconds)
    pub crash_animation: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            half_height: EGG_HALF_HEIGHT,
            body_radius: EGG_RADIUS,

            walk_speed: 2.5,
            sprint_multiplier: 2.0,

            crack_threshold: CRACK_THRESHOLD,
            crash_threshold: CRASH_THRESHOLD,
            max_cracks: MAX_CRACKS,

            crash_animation: CRASH_ANIMATION_DURATION,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Bad tuning file {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Clamp values into ranges the simulation can run with
    pub fn sanitized(mut self) -> Self {
        // Gravity must pull down
        self.gravity = -self.gravity.abs();
        self.jump_force = self.jump_force.max(0.0);
        self.half_height = self.half_height.max(0.01);
        self.body_radius = self.body_radius.max(0.01);
        self.walk_speed = self.walk_speed.max(0.0);
        self.sprint_multiplier = self.sprint_multiplier.max(1.0);
        self.crack_threshold = self.crack_threshold.max(0.0);
        // A crash is never gentler than a crack
        self.crash_threshold = self.crash_threshold.max(self.crack_threshold);
        self.max_cracks = self.max_cracks.max(1);
        self.crash_animation = self.crash_animation.max(0.001);
        self
    }

    /// Resting center height for a surface at `surface_y`
    #[inline]
    pub fn rest_height(&self, surface_y: f32) -> f32 {
        surface_y + self.half_height
    }
}
