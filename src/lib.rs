//! Egg Climb - collision and fall-damage core for a 3D obstacle course
//!
//! Core modules:
//! - `sim`: Deterministic per-frame simulation (obstacles, landing resolution, crash state)
//! - `tuning`: Data-driven physics and damage constants

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz keeps thin tiles from being tunnelled)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the stepper will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = -9.8;
    /// Upward velocity given by a jump
    pub const JUMP_FORCE: f32 = 4.0;
    /// Half the egg's vertical extent
    pub const EGG_HALF_HEIGHT: f32 = 0.7;
    /// Horizontal radius of the egg body
    pub const EGG_RADIUS: f32 = 0.5;

    /// Falls at least this long crack the shell
    pub const CRACK_THRESHOLD: f32 = 0.9;
    /// Falls at least this long shatter the egg outright
    pub const CRASH_THRESHOLD: f32 = 1.5;
    /// Cracks that add up to a crash
    pub const MAX_CRACKS: u8 = 3;

    /// Length of the shatter animation (seconds)
    pub const CRASH_ANIMATION_DURATION: f32 = 0.7;

    /// Where every attempt starts
    pub const SPAWN_POSITION: glam::Vec3 = glam::Vec3::new(0.0, 0.7, 5.0);
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Distance between two points ignoring height
#[inline]
pub fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}
