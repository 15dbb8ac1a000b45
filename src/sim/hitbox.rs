//! Hitbox primitives for course obstacles
//!
//! Every obstacle tests the player against one of three shapes:
//! - `TableHitbox`: axis-aligned box with a flat top
//! - `RampHitbox`: box whose top rises linearly along X
//! - `DiscHitbox`: flat disc (trampoline), tested on radial distance only

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{flat_distance, lerp};

/// Axis-aligned box with a flat top
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableHitbox {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    /// Height of the walkable top surface
    pub top_y: f32,
}

impl TableHitbox {
    pub const fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32, top_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
            top_y,
        }
    }

    /// Square footprint of half-size `half` centered on `center`, top at `center.y`
    pub fn centered(center: Vec3, half: f32) -> Self {
        Self::new(
            center.x - half,
            center.x + half,
            center.z - half,
            center.z + half,
            center.y,
        )
    }

    /// Strict footprint test (points on the edge are outside)
    #[inline]
    pub fn contains_xz(&self, pos: Vec3) -> bool {
        pos.x > self.min_x && pos.x < self.max_x && pos.z > self.min_z && pos.z < self.max_z
    }

    /// Inclusive footprint test (points on the edge are inside)
    #[inline]
    pub fn covers_xz(&self, pos: Vec3) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.z >= self.min_z && pos.z <= self.max_z
    }
}

/// Box whose top interpolates from `start_y` at `min_x` to `end_y` at `max_x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampHitbox {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    pub start_y: f32,
    pub end_y: f32,
}

impl RampHitbox {
    #[inline]
    pub fn contains_xz(&self, pos: Vec3) -> bool {
        pos.x > self.min_x && pos.x < self.max_x && pos.z > self.min_z && pos.z < self.max_z
    }

    /// Surface height under `x`, clamped to the ramp's ends
    pub fn surface_at(&self, x: f32) -> f32 {
        let run = self.max_x - self.min_x;
        if run.abs() < f32::EPSILON {
            return self.start_y.max(self.end_y);
        }
        let ratio = ((x - self.min_x) / run).clamp(0.0, 1.0);
        lerp(self.start_y, self.end_y, ratio)
    }
}

/// Flat disc tested on radial distance only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscHitbox {
    pub center: Vec3,
    pub radius: f32,
    /// Height of the bouncing surface
    pub height: f32,
}

impl DiscHitbox {
    #[inline]
    pub fn contains_xz(&self, pos: Vec3) -> bool {
        flat_distance(pos, self.center) < self.radius
    }
}

/// Vertical capture window around a resting height
///
/// A landing is accepted when the player was no more than `below` under the
/// resting height last tick, is no more than `above` over it now, and is not
/// moving up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingWindow {
    pub below: f32,
    pub above: f32,
}

impl LandingWindow {
    /// Tables, platforms, maze floor and road
    pub const TABLE: Self = Self {
        below: 0.2,
        above: 0.1,
    };
    /// Safe zone, pillow and barriers
    pub const SLAB: Self = Self {
        below: 0.1,
        above: 0.0,
    };
    /// Sloped ramp
    pub const RAMP: Self = Self {
        below: 0.5,
        above: 0.0,
    };
    /// Ground plane
    pub const GROUND: Self = Self {
        below: 0.1,
        above: 0.0,
    };

    /// The triple guard: was above, is now at or below, and is descending
    #[inline]
    pub fn accepts(&self, old_y: f32, new_y: f32, rest_y: f32, velocity_y: f32) -> bool {
        old_y >= rest_y - self.below && new_y <= rest_y + self.above && velocity_y <= 0.0
    }
}
