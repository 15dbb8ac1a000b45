//! Ladder: a climb volume that suspends gravity

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ladder {
    /// Base of the ladder (center of its footprint)
    pub base: Vec3,
    pub width: f32,
    pub depth: f32,
    /// Climbing is possible from `base.y - reach_below`
    pub reach_below: f32,
    /// up to `base.y + reach_above`
    pub reach_above: f32,
    /// Highest center height a climb can reach, above `base.y`
    pub ceiling: f32,
}

impl Default for Ladder {
    fn default() -> Self {
        Self {
            base: Vec3::new(23.0, 15.0, 27.0),
            width: 2.0,
            depth: 1.5,
            reach_below: 0.5,
            reach_above: 9.8,
            ceiling: 10.0,
        }
    }
}

impl Ladder {
    /// Whether the egg is inside the climb volume
    pub fn contains(&self, p: Vec3) -> bool {
        let half_w = self.width * 0.5;
        let half_d = self.depth * 0.5;
        let in_xz = p.x >= self.base.x - half_w
            && p.x <= self.base.x + half_w
            && p.z >= self.base.z - half_d
            && p.z <= self.base.z + half_d;
        in_xz && p.y >= self.base.y - self.reach_below && p.y <= self.base.y + self.reach_above
    }

    /// Move `y` by a climb step, kept between `floor_y` and the top
    pub fn climb(&self, y: f32, step: f32, floor_y: f32) -> f32 {
        let top = self.base.y + self.ceiling;
        (y + step).clamp(floor_y, top.max(floor_y))
    }
}
