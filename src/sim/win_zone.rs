//! Finish platform: reaching it wins the run and fences the egg in

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::hitbox::TableHitbox;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WinZoneLayout {
    /// Center of the platform top
    pub center: Vec3,
    pub width: f32,
    pub depth: f32,
    /// Center may be this far from resting height and still count
    pub height_tolerance: f32,
    /// Dropping more than this below the top leaves the zone
    pub drop_allowance: f32,
}

impl Default for WinZoneLayout {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 24.3, 125.0),
            width: 12.0,
            depth: 12.0,
            height_tolerance: 0.5,
            drop_allowance: 2.0,
        }
    }
}

impl WinZoneLayout {
    pub fn hitbox(&self) -> TableHitbox {
        TableHitbox::new(
            self.center.x - self.width * 0.5,
            self.center.x + self.width * 0.5,
            self.center.z - self.depth * 0.5,
            self.center.z + self.depth * 0.5,
            self.center.y,
        )
    }
}

#[derive(Debug, Clone)]
pub struct WinZone {
    pub layout: WinZoneLayout,
    pub hitbox: TableHitbox,
    pub has_won: bool,
}

impl WinZone {
    pub fn new(layout: WinZoneLayout) -> Self {
        Self {
            layout,
            hitbox: layout.hitbox(),
            has_won: false,
        }
    }

    /// One-shot win trigger; true only on the tick the egg first arrives
    pub fn check_arrival(&mut self, p: Vec3, half_height: f32) -> bool {
        if self.has_won {
            return false;
        }
        let rest_y = self.hitbox.top_y + half_height;
        let at_height = (p.y - rest_y).abs() <= self.layout.height_tolerance;
        if self.hitbox.covers_xz(p) && at_height {
            self.has_won = true;
            return true;
        }
        false
    }

    /// Whether `p` still counts as inside the zone for movement restriction
    pub fn contains(&self, p: Vec3) -> bool {
        self.hitbox.covers_xz(p) && p.y >= self.hitbox.top_y - self.layout.drop_allowance
    }

    pub fn reset(&mut self) {
        self.has_won = false;
    }
}
